use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

/// Settings that are not part of the command line surface.
///
/// Read from an optional `Config.toml` next to the working directory and from
/// `FLATDIR_*` environment variables; every field has a default so an absent
/// file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Glob patterns matched against full paths; matches are left out of the scan.
    pub ignore_patterns: Vec<String>,
    pub follow_links: bool,
    /// Number of threads used by the copy phase. `0` and `1` both mean sequential.
    pub copy_workers: usize,
    pub max_depth: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            follow_links: false,
            copy_workers: 1,
            max_depth: None,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_configuration_from("Config")
}

/// `name` is a path without extension, as accepted by [`config::File::with_name`].
pub fn load_configuration_from(name: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(name).required(false))
        .add_source(Environment::with_prefix("FLATDIR").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempdir().unwrap();
        let name = tmp.path().join("Config");
        let config = load_configuration_from(name.to_str().unwrap()).unwrap();
        assert!(config.ignore_patterns.is_empty());
        assert!(!config.follow_links);
        assert_eq!(config.copy_workers, 1);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("Config.toml"),
            "ignore_patterns = [\"**/.git\", \"*.tmp\"]\nmax_depth = 2\n",
        )
        .unwrap();
        let name = tmp.path().join("Config");
        let config = load_configuration_from(name.to_str().unwrap()).unwrap();
        assert_eq!(config.ignore_patterns, vec!["**/.git", "*.tmp"]);
        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.copy_workers, 1);
    }
}
