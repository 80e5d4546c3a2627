mod walk;

use std::path::{Path, PathBuf};

pub use walk::scan_tree;

/// A regular file discovered under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    /// Path relative to the scan root, file name included.
    pub relative_path: PathBuf,
    /// Number of directories between the root and the file; `0` for a file
    /// directly inside the root.
    pub depth: usize,
}

impl FileRecord {
    pub fn new(root: &Path, absolute_path: PathBuf) -> Option<Self> {
        let relative_path = absolute_path.strip_prefix(root).ok()?.to_path_buf();
        let depth = relative_path.components().count().checked_sub(1)?;
        Some(Self {
            absolute_path,
            relative_path,
            depth,
        })
    }

    /// Directory chain between the root and the file.
    pub fn relative_dir(&self) -> &Path {
        self.relative_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub follow_links: bool,
    pub ignore_patterns: Vec<String>,
    /// Subtree left out of the walk entirely (e.g. an output directory that
    /// lives inside the input).
    pub exclude: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    /// Sorted by `relative_path`.
    pub files: Vec<FileRecord>,
    /// Entries that could not be read and were left out.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_of_root_level_file_is_zero() {
        let record = FileRecord::new(Path::new("/in"), PathBuf::from("/in/a.txt")).unwrap();
        assert_eq!(record.depth, 0);
        assert_eq!(record.relative_path, PathBuf::from("a.txt"));
        assert_eq!(record.relative_dir(), Path::new(""));
    }

    #[test]
    fn test_depth_counts_directories_only() {
        let record =
            FileRecord::new(Path::new("/in"), PathBuf::from("/in/x/y/z/f.txt")).unwrap();
        assert_eq!(record.depth, 3);
        assert_eq!(record.relative_dir(), Path::new("x/y/z"));
    }

    #[test]
    fn test_path_outside_root_is_rejected() {
        assert!(FileRecord::new(Path::new("/in"), PathBuf::from("/other/a.txt")).is_none());
        assert!(FileRecord::new(Path::new("/in"), PathBuf::from("/in")).is_none());
    }
}
