use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Copy failed {} -> {}: {source}", .source_path.display(), .destination.display())]
    Copy {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output directory {} overlaps input directory {}", .output.display(), .input.display())]
    SourceDestinationOverlap { input: PathBuf, output: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Two files resolved to the same destination: {}", .0.display())]
    DuplicateDestination(PathBuf),
}
