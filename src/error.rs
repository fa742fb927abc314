//! Error types for the photo date sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo date sorter
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {}: {message}", path.display())]
    ExifRead { path: PathBuf, message: String },

    #[error("Input directory does not exist: {}", path.display())]
    InputDirMissing { path: PathBuf },

    #[error("Input path is not a directory: {}", path.display())]
    InputNotDirectory { path: PathBuf },

    #[error("Invalid date format '{format}': {message}")]
    InvalidDateFormat { format: String, message: String },

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create bucket directory {}: {source}", path.display())]
    BucketDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to check destination {}: {source}", path.display())]
    DestinationCheck {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid file name: {}", path.display())]
    InvalidFileName { path: PathBuf },

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
