//! Memory-image errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{0}")]
    Usage(String),

    #[error("Can not open \"{}\"", path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("\"{}\" is too large: {size} bytes (limit {limit})", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Can not allocate {size} bytes of memory for \"{}\"", path.display())]
    Allocation { path: PathBuf, size: u64 },

    #[error("Error reading \"{}\"", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error writing {what} to \"{}\"", path.display())]
    FileWrite {
        path: PathBuf,
        what: &'static str,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ImageError>;
