//! Whole-file loading
//!
//! Both tools read their inputs completely before transforming anything. The
//! buffer is reserved up front from the file's metadata so that an oversized
//! or unallocatable file is reported before any byte is read.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ImageError, Result};

/// Largest accepted input, in bytes (2 GiB - 1).
pub const MAX_FILE_SIZE: u64 = i32::MAX as u64;

/// An input file held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBuffer {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FileBuffer {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read the whole file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<FileBuffer> {
    load_with_limit(path.as_ref(), MAX_FILE_SIZE)
}

pub(crate) fn load_with_limit(path: &Path, limit: u64) -> Result<FileBuffer> {
    let file = File::open(path).map_err(|source| ImageError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let size = file
        .metadata()
        .map_err(|source| ImageError::FileRead {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    if size > limit {
        return Err(ImageError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }

    let expected = usize::try_from(size).map_err(|_| ImageError::FileTooLarge {
        path: path.to_path_buf(),
        size,
        limit,
    })?;

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(expected)
        .map_err(|_| ImageError::Allocation {
            path: path.to_path_buf(),
            size,
        })?;

    let read = file
        .take(size)
        .read_to_end(&mut bytes)
        .map_err(|source| ImageError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    if read != expected {
        return Err(ImageError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("read {} of {} bytes", read, expected),
            ),
        });
    }

    debug!(path = %path.display(), bytes = read, "loaded input file");

    Ok(FileBuffer {
        path: path.to_path_buf(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_reads_exact_contents() {
        let file = temp_with(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01]);
        let buffer = load(file.path()).unwrap();

        assert_eq!(buffer.bytes(), &[0xDE, 0xAD, 0xBE, 0xEF, 0x01]);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.path(), file.path());
    }

    #[test]
    fn test_load_empty_file() {
        let file = temp_with(&[]);
        let buffer = load(file.path()).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");

        match load(&missing) {
            Err(ImageError::FileOpen { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected FileOpen error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_over_limit() {
        let file = temp_with(&[0u8; 16]);

        match load_with_limit(file.path(), 15) {
            Err(ImageError::FileTooLarge { size, limit, .. }) => {
                assert_eq!(size, 16);
                assert_eq!(limit, 15);
            }
            other => panic!("Expected FileTooLarge error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_at_limit() {
        let file = temp_with(&[7u8; 16]);
        let buffer = load_with_limit(file.path(), 16).unwrap();
        assert_eq!(buffer.len(), 16);
    }
}
