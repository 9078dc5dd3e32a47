//! Output file handling
//!
//! The output is created (or truncated) and written in place. Every write
//! call is flushed before it returns, so a failure is reported against the
//! piece that was being written. Nothing is cleaned up on failure: the file
//! may be left short or empty.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ImageError, Result};

/// A buffered output file that tags write failures with its path.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    inner: BufWriter<File>,
    written: u64,
}

impl OutputFile {
    /// Create `path`, truncating any existing content.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ImageError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(OutputFile {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
            written: 0,
        })
    }

    /// Bytes handed to the file so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write_bytes(&mut self, what: &'static str, bytes: &[u8]) -> Result<()> {
        self.write_chunks(what, std::iter::once(bytes))
    }

    /// Write every chunk through the buffer, then flush once.
    pub fn write_chunks<I>(&mut self, what: &'static str, chunks: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for chunk in chunks {
            let chunk = chunk.as_ref();
            self.inner
                .write_all(chunk)
                .map_err(|source| self.write_error(what, source))?;
            self.written += chunk.len() as u64;
        }
        self.flush(what)
    }

    pub fn write_zeros(&mut self, what: &'static str, count: u64) -> Result<()> {
        let copied = io::copy(&mut io::repeat(0).take(count), &mut self.inner)
            .map_err(|source| self.write_error(what, source))?;
        self.written += copied;
        self.flush(what)
    }

    /// Close the file, returning the number of bytes written.
    pub fn finish(self) -> u64 {
        debug!(path = %self.path.display(), bytes = self.written, "wrote output file");
        self.written
    }

    fn flush(&mut self, what: &'static str) -> Result<()> {
        self.inner
            .flush()
            .map_err(|source| self.write_error(what, source))
    }

    fn write_error(&self, what: &'static str, source: io::Error) -> ImageError {
        ImageError::FileWrite {
            path: self.path.clone(),
            what,
            source,
        }
    }
}
