//! # memimage
//!
//! Building blocks for the memory-image tools of an FPGA toolchain flow:
//!
//! - [`hex`]: raw binary to a word-per-line hex listing for block RAM
//!   initialization (`bin2hex`)
//! - [`segment`]: text and data segments of a program combined into one flat
//!   binary image (`bin2mem`)
//!
//! Every tool is a straight pipeline: [`loader`] reads whole files, a
//! transformer works on the bytes in memory, [`writer`] emits the result.
//! Failures come back as [`ImageError`]; nothing in this crate exits the
//! process.
//!
//! ## Example
//!
//! ```rust
//! use memimage::{hex, segment};
//!
//! let lines = hex::convert(&[0x01, 0x02, 0x03, 0x04], false, 2);
//! assert_eq!(hex::render(&lines), "01020304\n00000000\n");
//!
//! let image = segment::combine(&[0xAA, 0xBB, 0xCC], &[0x11, 0x22], Some(4)).unwrap();
//! assert_eq!(image, [0xAA, 0xBB, 0xCC, 0x00, 0x11, 0x22, 0x00, 0x00]);
//! ```

pub mod error;
pub mod loader;
pub mod writer;
pub mod hex;
pub mod segment;

pub use error::{ImageError, Result};
pub use loader::{load, FileBuffer, MAX_FILE_SIZE};
pub use writer::OutputFile;
pub use hex::{convert, convert_endian, convert_file, render, HexOptions, WordCounts};
pub use segment::{combine, combine_files, Segment, SegmentLayout};

/// Parse a size or address given on the command line.
///
/// Accepts decimal and `0x`-prefixed hexadecimal, with optional `_`
/// separators.
pub fn parse_number(text: &str) -> std::result::Result<u64, String> {
    let text = text.trim();
    let cleaned = text.replace('_', "");

    let parsed = if let Some(digits) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(digits, 16)
    } else {
        cleaned.parse::<u64>()
    };

    parsed.map_err(|e| format!("invalid number '{}': {}", text, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _ = ImageError::Usage(String::new());
        let _ = HexOptions::default();
        assert_eq!(Segment::ALL.len(), 4);
        assert_eq!(MAX_FILE_SIZE, 2_147_483_647);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_number("0"), Ok(0));
        assert_eq!(parse_number("4096"), Ok(4096));
        assert_eq!(parse_number(" 12 "), Ok(12));
        assert_eq!(parse_number("1_024"), Ok(1024));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_number("0x1000"), Ok(0x1000));
        assert_eq!(parse_number("0XfF"), Ok(0xFF));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_number("").is_err());
        assert!(parse_number("-4").is_err());
        assert!(parse_number("0x").is_err());
        assert!(parse_number("12kb").is_err());
        assert!(parse_number("0xZZ").unwrap_err().contains("0xZZ"));
    }

    #[test]
    fn test_result_type() {
        let ok: Result<u32> = Ok(4);
        assert!(ok.is_ok());

        let err: Result<u32> = Err(ImageError::Usage("bad".into()));
        assert!(err.is_err());
    }
}
