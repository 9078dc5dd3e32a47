//! # Binary to Hex Listing
//!
//! Turns a raw binary into a memory-initialization listing: one 32-bit word
//! per line, eight lowercase hex digits, as consumed by `$readmemh` style
//! block RAM initializers.
//!
//! ## Word Interpretation
//!
//! ```text
//! file bytes:   01 02 03 04 | 05 06
//! plain:        01020304      05060000   (tail packed high)
//! swapped:      04030201      00000506   (tail packed low)
//! ```
//!
//! The four bytes of a word are read in file order as its big-endian digits,
//! independent of the host. Swapping reverses every full word. A 1-3 byte
//! tail is packed into one more word; only the leftover bytes are visited.

use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;
use crate::loader;
use crate::writer::OutputFile;

// ============================================================================
// Constants
// ============================================================================

/// Bytes per listing word
pub const WORD_BYTES: usize = 4;

/// Line emitted for every pad word
pub const PAD_LINE: &str = "00000000";

/// Listing content when there are no words at all
pub const EMPTY_LISTING: &str = "\n";

// ============================================================================
// Options
// ============================================================================

/// Conversion options for [`convert_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexOptions {
    /// Byte-swap every emitted word
    pub swap: bool,
    /// Target total word count; smaller values add nothing
    pub pad_words: u32,
}

/// How many lines of each kind a listing holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCounts {
    pub full: usize,
    pub partial: bool,
    pub padding: usize,
}

impl WordCounts {
    pub fn for_input(len: usize, pad_words: u32) -> Self {
        let full = len / WORD_BYTES;
        let partial = len % WORD_BYTES != 0;
        let produced = full + usize::from(partial);
        let padding = (pad_words as usize).saturating_sub(produced);

        WordCounts {
            full,
            partial,
            padding,
        }
    }

    /// Total number of lines in the listing
    pub fn total(&self) -> usize {
        self.full + usize::from(self.partial) + self.padding
    }
}

// ============================================================================
// Word Helpers
// ============================================================================

/// Reverse the byte order of `value` when `swap` is set.
#[inline]
pub const fn convert_endian(value: u32, swap: bool) -> u32 {
    if swap {
        value.swap_bytes()
    } else {
        value
    }
}

/// Pack a 1-3 byte tail into one word.
///
/// Without `swap` the first byte lands in bits 31..24 and the low end is zero
/// filled. With `swap` each byte is shifted in from the bottom, so the last
/// byte lands in bits 7..0.
pub fn pack_tail(tail: &[u8], swap: bool) -> u32 {
    debug_assert!(tail.len() < WORD_BYTES);

    tail.iter().enumerate().fold(0u32, |acc, (index, &byte)| {
        trace!(index, byte, "packing trailing byte");
        if swap {
            (acc << 8) | u32::from(byte)
        } else {
            acc | (u32::from(byte) << (24 - 8 * index as u32))
        }
    })
}

/// Format one word as a listing line (without the newline).
#[inline]
pub fn format_word(word: u32) -> String {
    format!("{:08x}", word)
}

// ============================================================================
// Conversion
// ============================================================================

/// Words of the listing, in order: full words, packed tail, pad words.
pub fn words(bytes: &[u8], swap: bool, pad_words: u32) -> impl Iterator<Item = u32> + '_ {
    let counts = WordCounts::for_input(bytes.len(), pad_words);
    let chunks = bytes.chunks_exact(WORD_BYTES);
    let tail = chunks.remainder();

    let full = chunks.map(move |chunk| {
        let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        convert_endian(word, swap)
    });
    let partial = (!tail.is_empty()).then(|| pack_tail(tail, swap));
    let padding = std::iter::repeat(0u32).take(counts.padding);

    full.chain(partial).chain(padding)
}

/// Convert a binary image into listing lines.
pub fn convert(bytes: &[u8], swap: bool, pad_words: u32) -> Vec<String> {
    words(bytes, swap, pad_words).map(format_word).collect()
}

/// Join listing lines, one per line, ending in a newline.
pub fn render(lines: &[String]) -> String {
    if lines.is_empty() {
        return EMPTY_LISTING.to_string();
    }

    let mut output = String::with_capacity(lines.len() * (2 * WORD_BYTES + 1));
    for line in lines {
        output.push_str(line);
        output.push('\n');
    }
    output
}

/// Convert the binary at `input` and write the listing to `output`.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: HexOptions,
) -> Result<WordCounts> {
    let buffer = loader::load(input)?;
    let counts = WordCounts::for_input(buffer.len(), options.pad_words);

    let mut out = OutputFile::create(output)?;
    if counts.total() == 0 {
        out.write_bytes("hex listing", EMPTY_LISTING.as_bytes())?;
    } else {
        let lines = words(buffer.bytes(), options.swap, options.pad_words)
            .map(|word| format!("{:08x}\n", word));
        out.write_chunks("hex listing", lines)?;
    }
    out.finish();

    debug!(
        input = %buffer.path().display(),
        full = counts.full,
        partial = counts.partial,
        padding = counts.padding,
        "converted binary to hex listing"
    );

    Ok(counts)
}
