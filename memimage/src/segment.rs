//! # Text/Data Segment Images
//!
//! Combines the text (instruction) and data segments of a built program into
//! one flat image, laid out as:
//!
//! ```text
//! [0, text_len)                         text bytes
//! [text_len, data_start)                zero gap
//! [data_start, data_start + data_len)   data bytes
//! [.., next multiple of 4)              zero pad of the data region
//! ```

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{ImageError, Result};
use crate::hex::WORD_BYTES;
use crate::loader;
use crate::writer::OutputFile;

/// The four pieces of an image, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Text,
    Gap,
    Data,
    Pad,
}

impl Segment {
    pub const ALL: [Segment; 4] = [Segment::Text, Segment::Gap, Segment::Data, Segment::Pad];

    /// What a write of this segment is reported as.
    pub const fn describe(self) -> &'static str {
        match self {
            Segment::Text => "text segment",
            Segment::Gap => "zero pad up to the data segment",
            Segment::Data => "data segment",
            Segment::Pad => "zero pad after the data segment",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Text => "text",
            Segment::Gap => "gap",
            Segment::Data => "data",
            Segment::Pad => "pad",
        };
        f.write_str(name)
    }
}

/// Sizes of every segment of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    text_len: u64,
    data_start: u64,
    data_len: u64,
}

impl SegmentLayout {
    /// Lay out an image. Without a `data_start` the data follows the text
    /// directly. A `data_start` inside the text segment is a usage error.
    pub fn new(text_len: u64, data_len: u64, data_start: Option<u64>) -> Result<Self> {
        let data_start = data_start.unwrap_or(text_len);
        if data_start < text_len {
            return Err(ImageError::Usage(format!(
                "data start {:#x} is inside the text segment ({} bytes)",
                data_start, text_len
            )));
        }

        Ok(SegmentLayout {
            text_len,
            data_start,
            data_len,
        })
    }

    pub fn text_len(&self) -> u64 {
        self.text_len
    }

    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    /// Zero bytes between the text and the data
    pub fn gap(&self) -> u64 {
        self.data_start - self.text_len
    }

    /// Zero bytes rounding the data up to a word boundary
    pub fn pad(&self) -> u64 {
        let word = WORD_BYTES as u64;
        (word - self.data_len % word) % word
    }

    /// Size in bytes of one segment
    pub fn len_of(&self, segment: Segment) -> u64 {
        match segment {
            Segment::Text => self.text_len,
            Segment::Gap => self.gap(),
            Segment::Data => self.data_len,
            Segment::Pad => self.pad(),
        }
    }

    /// Size in bytes of the whole image
    pub fn total_len(&self) -> u64 {
        self.data_start + self.data_len + self.pad()
    }
}

/// Build the image for `text` and `data` in memory.
pub fn combine(text: &[u8], data: &[u8], data_start: Option<u64>) -> Result<Vec<u8>> {
    let layout = SegmentLayout::new(text.len() as u64, data.len() as u64, data_start)?;
    let total = usize::try_from(layout.total_len()).map_err(|_| {
        ImageError::Usage(format!(
            "image of {} bytes does not fit in memory",
            layout.total_len()
        ))
    })?;

    let mut image = Vec::with_capacity(total);
    image.extend_from_slice(text);
    image.resize(image.len() + layout.gap() as usize, 0);
    image.extend_from_slice(data);
    image.resize(total, 0);
    Ok(image)
}

/// Write the image to `output`, one segment at a time.
pub fn write_image(
    output: impl AsRef<Path>,
    text: &[u8],
    data: &[u8],
    layout: &SegmentLayout,
) -> Result<u64> {
    let mut out = OutputFile::create(output)?;

    for segment in Segment::ALL {
        match segment {
            Segment::Text => out.write_bytes(segment.describe(), text)?,
            Segment::Data => out.write_bytes(segment.describe(), data)?,
            Segment::Gap | Segment::Pad => {
                out.write_zeros(segment.describe(), layout.len_of(segment))?
            }
        }
        debug!(%segment, bytes = layout.len_of(segment), "wrote segment");
    }

    Ok(out.finish())
}

/// Load both segment files and write the combined image to `output`.
pub fn combine_files(
    text: impl AsRef<Path>,
    data: impl AsRef<Path>,
    output: impl AsRef<Path>,
    data_start: Option<u64>,
) -> Result<SegmentLayout> {
    let text = loader::load(text)?;
    let data = loader::load(data)?;
    let layout = SegmentLayout::new(text.len() as u64, data.len() as u64, data_start)?;

    write_image(output, text.bytes(), data.bytes(), &layout)?;
    Ok(layout)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_image_layout(
            text in prop::collection::vec(any::<u8>(), 0..64),
            data in prop::collection::vec(any::<u8>(), 0..64),
            extra in 0u64..64
        ) {
            let data_start = text.len() as u64 + extra;
            let image = combine(&text, &data, Some(data_start)).unwrap();
            let start = data_start as usize;

            prop_assert_eq!(&image[..text.len()], &text[..]);
            prop_assert!(image[text.len()..start].iter().all(|&b| b == 0));
            prop_assert_eq!(&image[start..start + data.len()], &data[..]);
            prop_assert!(image[start + data.len()..].iter().all(|&b| b == 0));
            prop_assert_eq!((image.len() - start) % WORD_BYTES, 0);
            prop_assert!(image.len() - start - data.len() < WORD_BYTES);
        }

        #[test]
        fn test_data_start_inside_text_rejected(
            text in prop::collection::vec(any::<u8>(), 1..64),
            data in prop::collection::vec(any::<u8>(), 0..16),
            back in 1u64..64
        ) {
            let text_len = text.len() as u64;
            let data_start = text_len.saturating_sub(back.min(text_len));
            prop_assume!(data_start < text_len);

            let result = combine(&text, &data, Some(data_start));
            prop_assert!(matches!(result, Err(ImageError::Usage(_))));
        }
    }
}
