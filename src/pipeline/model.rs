//! Owned snapshot of a parsed PDF: pages → blocks → lines → spans.
//!
//! The engine builds a [`Document`] and releases its native handle before
//! returning, so everything downstream works on plain Rust values.

use crate::output::DocumentMetadata;
use std::ops::BitOr;

/// Style bits attached to a [`Span`].
///
/// The bit positions follow the MuPDF span-flag layout (bit 0, superscript,
/// is never set); only [`BOLD`] and [`ITALIC`] are interpreted by the
/// Markdown writer.
///
/// [`BOLD`]: FontFlags::BOLD
/// [`ITALIC`]: FontFlags::ITALIC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FontFlags(u32);

impl FontFlags {
    pub const NONE: FontFlags = FontFlags(0);
    pub const ITALIC: FontFlags = FontFlags(1 << 1);
    pub const SERIF: FontFlags = FontFlags(1 << 2);
    pub const MONOSPACE: FontFlags = FontFlags(1 << 3);
    pub const BOLD: FontFlags = FontFlags(1 << 4);

    pub const fn from_bits(bits: u32) -> Self {
        FontFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: FontFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    pub fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }

    /// Set or clear `flag`.
    pub fn set(&mut self, flag: FontFlags, on: bool) {
        if on {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl BitOr for FontFlags {
    type Output = FontFlags;

    fn bitor(self, rhs: FontFlags) -> FontFlags {
        FontFlags(self.0 | rhs.0)
    }
}

/// A run of text sharing one font.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub flags: FontFlags,
}

impl Span {
    pub fn new(text: impl Into<String>, flags: FontFlags) -> Self {
        Self {
            text: text.into(),
            flags,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, FontFlags::NONE)
    }
}

/// Spans sharing a baseline, in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

/// A page-level content block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A text block: one paragraph in the output.
    Text(Vec<Line>),
    /// Anything else the engine reports (images, paths, forms). Ignored.
    Other,
}

/// An embedded raster image, already encoded for writing to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedImage {
    pub data: Vec<u8>,
    /// File extension without the dot, e.g. `png`.
    pub extension: String,
}

/// One page of a [`Document`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// 1-indexed page number.
    pub number: usize,
    pub blocks: Vec<Block>,
    /// Plain text as reported by the engine, untouched.
    pub text: String,
    pub images: Vec<ExtractedImage>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }
}

/// A fully extracted PDF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub metadata: DocumentMetadata,
    pub pages: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_and_italic_bits_match_mupdf_layout() {
        assert_eq!(FontFlags::BOLD.bits(), 16);
        assert_eq!(FontFlags::ITALIC.bits(), 2);

        let both = FontFlags::BOLD | FontFlags::ITALIC;
        assert!(both.is_bold());
        assert!(both.is_italic());
        assert!(!FontFlags::SERIF.is_bold());
    }

    #[test]
    fn set_and_clear() {
        let mut f = FontFlags::from_bits(FontFlags::SERIF.bits());
        f.set(FontFlags::BOLD, true);
        assert!(f.is_bold());
        assert!(f.contains(FontFlags::SERIF));
        f.set(FontFlags::BOLD, false);
        assert!(!f.is_bold());
        assert_eq!(f, FontFlags::SERIF);
    }
}
