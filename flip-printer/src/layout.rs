//! Character-level line layout
//!
//! Lines are split on a dot budget, one character at a time. There is no
//! word-boundary logic: the printer has a fixed glyph grid and the receipt
//! only needs to be legible.

use crate::encoding::char_width;
use crate::normalize::normalize;

/// Printable width of 58mm paper in dots
pub const DEFAULT_MAX_WIDTH: u32 = 384;

/// One printed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalLine {
    pub text: String,
    /// Rendered width in dots
    pub width: u32,
    /// Index of the source paragraph within its document
    pub paragraph: usize,
}

impl PhysicalLine {
    /// An empty line, printed as a blank feed
    pub fn blank(paragraph: usize) -> Self {
        Self {
            text: String::new(),
            width: 0,
            paragraph,
        }
    }
}

/// Split one paragraph into lines no wider than `max_width` dots
///
/// A character whose own width exceeds `max_width` is placed alone on a
/// line rather than dropped. An empty paragraph yields no lines.
pub fn wrap(paragraph: &str, max_width: u32) -> Vec<PhysicalLine> {
    let mut lines = Vec::new();
    let mut text = String::new();
    let mut width = 0u32;

    for c in paragraph.chars() {
        let w = char_width(c);
        if width + w > max_width && !text.is_empty() {
            lines.push(PhysicalLine {
                text: std::mem::take(&mut text),
                width,
                paragraph: 0,
            });
            width = 0;
        }
        text.push(c);
        width += w;
    }

    if !text.is_empty() {
        lines.push(PhysicalLine {
            text,
            width,
            paragraph: 0,
        });
    }

    lines
}

/// One email rendered as text: header lines, a blank line, then the body
///
/// The text is normalized on construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Build a document from raw message text
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize(raw),
        }
    }

    /// The normalized text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Logical paragraphs in reading order
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}
