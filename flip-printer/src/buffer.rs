//! Reversed print buffer
//!
//! The printer runs in upside-down mode, so the first line fed out ends up
//! at the bottom of the torn-off receipt. Lines are stored newest-first so
//! that the receipt reads top-to-bottom once it is turned around.

use std::collections::VecDeque;

use crate::layout::{DEFAULT_MAX_WIDTH, Document, PhysicalLine, wrap};

/// Lines of one print job, stored in reverse generation order
#[derive(Debug)]
pub struct PrintBuffer {
    lines: VecDeque<PhysicalLine>,
    max_width: u32,
    next_paragraph: usize,
}

impl PrintBuffer {
    /// Create an empty buffer wrapping at `max_width` dots
    pub fn new(max_width: u32) -> Self {
        Self {
            lines: VecDeque::new(),
            max_width,
            next_paragraph: 0,
        }
    }

    /// Wrap width in dots
    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Add already-normalized text
    ///
    /// The text is split on `\n` and each paragraph wrapped. Every physical
    /// line goes to the front of the buffer. An empty paragraph becomes one
    /// blank line so paragraph spacing survives.
    pub fn append_paragraph(&mut self, text: &str) {
        for paragraph in text.split('\n') {
            let index = self.next_paragraph;
            self.next_paragraph += 1;

            let lines = wrap(paragraph, self.max_width);
            if lines.is_empty() {
                self.lines.push_front(PhysicalLine::blank(index));
                continue;
            }
            for mut line in lines {
                line.paragraph = index;
                self.lines.push_front(line);
            }
        }
    }

    /// Add every paragraph of a document
    pub fn append_document(&mut self, doc: &Document) {
        self.append_paragraph(doc.text());
    }

    /// Take the buffered lines, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<PhysicalLine> {
        self.next_paragraph = 0;
        self.lines.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Buffered lines in print order
    pub fn lines(&self) -> impl Iterator<Item = &PhysicalLine> {
        self.lines.iter()
    }
}

impl Default for PrintBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH)
    }
}
