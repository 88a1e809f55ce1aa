//! Shift_JIS encoding utilities for Japanese thermal printers
//!
//! The target printers decode text as Shift_JIS once `FS C 1` is selected.
//! This module provides:
//! - The glyph width model (narrow/wide by encoded byte length)
//! - Lossy conversion from UTF-8 to Shift_JIS with a placeholder byte

use encoding_rs::SHIFT_JIS;

/// Width in dots of a single-byte (half-width) glyph
pub const NARROW_WIDTH: u32 = 12;

/// Width in dots of a double-byte (full-width) glyph
pub const WIDE_WIDTH: u32 = 24;

/// Byte sent in place of a character Shift_JIS cannot represent
pub const PLACEHOLDER: u8 = b'?';

/// Append the Shift_JIS form of `c` to `out`
///
/// Returns `false` when the character had no mapping and the placeholder
/// was written instead.
fn push_char(c: char, out: &mut Vec<u8>) -> bool {
    let mut tmp = [0u8; 4];
    let (bytes, _, had_errors) = SHIFT_JIS.encode(c.encode_utf8(&mut tmp));
    if had_errors {
        // encoding_rs emits an HTML numeric reference for unmappables
        out.push(PLACEHOLDER);
        false
    } else {
        out.extend_from_slice(&bytes);
        true
    }
}

/// Number of bytes `c` occupies once encoded (placeholder counts as one)
pub fn encoded_len(c: char) -> usize {
    let mut buf = Vec::with_capacity(2);
    push_char(c, &mut buf);
    buf.len()
}

/// Printed width of a character in dots
///
/// Derived from the encoded byte length, not from font metrics: the device
/// renders every single-byte code at half the width of a double-byte one.
pub fn char_width(c: char) -> u32 {
    if encoded_len(c) == 1 {
        NARROW_WIDTH
    } else {
        WIDE_WIDTH
    }
}

/// Printed width of a string in dots
pub fn text_width(s: &str) -> u32 {
    s.chars().map(char_width).sum()
}

/// Encode one line of text as Shift_JIS
///
/// Never fails. Characters without a mapping are replaced by [`PLACEHOLDER`].
pub fn encode(line: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    let mut unmapped = 0usize;
    for c in line.chars() {
        if !push_char(c, &mut out) {
            unmapped += 1;
        }
    }
    if unmapped > 0 {
        tracing::debug!(unmapped, "replaced characters without a Shift_JIS mapping");
    }
    out
}

/// Encode every line, preserving line count and order
pub fn encode_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<u8>> {
    lines.iter().map(|l| encode(l.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('A'), NARROW_WIDTH);
        assert_eq!(char_width(' '), NARROW_WIDTH);
        assert_eq!(char_width('あ'), WIDE_WIDTH);
        assert_eq!(char_width('漢'), WIDE_WIDTH);
        // Half-width katakana is a single byte in Shift_JIS
        assert_eq!(char_width('ｱ'), NARROW_WIDTH);
    }

    #[test]
    fn test_unmappable_measured_as_placeholder() {
        assert_eq!(char_width('😀'), NARROW_WIDTH);
        assert_eq!(char_width('ก'), NARROW_WIDTH);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("hello"), 60);
        assert_eq!(text_width("AB中文"), 24 + 48);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("Hello"), b"Hello".to_vec());
        assert_eq!(encode("Aあ"), vec![0x41, 0x82, 0xA0]);
    }

    #[test]
    fn test_encode_placeholder() {
        assert_eq!(encode("a😀b"), b"a?b".to_vec());
        assert_eq!(encode("😀"), vec![PLACEHOLDER]);
        assert_eq!(encode("ไทย"), b"???".to_vec());
    }

    #[test]
    fn test_encode_lines_keeps_count() {
        let lines = ["one", "", "😀😀", "日本"];
        let encoded = encode_lines(&lines);
        assert_eq!(encoded.len(), lines.len());
        assert!(encoded[1].is_empty());
        assert_eq!(encoded[2], b"??".to_vec());
        assert_eq!(encoded[3].len(), 4);
    }
}
