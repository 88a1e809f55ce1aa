//! # flip-printer
//!
//! Upside-down receipt printing for ESC/POS thermal printers.
//!
//! The printer feeds paper out in upside-down mode, so a receipt torn off
//! and turned around reads top-to-bottom. To make that work the text is
//! laid out on the host:
//!
//! - Normalization of line endings, blank lines and typographic punctuation
//! - Character-level wrapping on a dot budget (12 dots per single-byte
//!   Shift_JIS glyph, 24 per double-byte glyph)
//! - A print buffer stored in reverse line order
//! - Lossy Shift_JIS encoding with a `?` placeholder
//! - A fixed command sequence over raw TCP (port 9100) with guaranteed
//!   orientation restore, reset, cut and close
//!
//! Fetching mail is not handled here; callers pass one plain-text message
//! per job.
//!
//! ## Example
//!
//! ```ignore
//! use flip_printer::{DriverConfig, FlipPrinter, NetworkPrinter};
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! let flip = FlipPrinter::new(printer, DriverConfig::default());
//! flip.print_text("Subject: こんにちは\nFrom: A\n\nHello").await?;
//! ```

mod buffer;
mod driver;
mod encoding;
mod error;
mod escpos;
mod layout;
mod normalize;
mod printer;

// Re-exports
pub use buffer::PrintBuffer;
pub use driver::{
    DEFAULT_CUT_FEED_LINES, DEFAULT_LEFT_MARGIN, DriverConfig, FlipPrinter, JobReport, JobStep,
    ProtocolDriver,
};
pub use encoding::{
    NARROW_WIDTH, PLACEHOLDER, WIDE_WIDTH, char_width, encode, encode_lines, encoded_len,
    text_width,
};
pub use error::{PrintError, PrintResult};
pub use escpos::{Charset, CodeTable, Command, KanjiCode};
pub use layout::{DEFAULT_MAX_WIDTH, Document, PhysicalLine, wrap};
pub use normalize::{SUBSTITUTIONS, normalize};
pub use printer::{Connector, DEFAULT_PORT, DeviceSession, NetworkPrinter, TcpSession};
