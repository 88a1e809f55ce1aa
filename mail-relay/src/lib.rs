//! # mail-relay
//!
//! Feeds decoded mail to an upside-down receipt printer.
//!
//! The mail-ingestion side writes one JSON file per message into a spool
//! directory. Each pass composes the unseen messages into receipt text,
//! prints them one job at a time through `flip-printer`, and records them in
//! a ledger so they are not printed again.
//!
//! ```text
//! mail-relay/src/
//! ├── config.rs   # Environment configuration
//! ├── logger.rs   # tracing setup and log retention
//! ├── message.rs  # Message model and receipt text
//! ├── ledger.rs   # Processed message record
//! ├── spool.rs    # Spool directory reader
//! └── relay.rs    # One pass over the spool
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod logger;
pub mod message;
pub mod relay;
pub mod spool;

pub use config::Config;
pub use error::{RelayError, RelayResult};
pub use ledger::ProcessedLedger;
pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
pub use message::{ComposeOptions, MailMessage, compose};
pub use relay::{Relay, RunSummary};
