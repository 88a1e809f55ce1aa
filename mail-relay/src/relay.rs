//! Spool-to-printer relay
//!
//! Messages are printed strictly one at a time. Each one is its own print
//! job with its own buffer and printer session.

use std::path::PathBuf;

use flip_printer::{Connector, FlipPrinter};
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::error::RelayResult;
use crate::ledger::ProcessedLedger;
use crate::message::{ComposeOptions, compose};
use crate::spool::load_messages;

/// Counts for one pass over the spool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub printed: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct Relay<C> {
    printer: FlipPrinter<C>,
    spool_dir: PathBuf,
    ledger: ProcessedLedger,
    compose: ComposeOptions,
}

impl<C: Connector> Relay<C> {
    pub fn new(
        printer: FlipPrinter<C>,
        spool_dir: impl Into<PathBuf>,
        ledger: ProcessedLedger,
        compose: ComposeOptions,
    ) -> Self {
        Self {
            printer,
            spool_dir: spool_dir.into(),
            ledger,
            compose,
        }
    }

    /// Build a relay from configuration, loading the ledger from disk
    pub fn from_config(connector: C, config: &Config) -> RelayResult<Self> {
        let ledger = ProcessedLedger::load(&config.processed_file)?;
        Ok(Self::new(
            FlipPrinter::new(connector, config.driver_config()),
            config.spool_dir.clone(),
            ledger,
            ComposeOptions {
                max_body_chars: config.max_body_chars,
                timezone: config.timezone,
            },
        ))
    }

    pub fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    /// Print every spooled message not yet in the ledger
    ///
    /// A message is recorded before its job starts, so a failed or partial
    /// print is never repeated. A message that cannot be recorded is left
    /// unprinted and counted as failed.
    #[instrument(skip(self), fields(spool = %self.spool_dir.display()))]
    pub async fn run_once(&mut self) -> RelayResult<RunSummary> {
        let mut summary = RunSummary::default();

        for msg in load_messages(&self.spool_dir)? {
            if self.ledger.contains(&msg.account, &msg.id) {
                summary.skipped += 1;
                continue;
            }

            if let Err(e) = self.ledger.record(&msg.account, &msg.id) {
                error!(
                    account = %msg.account,
                    id = %msg.id,
                    ledger = %self.ledger.path().display(),
                    error = %e,
                    "Recording message failed, not printing it"
                );
                summary.failed += 1;
                continue;
            }

            let text = compose(&msg, &self.compose);
            match self.printer.print_text(&text).await {
                Ok(report) => {
                    info!(
                        account = %msg.account,
                        id = %msg.id,
                        lines = report.lines_sent,
                        "Message printed"
                    );
                    summary.printed += 1;
                }
                Err(e) => {
                    error!(account = %msg.account, id = %msg.id, error = %e, "Message print failed");
                    summary.failed += 1;
                }
            }
        }

        if summary.printed + summary.failed == 0 {
            info!("No new messages");
        }
        Ok(summary)
    }
}
