//! Record of messages already sent to the printer
//!
//! Stored as an append-only text file with one `account:id` pair per line.

use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RelayResult;

#[derive(Debug)]
pub struct ProcessedLedger {
    path: PathBuf,
    entries: HashMap<String, HashSet<String>>,
}

impl ProcessedLedger {
    /// Load the ledger, treating a missing file as empty
    pub fn load(path: impl AsRef<Path>) -> RelayResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries: HashMap<String, HashSet<String>> = HashMap::new();

        if path.exists() {
            for line in fs::read_to_string(&path)?.lines() {
                let line = line.trim();
                // Account addresses never contain ':', ids may
                if let Some((account, id)) = line.split_once(':') {
                    entries
                        .entry(account.to_string())
                        .or_default()
                        .insert(id.trim().to_string());
                }
            }
        }

        debug!(path = %path.display(), accounts = entries.len(), "Loaded processed ledger");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, account: &str, id: &str) -> bool {
        self.entries
            .get(account)
            .is_some_and(|ids| ids.contains(id.trim()))
    }

    /// Mark a message as handled, appending to the file once
    pub fn record(&mut self, account: &str, id: &str) -> RelayResult<()> {
        let id = id.trim();
        if self.contains(account, id) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}:{}", account, id)?;

        self.entries
            .entry(account.to_string())
            .or_default()
            .insert(id.to_string());
        Ok(())
    }

    /// Number of recorded messages across all accounts
    pub fn len(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
