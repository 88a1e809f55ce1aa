//! Spool directory of decoded messages
//!
//! The mail-ingestion side drops one JSON file per message. Files are read
//! in name order so that zero-padded UIDs print oldest first.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::error::{RelayError, RelayResult};
use crate::message::MailMessage;

/// Parse one spool file
pub fn read_message(path: &Path) -> RelayResult<MailMessage> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| RelayError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every `*.json` message in `dir`
///
/// A missing directory yields no messages. Files that cannot be parsed are
/// logged and skipped.
pub fn load_messages(dir: &Path) -> RelayResult<Vec<MailMessage>> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "Spool directory does not exist");
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut messages = Vec::with_capacity(paths.len());
    for path in paths {
        match read_message(&path) {
            Ok(msg) => messages.push(msg),
            Err(e) => error!(error = %e, "Skipping spool file"),
        }
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("0002.json"),
            r#"{"id": "2", "account": "me@example.com", "subject": "second"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("0001.json"),
            r#"{"id": "1", "account": "me@example.com", "subject": "first"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("readme.txt"), "not a message").unwrap();

        let messages = load_messages(dir.path()).unwrap();
        let ids: Vec<_> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_bad_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "{ broken").unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"id": "9", "account": "me@example.com"}"#,
        )
        .unwrap();

        let messages = load_messages(dir.path()).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            read_message(&dir.path().join("a.json")),
            Err(RelayError::Json { .. })
        ));
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_messages(&dir.path().join("nope")).unwrap().is_empty());
    }
}
