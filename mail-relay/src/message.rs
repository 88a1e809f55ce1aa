//! Decoded mail messages and their receipt text

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Suffix appended to truncated bodies
pub const TRUNCATION_SUFFIX: &str = "... [content too long]";

/// Shown when the received time is missing or unparsable
pub const UNKNOWN_TIME: &str = "Unknown";

/// One message as handed over by the mail-ingestion side
///
/// Header fields are already MIME-decoded and the body is plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Mailbox UID
    pub id: String,
    /// Receiving account address
    pub account: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from: String,
    /// Raw `Date` header (RFC 2822) or an RFC 3339 timestamp
    #[serde(default)]
    pub received_at: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl MailMessage {
    /// Parsed `received_at`, if present and valid
    pub fn received_time(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.received_at.as_deref()?.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }
}

/// How messages are turned into receipt text
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub max_body_chars: usize,
    pub timezone: Tz,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            max_body_chars: 300,
            timezone: chrono_tz::Asia::Tokyo,
        }
    }
}

/// Cut `body` to `max_chars` characters, marking the cut
pub fn truncate_body(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &body[..idx], TRUNCATION_SUFFIX),
        None => body.to_string(),
    }
}

/// Format the received time in the configured zone
pub fn format_received(msg: &MailMessage, tz: Tz) -> String {
    match msg.received_time() {
        Some(dt) => dt.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Receipt text: header lines, a blank line, then the body
pub fn compose(msg: &MailMessage, opts: &ComposeOptions) -> String {
    format!(
        "To: {}\nReceived at: {}\nSubject: {}\nFrom: {}\n\n{}",
        msg.account,
        format_received(msg, opts.timezone),
        msg.subject,
        msg.from,
        truncate_body(&msg.body, opts.max_body_chars),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            id: "42".into(),
            account: "me@example.com".into(),
            subject: "Test".into(),
            from: "A <a@example.com>".into(),
            received_at: Some("Tue, 1 Oct 2024 10:00:00 +0000".into()),
            body: "Hello".into(),
        }
    }

    #[test]
    fn test_compose() {
        let text = compose(&message(), &ComposeOptions::default());
        assert_eq!(
            text,
            "To: me@example.com\nReceived at: 2024-10-01 19:00:00\nSubject: Test\nFrom: A <a@example.com>\n\nHello"
        );
    }

    #[test]
    fn test_received_rfc3339_and_zone() {
        let mut msg = message();
        msg.received_at = Some("2024-10-01T10:00:00Z".into());
        assert_eq!(format_received(&msg, chrono_tz::UTC), "2024-10-01 10:00:00");
    }

    #[test]
    fn test_received_unknown() {
        let mut msg = message();
        msg.received_at = Some("not a date".into());
        assert_eq!(format_received(&msg, chrono_tz::Asia::Tokyo), UNKNOWN_TIME);
        msg.received_at = None;
        assert_eq!(format_received(&msg, chrono_tz::Asia::Tokyo), UNKNOWN_TIME);
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short", 300), "short");
        assert_eq!(truncate_body("abcdef", 6), "abcdef");
        assert_eq!(truncate_body("abcdef", 3), format!("abc{}", TRUNCATION_SUFFIX));
        // Counted in characters, not bytes
        assert_eq!(truncate_body("日本語です", 2), format!("日本{}", TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_deserialize_defaults() {
        let msg: MailMessage =
            serde_json::from_str(r#"{"id": "7", "account": "me@example.com"}"#).unwrap();
        assert_eq!(msg.subject, "");
        assert_eq!(msg.received_at, None);
        assert_eq!(msg.body, "");
    }

    #[test]
    fn test_deserialize_received_at() {
        let msg: MailMessage = serde_json::from_str(
            r#"{"id": "7", "account": "me@example.com", "received_at": "Tue, 1 Oct 2024 10:00:00 +0000"}"#,
        )
        .unwrap();
        assert_eq!(format_received(&msg, chrono_tz::UTC), "2024-10-01 10:00:00");
    }
}
