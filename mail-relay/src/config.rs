use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use flip_printer::{DEFAULT_CUT_FEED_LINES, DEFAULT_LEFT_MARGIN, DEFAULT_MAX_WIDTH, DriverConfig};

/// Relay configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// loaded first):
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./work_dir | Base directory for spool, ledger and logs |
/// | PRINTER_HOST | 192.168.1.100 | Printer IP address |
/// | PRINTER_PORT | 9100 | Raw printing port |
/// | PRINTER_TIMEOUT_MS | 5000 | Connect and write timeout |
/// | LINE_WIDTH_DOTS | 384 | Wrap width |
/// | LEFT_MARGIN_DOTS | 192 | Left margin |
/// | CUT_FEED_LINES | 6 | Lines fed before the cut |
/// | SPOOL_DIR | $WORK_DIR/spool | Decoded messages (`*.json`) |
/// | PROCESSED_FILE | $WORK_DIR/processed_mails.txt | Printed message ledger |
/// | MAX_BODY_CHARS | 300 | Body length before truncation |
/// | TIMEZONE | Asia/Tokyo | Zone for the "Received at" line |
/// | POLL_INTERVAL_SECS | unset | Run repeatedly instead of once |
/// | LOG_LEVEL | info | Log filter |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | unset | Daily rotating log files |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub printer_host: String,
    pub printer_port: u16,
    pub printer_timeout: Duration,
    pub line_width_dots: u32,
    pub left_margin_dots: u16,
    pub cut_feed_lines: u8,
    pub spool_dir: PathBuf,
    pub processed_file: PathBuf,
    pub max_body_chars: usize,
    pub timezone: Tz,
    pub poll_interval: Option<Duration>,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let work_dir: PathBuf = std::env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./work_dir"));

        Self {
            printer_host: std::env::var("PRINTER_HOST")
                .unwrap_or_else(|_| "192.168.1.100".into()),
            printer_port: env_parse("PRINTER_PORT").unwrap_or(flip_printer::DEFAULT_PORT),
            printer_timeout: Duration::from_millis(
                env_parse("PRINTER_TIMEOUT_MS").unwrap_or(5000),
            ),
            line_width_dots: env_parse("LINE_WIDTH_DOTS").unwrap_or(DEFAULT_MAX_WIDTH),
            left_margin_dots: env_parse("LEFT_MARGIN_DOTS").unwrap_or(DEFAULT_LEFT_MARGIN),
            cut_feed_lines: env_parse("CUT_FEED_LINES").unwrap_or(DEFAULT_CUT_FEED_LINES),
            spool_dir: std::env::var("SPOOL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| work_dir.join("spool")),
            processed_file: std::env::var("PROCESSED_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| work_dir.join("processed_mails.txt")),
            max_body_chars: env_parse("MAX_BODY_CHARS").unwrap_or(300),
            timezone: env_parse("TIMEZONE").unwrap_or(chrono_tz::Asia::Tokyo),
            poll_interval: env_parse::<u64>("POLL_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok(),
            work_dir,
        }
    }

    /// Layout and protocol settings for the printer
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            max_width_dots: self.line_width_dots,
            left_margin_dots: self.left_margin_dots,
            cut_feed_lines: self.cut_feed_lines,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
