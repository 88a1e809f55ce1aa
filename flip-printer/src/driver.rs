//! Upside-down print job driver
//!
//! One job is one session:
//!
//! ```text
//! Idle -> ConfiguringOrientation -> Streaming(n) -> RestoringOrientation -> Cutting -> Closed
//! ```
//!
//! Once the session is open, orientation restore, reset, cut and close run
//! on every exit path. A transport fault while configuring or streaming
//! skips the remaining payload and goes straight to teardown. A partially
//! streamed job is never resent.

use std::fmt;

use tracing::{debug, error, info, instrument, warn};

use crate::buffer::PrintBuffer;
use crate::encoding::encode;
use crate::error::{PrintError, PrintResult};
use crate::escpos::{Charset, CodeTable, Command, KanjiCode};
use crate::layout::{DEFAULT_MAX_WIDTH, Document, PhysicalLine};
use crate::printer::{Connector, DeviceSession};

/// Left margin used by the target receipt printers (24mm)
pub const DEFAULT_LEFT_MARGIN: u16 = 192;

/// Lines fed before cutting so the last line clears the cutter
pub const DEFAULT_CUT_FEED_LINES: u8 = 6;

/// Command that a job was executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStep {
    Connect,
    LeftMargin,
    InternationalCharset,
    CharacterTable,
    KanjiCodeSystem,
    UpsideDownOn,
    /// Payload line, 1-based in print order
    Payload(usize),
    UpsideDownOff,
    Initialize,
    Cut,
    Close,
}

impl fmt::Display for JobStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStep::Connect => f.write_str("connect"),
            JobStep::LeftMargin => f.write_str("left margin"),
            JobStep::InternationalCharset => f.write_str("international charset"),
            JobStep::CharacterTable => f.write_str("character table"),
            JobStep::KanjiCodeSystem => f.write_str("kanji code system"),
            JobStep::UpsideDownOn => f.write_str("upside-down on"),
            JobStep::Payload(line) => write!(f, "payload line {}", line),
            JobStep::UpsideDownOff => f.write_str("upside-down off"),
            JobStep::Initialize => f.write_str("initialize"),
            JobStep::Cut => f.write_str("cut"),
            JobStep::Close => f.write_str("close"),
        }
    }
}

/// Job lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Idle,
    ConfiguringOrientation,
    /// Number of payload lines fully sent so far
    Streaming(usize),
    RestoringOrientation,
    Cutting,
    Closed,
}

/// Layout and protocol settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Wrap width in dots
    pub max_width_dots: u32,
    pub left_margin_dots: u16,
    pub cut_feed_lines: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_width_dots: DEFAULT_MAX_WIDTH,
            left_margin_dots: DEFAULT_LEFT_MARGIN,
            cut_feed_lines: DEFAULT_CUT_FEED_LINES,
        }
    }
}

/// Outcome of a completed job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobReport {
    pub lines_sent: usize,
    pub bytes_sent: usize,
}

type StepResult<T> = Result<T, (JobStep, PrintError)>;

/// Per-job bookkeeping
struct Job {
    state: JobState,
    report: JobReport,
}

impl Job {
    fn new() -> Self {
        Self {
            state: JobState::Idle,
            report: JobReport::default(),
        }
    }

    fn transition(&mut self, next: JobState) {
        debug!(from = ?self.state, to = ?next, "job state");
        self.state = next;
    }

    async fn send<S: DeviceSession>(
        &mut self,
        session: &mut S,
        step: JobStep,
        cmd: &Command,
    ) -> StepResult<()> {
        let bytes = cmd.to_bytes();
        session.send(&bytes).await.map_err(|e| (step, e))?;
        self.report.bytes_sent += bytes.len();
        Ok(())
    }
}

/// Drives the ESC/POS command sequence for one buffer at a time
#[derive(Debug, Clone, Default)]
pub struct ProtocolDriver {
    config: DriverConfig,
}

impl ProtocolDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Commands sent before the payload
    pub fn setup_commands(&self) -> Vec<(JobStep, Command)> {
        vec![
            (
                JobStep::LeftMargin,
                Command::LeftMargin(self.config.left_margin_dots),
            ),
            (
                JobStep::InternationalCharset,
                Command::InternationalCharset(Charset::Japan),
            ),
            (
                JobStep::CharacterTable,
                Command::CharacterTable(CodeTable::Katakana),
            ),
            (
                JobStep::KanjiCodeSystem,
                Command::KanjiCodeSystem(KanjiCode::ShiftJis),
            ),
            (JobStep::UpsideDownOn, Command::UpsideDown(true)),
        ]
    }

    /// Commands sent after the payload, whatever happened before
    pub fn teardown_commands(&self) -> Vec<(JobStep, Command)> {
        vec![
            (JobStep::UpsideDownOff, Command::UpsideDown(false)),
            (JobStep::Initialize, Command::Initialize),
            (JobStep::Cut, Command::Feed(self.config.cut_feed_lines)),
            (JobStep::Cut, Command::FullCut),
        ]
    }

    /// Print and clear `buffer` as one job on a fresh session
    ///
    /// The buffer is empty when this returns, whether or not the job
    /// succeeded. Cleanup faults are logged and never replace the original
    /// error.
    #[instrument(skip_all, fields(endpoint = %connector.endpoint(), lines = buffer.len()))]
    pub async fn print_buffer<C: Connector>(
        &self,
        connector: &C,
        buffer: &mut PrintBuffer,
    ) -> PrintResult<JobReport> {
        let lines = buffer.drain();
        let mut job = Job::new();

        let mut session = match connector.open().await {
            Ok(session) => session,
            Err(e) => {
                error!(step = %JobStep::Connect, error = %e, "Printer connection failed");
                job.transition(JobState::Closed);
                return Err(PrintError::Transport {
                    step: JobStep::Connect,
                    source: Box::new(e),
                });
            }
        };

        let streamed = self.stream(&mut job, &mut session, &lines).await;
        if let Err((step, e)) = &streamed {
            error!(
                step = %step,
                lines_sent = job.report.lines_sent,
                error = %e,
                "Print job aborted, restoring printer"
            );
        }

        self.teardown(&mut job, session).await;

        match streamed {
            Ok(()) => {
                info!(
                    lines = job.report.lines_sent,
                    bytes = job.report.bytes_sent,
                    "Print job sent successfully"
                );
                Ok(job.report)
            }
            Err((step, e)) => Err(PrintError::Transport {
                step,
                source: Box::new(e),
            }),
        }
    }

    async fn stream<S: DeviceSession>(
        &self,
        job: &mut Job,
        session: &mut S,
        lines: &[PhysicalLine],
    ) -> StepResult<()> {
        job.transition(JobState::ConfiguringOrientation);
        for (step, cmd) in self.setup_commands() {
            job.send(session, step, &cmd).await?;
        }

        job.transition(JobState::Streaming(0));
        for (i, line) in lines.iter().enumerate() {
            // Encoded right before sending, never kept
            let text = Command::Text(encode(&line.text));
            let step = JobStep::Payload(i + 1);
            job.send(session, step, &text).await?;
            job.send(session, step, &Command::WaitPrintComplete).await?;
            job.send(session, step, &Command::LineFeed).await?;
            job.report.lines_sent = i + 1;
            job.transition(JobState::Streaming(i + 1));
        }

        Ok(())
    }

    async fn teardown<S: DeviceSession>(&self, job: &mut Job, mut session: S) {
        // A failed command does not stop the rest unless the connection is gone
        for (step, cmd) in self.teardown_commands() {
            match step {
                JobStep::UpsideDownOff if job.state != JobState::RestoringOrientation => {
                    job.transition(JobState::RestoringOrientation)
                }
                JobStep::Cut if job.state != JobState::Cutting => {
                    job.transition(JobState::Cutting)
                }
                _ => {}
            }
            if let Err((step, e)) = job.send(&mut session, step, &cmd).await {
                warn!(step = %step, error = %e, "Printer cleanup failed");
                if e.is_connection_lost() {
                    debug!("Connection lost, skipping remaining cleanup commands");
                    break;
                }
            }
        }

        if let Err(e) = session.close().await {
            warn!(step = %JobStep::Close, error = %e, "Closing printer connection failed");
        }
        job.transition(JobState::Closed);
    }
}

/// Prints whole documents through one connector
///
/// Every call builds its own buffer and opens its own session, so nothing
/// carries over from one receipt to the next.
#[derive(Debug, Clone)]
pub struct FlipPrinter<C> {
    connector: C,
    driver: ProtocolDriver,
}

impl<C: Connector> FlipPrinter<C> {
    pub fn new(connector: C, config: DriverConfig) -> Self {
        Self {
            connector,
            driver: ProtocolDriver::new(config),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Lay out and print one document
    pub async fn print_document(&self, doc: &Document) -> PrintResult<JobReport> {
        let mut buffer = PrintBuffer::new(self.driver.config().max_width_dots);
        buffer.append_document(doc);
        self.driver.print_buffer(&self.connector, &mut buffer).await
    }

    /// Normalize, lay out and print raw message text
    pub async fn print_text(&self, raw: &str) -> PrintResult<JobReport> {
        self.print_document(&Document::new(raw)).await
    }
}
