//! In-memory printer used by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use flip_printer::{Connector, DeviceSession, PrintError, PrintResult};

/// Number of writes before the first payload line
pub const SETUP_WRITES: usize = 5;

/// Writes per payload line: text, wait, line feed
pub const WRITES_PER_LINE: usize = 3;

/// Index of the text write of payload line `n` (1-based)
pub fn payload_write(n: usize) -> usize {
    SETUP_WRITES + (n - 1) * WRITES_PER_LINE
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened,
    Sent(Vec<u8>),
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// Only the given write fails
    Once(usize),
    /// The given write and every later one fail
    From(usize),
}

#[derive(Debug, Default)]
struct Shared {
    events: Vec<Event>,
    writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingConnector {
    shared: Arc<Mutex<Shared>>,
    failure: Option<Failure>,
    refuse: bool,
    fail_close: bool,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.lock().unwrap().events.clone()
    }

    /// Successfully sent writes, in order
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sent(bytes) => Some(bytes),
                _ => None,
            })
            .collect()
    }

    /// Writes attempted, failed ones included
    pub fn attempts(&self) -> usize {
        self.shared.lock().unwrap().writes
    }

    pub fn count_sent(&self, bytes: &[u8]) -> usize {
        self.sent().iter().filter(|b| b.as_slice() == bytes).count()
    }

    pub fn close_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == Event::Closed)
            .count()
    }
}

impl Connector for RecordingConnector {
    type Session = RecordingSession;

    async fn open(&self) -> PrintResult<RecordingSession> {
        if self.refuse {
            return Err(PrintError::Connection("refused".into()));
        }
        self.shared.lock().unwrap().events.push(Event::Opened);
        Ok(RecordingSession {
            shared: Arc::clone(&self.shared),
            failure: self.failure,
            fail_close: self.fail_close,
        })
    }

    fn endpoint(&self) -> String {
        "memory".into()
    }
}

pub struct RecordingSession {
    shared: Arc<Mutex<Shared>>,
    failure: Option<Failure>,
    fail_close: bool,
}

impl DeviceSession for RecordingSession {
    async fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        let mut shared = self.shared.lock().unwrap();
        let index = shared.writes;
        shared.writes += 1;

        let fails = match self.failure {
            Some(Failure::Once(n)) => index == n,
            Some(Failure::From(n)) => index >= n,
            None => false,
        };
        if fails {
            return Err(PrintError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }

        shared.events.push(Event::Sent(data.to_vec()));
        Ok(())
    }

    async fn close(self) -> PrintResult<()> {
        self.shared.lock().unwrap().events.push(Event::Closed);
        if self.fail_close {
            return Err(PrintError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            )));
        }
        Ok(())
    }
}
