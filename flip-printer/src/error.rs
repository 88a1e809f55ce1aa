//! Error types for the printer library

use crate::driver::JobStep;
use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A print job was aborted by a transport fault
    ///
    /// `step` names the command that failed. Cleanup has already run when
    /// this is returned.
    #[error("Transport failed during {step}: {source}")]
    Transport {
        step: JobStep,
        #[source]
        source: Box<PrintError>,
    },
}

impl PrintError {
    /// The job step that failed, if this is a transport failure
    pub fn step(&self) -> Option<JobStep> {
        match self {
            PrintError::Transport { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Whether the session is gone and further writes cannot succeed
    ///
    /// A timeout leaves the connection open, so it does not count.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            PrintError::Connection(_) | PrintError::Io(_) => true,
            PrintError::Transport { source, .. } => source.is_connection_lost(),
            PrintError::Timeout(_) | PrintError::InvalidConfig(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_lost() {
        let reset = PrintError::Io(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
        assert!(reset.is_connection_lost());
        assert!(!PrintError::Timeout("Write timeout".into()).is_connection_lost());

        let wrapped = PrintError::Transport {
            step: JobStep::Cut,
            source: Box::new(reset),
        };
        assert!(wrapped.is_connection_lost());
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
