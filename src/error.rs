//! Error types for the driver.
//!
//! Each concern gets its own enum: [`ConnectionError`] for failures at the
//! transport seam, [`StatementError`] for everything a statement operation
//! can report, and [`BatchError`] for a failed batch together with the
//! update counts collected before the failure.

use crate::statement::Operation;
use thiserror::Error;

/// Update count reported when a command succeeded but no row count is
/// available: schema statements, and batch commands whose result set was
/// ignored.
pub const SUCCESS_NO_INFO: i64 = -2;

/// Failures raised by the transport seam.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The underlying connection failed at the wire level.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server refused a submitted command.
    #[error("server rejected command: {0}")]
    Rejected(String),

    /// Connection parameters or URL were malformed.
    #[error("invalid connection parameters: {0}")]
    Config(String),

    /// The connection has been closed.
    #[error("connection is closed")]
    Closed,
}

/// Failures raised by statement operations.
#[derive(Debug, Error)]
pub enum StatementError {
    /// A configuration value was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The statement was closed, or the current result had the wrong shape
    /// for the requested operation.
    #[error("invalid statement state: {0}")]
    InvalidState(String),

    /// The operation is declared unsupported by this driver.
    #[error("{0} is not supported by this driver")]
    Unsupported(Operation),

    /// The server sent a payload this driver could not decode.
    #[error("server sent unparsable payload: {payload:?}")]
    ProtocolDecode {
        /// The raw payload as received.
        payload: String,
    },

    /// A failure propagated from the transport seam.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A batch stopped at its first failing command.
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// A batch failure carrying the counts accumulated before the failing
/// command. Batches are strictly fail-fast: commands after the failure were
/// never attempted.
#[derive(Debug, Error)]
#[error("batch stopped after {} completed commands: {source}", counts.len())]
pub struct BatchError {
    /// Update counts of the commands that completed, in submission order.
    pub counts: Vec<i64>,
    /// The failure that stopped the batch.
    #[source]
    pub source: Box<StatementError>,
}

impl BatchError {
    /// Wrap a failure together with the counts collected so far.
    pub fn new(counts: Vec<i64>, source: StatementError) -> Self {
        Self {
            counts,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_reports_completed_count() {
        let err = BatchError::new(
            vec![1, 1],
            StatementError::Connection(ConnectionError::Rejected("syntax error".into())),
        );
        let msg = err.to_string();
        assert!(msg.contains("2 completed commands"), "got: {msg}");
        assert!(msg.contains("syntax error"), "got: {msg}");
    }

    #[test]
    fn test_connection_error_converts() {
        fn fails() -> Result<(), StatementError> {
            Err(ConnectionError::Closed)?
        }
        assert!(matches!(
            fails(),
            Err(StatementError::Connection(ConnectionError::Closed))
        ));
    }

    #[test]
    fn test_unsupported_message_names_operation() {
        let err = StatementError::Unsupported(Operation::Cancel);
        assert_eq!(
            err.to_string(),
            "query cancellation is not supported by this driver"
        );
    }
}
