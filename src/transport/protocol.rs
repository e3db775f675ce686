//! Transport seam consumed by the statement layer.
//!
//! The statement layer never touches the wire. Everything below the
//! submission boundary (socket handling, the block protocol, login, reply
//! decoding) lives behind [`CommandTransport`]. A transport turns one
//! submitted command text into a [`ResultCursor`] holding the ordered reply
//! sequence, and later releases server-side results the statement layer has
//! finished with.

use crate::error::ConnectionError;
use crate::result::ResultCursor;
use crate::statement::{ResultSetConcurrency, ResultSetType};
use async_trait::async_trait;

/// Advisory hints forwarded to the server with every submission.
///
/// Hints never change the meaning of a command; the server may honor or
/// ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitHints {
    /// Preferred reply block size in rows; 0 leaves it to the server.
    pub fetch_size: i64,
    /// Cap on rows per result set; 0 means unlimited.
    pub max_rows: i64,
    /// Effective result set type of the submitting statement.
    pub result_set_type: ResultSetType,
    /// Effective concurrency of the submitting statement.
    pub concurrency: ResultSetConcurrency,
}

/// One logical submission channel to the server.
///
/// Implementations own the socket and the wire protocol. `submit` may
/// pipeline work on a background reader task; the returned cursor must be
/// complete enough that iterating it never requires cooperation from the
/// caller's scheduling.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Submit one command text (possibly carrying multiple statements) and
    /// return the ordered reply sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] on transport-level failures. A command
    /// the server parsed and then rejected may instead surface as a fault
    /// inside the returned cursor, after any replies that preceded it.
    async fn submit(
        &self,
        command: &str,
        hints: &SubmitHints,
    ) -> Result<ResultCursor, ConnectionError>;

    /// Release a server-side result the statement layer no longer needs.
    ///
    /// Fire-and-forget: implementations queue the release and piggyback it
    /// on later traffic. Must tolerate ids the server already dropped.
    fn discard_result(&self, result_id: u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_carry_statement_config() {
        let hints = SubmitHints {
            fetch_size: 250,
            max_rows: 1000,
            result_set_type: ResultSetType::ScrollInsensitive,
            concurrency: ResultSetConcurrency::ReadOnly,
        };
        assert_eq!(hints.fetch_size, 250);
        assert_eq!(hints.max_rows, 1000);
        assert_eq!(hints.result_set_type, ResultSetType::ScrollInsensitive);
    }

    #[test]
    fn test_transport_is_object_safe() {
        fn _takes_dyn(_t: &dyn CommandTransport) {}
    }
}
