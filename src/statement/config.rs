//! Statement configuration types.
//!
//! These enums describe the advisory read hints a statement forwards to the
//! server with every submission, and the capability surface for operations
//! this driver deliberately does not implement.

use std::fmt;

/// Type of result set a statement asks the server to produce.
///
/// `ScrollSensitive` can be requested but is never retained: the server has
/// no change-sensitive cursors, so a statement downgrades the request to
/// `ScrollInsensitive` at construction time and records a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultSetType {
    /// The cursor only moves forward.
    #[default]
    ForwardOnly,
    /// Scrollable, not sensitive to changes made by others.
    ScrollInsensitive,
    /// Scrollable and change-sensitive. Requestable, never effective.
    ScrollSensitive,
}

/// Concurrency mode of the result sets a statement produces.
///
/// Only `ReadOnly` is ever effective; an `Updatable` request is downgraded
/// with a warning at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultSetConcurrency {
    /// Result sets may not be updated in place.
    #[default]
    ReadOnly,
    /// Updatable result sets. Requestable, never effective.
    Updatable,
}

/// Suggested direction in which rows will be processed.
///
/// Purely advisory; the server is free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchDirection {
    /// Rows are processed first to last.
    #[default]
    Forward,
    /// Rows are processed last to first.
    Reverse,
    /// No preference.
    Unknown,
}

/// Operations a statement can be asked to perform.
///
/// The driver declares support in one place instead of scattering stub
/// methods: call [`Operation::is_supported`] to probe, or let
/// [`Statement::ensure_supported`](crate::Statement::ensure_supported)
/// produce the uniform `Unsupported` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Execute a command with multi-result iteration.
    Execute,
    /// Execute a command expected to produce a single result set.
    ExecuteQuery,
    /// Execute a command expected to produce an update count.
    ExecuteUpdate,
    /// Execute the accumulated batch.
    ExecuteBatch,
    /// Advance to the next result of a submission.
    MoreResults,
    /// Abort a command in flight.
    Cancel,
    /// Bound the execution time of a command.
    QueryTimeout,
    /// Retrieve keys generated by an insert.
    GeneratedKeys,
    /// Limit the byte size of individual column values.
    MaxFieldSize,
    /// Keep result sets open across transaction boundaries.
    Holdability,
    /// Name the server-side cursor of a result set.
    CursorName,
    /// Client-side escape-sequence rewriting.
    EscapeProcessing,
    /// Per-column batch parameter binding.
    ColumnBatch,
}

impl Operation {
    /// Whether this driver implements the operation.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Operation::Execute
                | Operation::ExecuteQuery
                | Operation::ExecuteUpdate
                | Operation::ExecuteBatch
                | Operation::MoreResults
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Execute => "command execution",
            Operation::ExecuteQuery => "query execution",
            Operation::ExecuteUpdate => "update execution",
            Operation::ExecuteBatch => "batch execution",
            Operation::MoreResults => "result iteration",
            Operation::Cancel => "query cancellation",
            Operation::QueryTimeout => "query timeouts",
            Operation::GeneratedKeys => "generated-key retrieval",
            Operation::MaxFieldSize => "field-size limits",
            Operation::Holdability => "result-set holdability",
            Operation::CursorName => "named cursors",
            Operation::EscapeProcessing => "escape processing",
            Operation::ColumnBatch => "per-column batches",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fresh_statement() {
        assert_eq!(ResultSetType::default(), ResultSetType::ForwardOnly);
        assert_eq!(
            ResultSetConcurrency::default(),
            ResultSetConcurrency::ReadOnly
        );
        assert_eq!(FetchDirection::default(), FetchDirection::Forward);
    }

    #[test]
    fn test_supported_operations() {
        assert!(Operation::Execute.is_supported());
        assert!(Operation::ExecuteQuery.is_supported());
        assert!(Operation::ExecuteUpdate.is_supported());
        assert!(Operation::ExecuteBatch.is_supported());
        assert!(Operation::MoreResults.is_supported());
    }

    #[test]
    fn test_unsupported_operations() {
        for op in [
            Operation::Cancel,
            Operation::QueryTimeout,
            Operation::GeneratedKeys,
            Operation::MaxFieldSize,
            Operation::Holdability,
            Operation::CursorName,
            Operation::EscapeProcessing,
            Operation::ColumnBatch,
        ] {
            assert!(!op.is_supported(), "{op} should be unsupported");
        }
    }

    #[test]
    fn test_operation_display_names() {
        assert_eq!(Operation::Cancel.to_string(), "query cancellation");
        assert_eq!(Operation::ColumnBatch.to_string(), "per-column batches");
    }
}
