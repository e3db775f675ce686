//! One typed reply from the server.
//!
//! A single submission can produce a heterogeneous sequence of replies: a
//! table, an update count, a schema acknowledgment, a transaction
//! acknowledgment. [`ResultEntry`] is one such reply, tagged with the
//! server's reply-kind code and carrying a payload appropriate to the kind.

use crate::transport::CommandTransport;
use bytes::Bytes;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reply-kind codes as sent by the server.
///
/// The numeric values are part of the server contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResultKind {
    /// End of the reply sequence.
    End = 0,
    /// Parse acknowledgment.
    Parse = 1,
    /// Generic result acknowledgment.
    Result = 2,
    /// A tabular result with rows.
    Table = 3,
    /// An update count for a data-modifying command.
    UpdateCount = 4,
    /// A raw data block.
    Data = 5,
    /// Acknowledgment of a schema change (create, drop, alter).
    SchemaChange = 6,
    /// Transaction acknowledgment.
    Transaction = 7,
    /// Debugger output.
    Debug = 8,
    /// Debugger prompt prefix.
    DebugPrefix = 9,
}

impl ResultKind {
    /// Decode a wire code into a reply kind.
    pub fn from_code(code: u8) -> Option<ResultKind> {
        match code {
            0 => Some(ResultKind::End),
            1 => Some(ResultKind::Parse),
            2 => Some(ResultKind::Result),
            3 => Some(ResultKind::Table),
            4 => Some(ResultKind::UpdateCount),
            5 => Some(ResultKind::Data),
            6 => Some(ResultKind::SchemaChange),
            7 => Some(ResultKind::Transaction),
            8 => Some(ResultKind::Debug),
            9 => Some(ResultKind::DebugPrefix),
            _ => None,
        }
    }

    /// The wire code for this kind.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Shared handle to a tabular result.
///
/// Holds the server-side result id, the column names, and the raw row block
/// as shipped by the server. The handle is shared between the owning
/// [`ResultEntry`] and any reader wrapping it; closing the entry flips the
/// closed flag, which invalidates every reader.
pub struct TableData {
    result_id: u64,
    column_names: Vec<String>,
    rows: Bytes,
    row_count: u64,
    closed: AtomicBool,
    transport: Option<Arc<dyn CommandTransport>>,
}

impl TableData {
    /// Create a table handle with no server-side resource attached.
    pub fn new(
        result_id: u64,
        column_names: Vec<String>,
        rows: Bytes,
        row_count: u64,
    ) -> TableData {
        TableData {
            result_id,
            column_names,
            rows,
            row_count,
            closed: AtomicBool::new(false),
            transport: None,
        }
    }

    /// Attach the transport that owns the server-side result, so closing
    /// the entry releases it.
    pub fn with_transport(mut self, transport: Arc<dyn CommandTransport>) -> TableData {
        self.transport = Some(transport);
        self
    }

    /// Server-side id of this result.
    pub fn result_id(&self) -> u64 {
        self.result_id
    }

    /// Column names, in server order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The raw row block: newline-separated tuples as shipped by the server.
    pub fn rows(&self) -> &Bytes {
        &self.rows
    }

    /// Number of rows in the result.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Whether the owning entry has been released.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Release the server-side result. Idempotent; the discard is fired at
    /// most once.
    pub(crate) fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            if let Some(transport) = &self.transport {
                transport.discard_result(self.result_id);
            }
        }
    }
}

impl fmt::Debug for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableData")
            .field("result_id", &self.result_id)
            .field("column_names", &self.column_names)
            .field("row_count", &self.row_count)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// One reply of a submission.
#[derive(Debug)]
pub struct ResultEntry {
    kind: ResultKind,
    payload: Option<String>,
    table: Option<Arc<TableData>>,
    closed: bool,
}

impl ResultEntry {
    /// An entry with no payload (schema change, transaction ack, ...).
    pub fn of_kind(kind: ResultKind) -> ResultEntry {
        ResultEntry {
            kind,
            payload: None,
            table: None,
            closed: false,
        }
    }

    /// An update-count entry carrying the server's textual count, parsed
    /// lazily when the count is consumed.
    pub fn update_count(payload: impl Into<String>) -> ResultEntry {
        ResultEntry {
            kind: ResultKind::UpdateCount,
            payload: Some(payload.into()),
            table: None,
            closed: false,
        }
    }

    /// A tabular entry owning the given table handle.
    pub fn table(data: TableData) -> ResultEntry {
        ResultEntry {
            kind: ResultKind::Table,
            payload: None,
            table: Some(Arc::new(data)),
            closed: false,
        }
    }

    /// The reply kind of this entry.
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Whether this entry has been released.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The table handle, if this is an open tabular entry.
    pub fn table_data(&self) -> Option<&Arc<TableData>> {
        if self.closed {
            return None;
        }
        self.table.as_ref()
    }

    /// The textual update count, if this is an open update-count entry.
    /// Returns `None` once the count has been consumed.
    pub fn update_count_payload(&self) -> Option<&str> {
        if self.closed || self.kind != ResultKind::UpdateCount {
            return None;
        }
        self.payload.as_deref()
    }

    /// Release any server-side resource tied to this entry. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(table) = &self.table {
            table.close();
        }
    }
}
