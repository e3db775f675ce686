//! Reader surface over a tabular entry.
//!
//! Row materialization is not this crate's concern: a [`RowSet`] hands out
//! the raw tuple lines exactly as the server shipped them, for a row
//! decoder to interpret. The reader shares its entry's table handle, so its
//! validity ends the moment the entry is released, whether by advancing the
//! cursor past it or by closing the statement.

use crate::error::StatementError;
use crate::result::TableData;
use crate::statement::{FetchDirection, ResultSetType};
use std::sync::Arc;

/// Forward reader over the raw rows of one tabular result.
#[derive(Debug)]
pub struct RowSet {
    table: Arc<TableData>,
    fetch_direction: FetchDirection,
    result_set_type: ResultSetType,
    offset: usize,
}

impl RowSet {
    pub(crate) fn new(
        table: Arc<TableData>,
        fetch_direction: FetchDirection,
        result_set_type: ResultSetType,
    ) -> Result<RowSet, StatementError> {
        if table.is_closed() {
            return Err(StatementError::InvalidState(
                "result was released before a reader could be built".into(),
            ));
        }
        Ok(RowSet {
            table,
            fetch_direction,
            result_set_type,
            offset: 0,
        })
    }

    /// Column names of the underlying result, in server order.
    pub fn column_names(&self) -> &[String] {
        self.table.column_names()
    }

    /// Number of rows the server reported for this result.
    pub fn row_count(&self) -> u64 {
        self.table.row_count()
    }

    /// The fetch direction of the statement that produced this result.
    pub fn fetch_direction(&self) -> FetchDirection {
        self.fetch_direction
    }

    /// The effective result set type of the producing statement.
    pub fn result_set_type(&self) -> ResultSetType {
        self.result_set_type
    }

    /// Whether the underlying result is still live.
    pub fn is_valid(&self) -> bool {
        !self.table.is_closed()
    }

    /// The next raw tuple line, or `None` past the last row.
    ///
    /// # Errors
    ///
    /// `InvalidState` once the underlying entry has been released, and
    /// `ProtocolDecode` if the server shipped a non-UTF-8 row block.
    pub fn next_row(&mut self) -> Result<Option<&str>, StatementError> {
        loop {
            if self.table.is_closed() {
                return Err(StatementError::InvalidState(
                    "result was released while a reader was still using it".into(),
                ));
            }
            let (start, end, next_offset) = {
                let rows = self.table.rows();
                if self.offset >= rows.len() {
                    return Ok(None);
                }
                let rest = &rows[self.offset..];
                match rest.iter().position(|&b| b == b'\n') {
                    Some(pos) => (self.offset, self.offset + pos, self.offset + pos + 1),
                    None => (self.offset, rows.len(), rows.len()),
                }
            };
            self.offset = next_offset;
            if start == end {
                // blank line between blocks
                continue;
            }
            let line = &self.table.rows()[start..end];
            return match std::str::from_utf8(line) {
                Ok(text) => Ok(Some(text)),
                Err(_) => Err(StatementError::ProtocolDecode {
                    payload: String::from_utf8_lossy(line).into_owned(),
                }),
            };
        }
    }
}
