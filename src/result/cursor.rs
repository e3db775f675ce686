//! The ordered reply sequence of one submission.
//!
//! A cursor owns every [`ResultEntry`] a submission produced and exposes
//! them one at a time. At most one entry is current; advancing applies a
//! close policy to entries already exposed before the next one becomes
//! visible. A submission the server aborted partway through carries a
//! fault, replayed once iteration runs past the replies that preceded it.

use crate::error::ConnectionError;
use crate::result::ResultEntry;

/// What to do with already-exposed entries when advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Release only the entry currently exposed.
    CloseCurrent,
    /// Release nothing.
    KeepCurrent,
    /// Release the current entry and every earlier one not yet released.
    CloseAll,
}

/// Ordered container of the replies produced by one submission.
#[derive(Debug)]
pub struct ResultCursor {
    entries: Vec<ResultEntry>,
    fault: Option<String>,
    /// Index of the next entry to expose.
    next: usize,
    /// Index of the currently exposed entry, if any.
    current: Option<usize>,
    closed: bool,
}

impl ResultCursor {
    /// A cursor over a complete reply sequence.
    pub fn new(entries: Vec<ResultEntry>) -> ResultCursor {
        ResultCursor {
            entries,
            fault: None,
            next: 0,
            current: None,
            closed: false,
        }
    }

    /// A cursor for a submission the server aborted: the replies that
    /// arrived before the failure, followed by the server's error text.
    pub fn with_fault(entries: Vec<ResultEntry>, message: impl Into<String>) -> ResultCursor {
        let mut cursor = ResultCursor::new(entries);
        cursor.fault = Some(message.into());
        cursor
    }

    /// Number of entries in the sequence, exposed or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sequence holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The currently exposed entry, if any.
    pub fn current(&self) -> Option<&ResultEntry> {
        self.current.map(|i| &self.entries[i])
    }

    /// Mutable access to the currently exposed entry.
    pub fn current_mut(&mut self) -> Option<&mut ResultEntry> {
        match self.current {
            Some(i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Expose the next entry, or the no-entry sentinel past the end.
    ///
    /// # Errors
    ///
    /// Replays the stored fault once every preceding reply has been
    /// consumed. The fault is not consumed by being observed: like the
    /// sequence itself it belongs to the submission, and every advance past
    /// the end reports it again.
    pub fn advance(&mut self) -> Result<Option<&ResultEntry>, ConnectionError> {
        if self.closed {
            return Ok(None);
        }
        if self.next < self.entries.len() {
            self.current = Some(self.next);
            self.next += 1;
            return Ok(self.current());
        }
        self.current = None;
        match &self.fault {
            Some(message) => Err(ConnectionError::Rejected(message.clone())),
            None => Ok(None),
        }
    }

    /// Release only the currently exposed entry.
    pub fn close_current(&mut self) {
        if let Some(i) = self.current {
            self.entries[i].close();
        }
    }

    /// Release the currently exposed entry and every earlier one.
    pub fn close_current_and_older(&mut self) {
        for entry in &mut self.entries[..self.next] {
            entry.close();
        }
    }

    /// Release the whole sequence, including entries never exposed.
    /// Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for entry in &mut self.entries {
            entry.close();
        }
        self.current = None;
        self.closed = true;
    }
}
