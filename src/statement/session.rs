//! The caller-facing statement object.
//!
//! A [`Statement`] submits command text through the transport seam and
//! exposes the server's reply sequence one result at a time: `execute`
//! positions on the first reply, `more_results` walks the rest, and
//! `update_count` / `result_set` read whichever shape the current reply
//! has. Batched commands go through the same iteration loop and aggregate
//! their counts fail-fast.
//!
//! Only one result of a statement is exposed at a time. Every execution
//! method implicitly closes the previous reply sequence, and every
//! state-mutating call runs under the statement's mutex for its whole
//! duration, so concurrent callers cannot interleave result advancement.

use crate::error::{BatchError, StatementError, SUCCESS_NO_INFO};
use crate::result::{CloseMode, ResultCursor, ResultKind, RowSet};
use crate::statement::batch::BatchBuffer;
use crate::statement::config::{
    FetchDirection, Operation, ResultSetConcurrency, ResultSetType,
};
use crate::transport::{CommandTransport, SubmitHints};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default row cap: 0, meaning unlimited.
pub const DEFAULT_MAX_ROWS: i64 = 0;

/// A statement slot on one connection.
///
/// Created by [`Connection::create_statement`](crate::Connection::create_statement)
/// and released with an explicit [`close`](Statement::close); results held
/// on the server are never left to a destructor.
pub struct Statement {
    transport: Arc<dyn CommandTransport>,
    state: Mutex<StatementState>,
}

#[derive(Debug)]
struct StatementState {
    cursor: Option<ResultCursor>,
    warnings: Vec<String>,
    batch: BatchBuffer,
    fetch_size: i64,
    max_rows: i64,
    fetch_direction: FetchDirection,
    result_set_type: ResultSetType,
    result_set_concurrency: ResultSetConcurrency,
    closed: bool,
}

impl StatementState {
    fn ensure_open(&self) -> Result<(), StatementError> {
        if self.closed {
            return Err(StatementError::InvalidState("statement is closed".into()));
        }
        Ok(())
    }

    fn hints(&self) -> SubmitHints {
        SubmitHints {
            fetch_size: self.fetch_size,
            max_rows: self.max_rows,
            result_set_type: self.result_set_type,
            concurrency: self.result_set_concurrency,
        }
    }

    fn add_warning(&mut self, reason: impl Into<String>) {
        self.warnings.push(reason.into());
    }

    /// Apply the close policy to exposed replies, move to the next one, and
    /// report whether it is tabular.
    fn advance(&mut self, mode: CloseMode) -> Result<bool, StatementError> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(false);
        };
        match mode {
            CloseMode::CloseCurrent => cursor.close_current(),
            CloseMode::CloseAll => cursor.close_current_and_older(),
            CloseMode::KeepCurrent => {}
        }
        let entry = cursor.advance()?;
        Ok(matches!(entry, Some(e) if e.kind() == ResultKind::Table))
    }

    /// Read the current reply as an update count, consuming it.
    fn update_count(&mut self) -> Result<i64, StatementError> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(-1);
        };
        let Some(entry) = cursor.current_mut() else {
            return Ok(-1);
        };
        match entry.kind() {
            ResultKind::UpdateCount => {
                let Some(text) = entry.update_count_payload() else {
                    // count already handed out at this position
                    return Ok(-1);
                };
                let count = text.trim().parse::<i64>().map_err(|_| {
                    StatementError::ProtocolDecode {
                        payload: text.to_string(),
                    }
                })?;
                // the count is all this reply carries; drop it server-side now
                entry.close();
                Ok(count)
            }
            ResultKind::SchemaChange => Ok(SUCCESS_NO_INFO),
            _ => Ok(-1),
        }
    }

    /// Build a reader over the current reply, if it is an open table.
    fn result_set(&mut self) -> Result<Option<RowSet>, StatementError> {
        let Some(cursor) = self.cursor.as_ref() else {
            return Ok(None);
        };
        let Some(entry) = cursor.current() else {
            return Ok(None);
        };
        if entry.kind() != ResultKind::Table {
            return Ok(None);
        }
        let Some(table) = entry.table_data() else {
            return Ok(None);
        };
        let rows = RowSet::new(table.clone(), self.fetch_direction, self.result_set_type)?;
        Ok(Some(rows))
    }
}

impl Statement {
    /// Create a statement with the requested result-set type and
    /// concurrency.
    ///
    /// Requests the server cannot honor are downgraded rather than
    /// rejected, each downgrade recording one warning: any concurrency
    /// other than `ReadOnly` becomes `ReadOnly`, and `ScrollSensitive`
    /// becomes `ScrollInsensitive`.
    pub fn new(
        transport: Arc<dyn CommandTransport>,
        result_set_type: ResultSetType,
        concurrency: ResultSetConcurrency,
    ) -> Statement {
        let mut warnings = Vec::new();

        let concurrency = if concurrency == ResultSetConcurrency::ReadOnly {
            concurrency
        } else {
            tracing::warn!("updatable result sets requested, downgrading to read-only");
            warnings.push(
                "no concurrency mode other than read-only is supported, \
                 continuing with concurrency ReadOnly"
                    .to_string(),
            );
            ResultSetConcurrency::ReadOnly
        };

        let result_set_type = if result_set_type == ResultSetType::ScrollSensitive {
            tracing::warn!("change-sensitive result sets requested, downgrading");
            warnings.push(
                "change-sensitive result sets are not supported, \
                 continuing with a change-insensitive scrollable cursor"
                    .to_string(),
            );
            ResultSetType::ScrollInsensitive
        } else {
            result_set_type
        };

        Statement {
            transport,
            state: Mutex::new(StatementState {
                cursor: None,
                warnings,
                batch: BatchBuffer::new(),
                fetch_size: 0,
                max_rows: DEFAULT_MAX_ROWS,
                fetch_direction: FetchDirection::Forward,
                result_set_type,
                result_set_concurrency: concurrency,
                closed: false,
            }),
        }
    }

    /// Seed the advisory fetch size from connection defaults. Only callable
    /// before the statement is shared.
    pub(crate) fn set_initial_fetch_size(&mut self, fetch_size: i64) {
        self.state.get_mut().fetch_size = fetch_size.max(0);
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Execute a command that may return any number of results.
    ///
    /// Returns `true` if the first result is tabular; use
    /// [`result_set`](Statement::result_set) /
    /// [`update_count`](Statement::update_count) to read it and
    /// [`more_results`](Statement::more_results) to walk the rest. Any
    /// previous reply sequence is closed first.
    ///
    /// # Errors
    ///
    /// `InvalidState` on a closed statement, `Connection` when the
    /// transport or server fails the submission.
    pub async fn execute(&self, command: &str) -> Result<bool, StatementError> {
        let mut state = self.state.lock().await;
        self.execute_locked(&mut state, command).await
    }

    /// Execute a command that must produce a single result set.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the first result is not tabular.
    pub async fn execute_query(&self, command: &str) -> Result<RowSet, StatementError> {
        let mut state = self.state.lock().await;
        if !self.execute_locked(&mut state, command).await? {
            return Err(StatementError::InvalidState(
                "command did not produce a result set".into(),
            ));
        }
        match state.result_set()? {
            Some(rows) => Ok(rows),
            None => Err(StatementError::InvalidState(
                "result set was released before it could be read".into(),
            )),
        }
    }

    /// Execute a data- or schema-modifying command and return its update
    /// count ([`SUCCESS_NO_INFO`] for schema changes).
    ///
    /// # Errors
    ///
    /// `InvalidState` if the command produced a result set,
    /// `ProtocolDecode` if the server's count payload is unparsable.
    pub async fn execute_update(&self, command: &str) -> Result<i64, StatementError> {
        let mut state = self.state.lock().await;
        if self.execute_locked(&mut state, command).await? {
            return Err(StatementError::InvalidState(
                "command produced a result set".into(),
            ));
        }
        state.update_count()
    }

    async fn execute_locked(
        &self,
        state: &mut StatementState,
        command: &str,
    ) -> Result<bool, StatementError> {
        state.ensure_open()?;
        if let Some(mut cursor) = state.cursor.take() {
            cursor.close();
        }
        let hints = state.hints();
        tracing::debug!(
            fetch_size = hints.fetch_size,
            max_rows = hints.max_rows,
            "submitting command"
        );
        let cursor = self.transport.submit(command, &hints).await?;
        state.cursor = Some(cursor);
        // Give a pipelined reply producer a chance to run before we start
        // iterating. Advisory only; iteration must not depend on it.
        tokio::task::yield_now().await;
        state.advance(CloseMode::CloseAll)
    }

    // ========================================================================
    // Result iteration
    // ========================================================================

    /// Move to the next result, closing the current one and all earlier
    /// ones. Returns `true` if the new current result is tabular.
    ///
    /// There are no more results when `more_results()` returns `false` and
    /// a subsequent [`update_count`](Statement::update_count) returns -1.
    pub async fn more_results(&self) -> Result<bool, StatementError> {
        self.more_results_with(CloseMode::CloseAll).await
    }

    /// Move to the next result, handling exposed results per `mode`.
    pub async fn more_results_with(&self, mode: CloseMode) -> Result<bool, StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.advance(mode)
    }

    /// The current result as an update count.
    ///
    /// Returns -1 when there is no current result, when it is tabular, or
    /// when its count was already consumed; [`SUCCESS_NO_INFO`] for schema
    /// changes. A real count is handed out once per position and its reply
    /// is released immediately.
    pub async fn update_count(&self) -> Result<i64, StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.update_count()
    }

    /// The current result as a row reader, or `None` if the current result
    /// is not an open table.
    pub async fn result_set(&self) -> Result<Option<RowSet>, StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.result_set()
    }

    // ========================================================================
    // Batch execution
    // ========================================================================

    /// Append a command to the batch.
    pub async fn add_batch(&self, command: impl Into<String>) -> Result<(), StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.batch.append(command);
        Ok(())
    }

    /// Discard every batched command.
    pub async fn clear_batch(&self) -> Result<(), StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.batch.clear();
        Ok(())
    }

    /// Execute the accumulated batch as one submission and collect per-
    /// command update counts in insertion order.
    ///
    /// A batch command that produces a result set is not an error: the
    /// result set is ignored, a warning is recorded, and its count is
    /// [`SUCCESS_NO_INFO`]. Execution is strictly fail-fast: the first
    /// failing command stops the batch, and the error carries the counts
    /// collected up to that point. The batch buffer itself is left intact;
    /// use [`clear_batch`](Statement::clear_batch) to discard it.
    ///
    /// # Errors
    ///
    /// `Batch` wrapping the partial counts and the triggering failure.
    pub async fn execute_batch(&self) -> Result<Vec<i64>, StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        if state.batch.is_empty() {
            return Ok(Vec::new());
        }
        let text = state.batch.to_text();
        tracing::debug!(commands = state.batch.len(), "executing batch");

        let mut counts = Vec::new();
        match self.run_batch(&mut state, &text, &mut counts).await {
            Ok(()) => Ok(counts),
            Err(source) => Err(StatementError::Batch(BatchError::new(counts, source))),
        }
    }

    async fn run_batch(
        &self,
        state: &mut StatementState,
        text: &str,
        counts: &mut Vec<i64>,
    ) -> Result<(), StatementError> {
        let mut is_table = self.execute_locked(state, text).await?;
        let mut count = if is_table { -1 } else { state.update_count()? };
        loop {
            if is_table {
                tracing::warn!("batch command produced a result set, ignoring it");
                state.add_warning(format!(
                    "batch command produced a result set, \
                     recording update count {SUCCESS_NO_INFO} instead"
                ));
                counts.push(SUCCESS_NO_INFO);
            } else if count >= 0 {
                counts.push(count);
            }
            is_table = state.advance(CloseMode::CloseAll)?;
            if is_table {
                continue;
            }
            count = state.update_count()?;
            if count == -1 {
                break;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// The row cap for result sets; 0 means unlimited.
    pub async fn max_rows(&self) -> i64 {
        self.state.lock().await.max_rows
    }

    /// Cap the number of rows any result set may contain; excess rows are
    /// silently dropped by the server. 0 removes the cap.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `max` is negative.
    pub async fn set_max_rows(&self, max: i64) -> Result<(), StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        if max < 0 {
            return Err(StatementError::InvalidArgument(format!(
                "illegal max rows value: {max}"
            )));
        }
        state.max_rows = max;
        Ok(())
    }

    /// The advisory reply block size; 0 leaves it to the server.
    pub async fn fetch_size(&self) -> i64 {
        self.state.lock().await.fetch_size
    }

    /// Suggest how many rows the server ships per reply block.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless `0 <= rows` and, with a row cap in place,
    /// `rows <= max_rows`.
    pub async fn set_fetch_size(&self, rows: i64) -> Result<(), StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        if rows < 0 || (state.max_rows != 0 && rows > state.max_rows) {
            return Err(StatementError::InvalidArgument(format!(
                "illegal fetch size value: {rows}"
            )));
        }
        state.fetch_size = rows;
        Ok(())
    }

    /// The suggested row-processing direction.
    pub async fn fetch_direction(&self) -> FetchDirection {
        self.state.lock().await.fetch_direction
    }

    /// Suggest the direction in which rows will be processed.
    pub async fn set_fetch_direction(
        &self,
        direction: FetchDirection,
    ) -> Result<(), StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.fetch_direction = direction;
        Ok(())
    }

    /// The effective result set type (downgrades already applied).
    pub async fn result_set_type(&self) -> ResultSetType {
        self.state.lock().await.result_set_type
    }

    /// The effective concurrency; always `ReadOnly`.
    pub async fn result_set_concurrency(&self) -> ResultSetConcurrency {
        self.state.lock().await.result_set_concurrency
    }

    // ========================================================================
    // Capabilities
    // ========================================================================

    /// Whether this driver implements `op`.
    pub fn supports(&self, op: Operation) -> bool {
        op.is_supported()
    }

    /// Fail with the uniform `Unsupported` error unless `op` is
    /// implemented.
    pub fn ensure_supported(&self, op: Operation) -> Result<(), StatementError> {
        if op.is_supported() {
            Ok(())
        } else {
            Err(StatementError::Unsupported(op))
        }
    }

    /// Request cancellation of a command in flight. Always fails: the
    /// server has no cancellation protocol.
    pub fn cancel(&self) -> Result<(), StatementError> {
        self.ensure_supported(Operation::Cancel)
    }

    // ========================================================================
    // Warnings and lifecycle
    // ========================================================================

    /// The advisory warnings recorded so far, in arrival order.
    ///
    /// # Errors
    ///
    /// `InvalidState` on a closed statement.
    pub async fn warnings(&self) -> Result<Vec<String>, StatementError> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        Ok(state.warnings.clone())
    }

    /// Drop every recorded warning.
    pub async fn clear_warnings(&self) -> Result<(), StatementError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.warnings.clear();
        Ok(())
    }

    /// Whether [`close`](Statement::close) has run.
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Close the statement, releasing any open reply sequence. Idempotent;
    /// most operations on a closed statement fail with `InvalidState`.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.closed {
            return;
        }
        if let Some(mut cursor) = state.cursor.take() {
            cursor.close();
        }
        state.closed = true;
    }
}
