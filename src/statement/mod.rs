//! Statement execution.
//!
//! This module holds the caller-facing statement object and its supporting
//! pieces:
//! - `session` - the [`Statement`] itself: execution, result iteration,
//!   batches, configuration, warnings
//! - `batch` - the [`BatchBuffer`] accumulating batched command texts
//! - `config` - advisory configuration enums and the [`Operation`]
//!   capability surface

pub mod batch;
pub mod config;
pub mod session;

pub use batch::BatchBuffer;
pub use config::{FetchDirection, Operation, ResultSetConcurrency, ResultSetType};
pub use session::{Statement, DEFAULT_MAX_ROWS};
