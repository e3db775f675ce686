//! Result handling.
//!
//! One submission produces an ordered, heterogeneous sequence of replies.
//! This module holds that sequence and its pieces:
//! - `entry` - [`ResultEntry`], one typed reply, with the wire-level
//!   [`ResultKind`] codes
//! - `cursor` - [`ResultCursor`], the ordered reply sequence with its close
//!   policies
//! - `rowset` - [`RowSet`], the raw-row reader surface over a tabular reply

pub mod cursor;
pub mod entry;
pub mod rowset;

pub use cursor::{CloseMode, ResultCursor};
pub use entry::{ResultEntry, ResultKind, TableData};
pub use rowset::RowSet;
