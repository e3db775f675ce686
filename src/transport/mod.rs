//! Transport seam.
//!
//! The wire protocol is not implemented here; this module defines the
//! boundary the statement layer talks through. See [`CommandTransport`].

pub mod protocol;

pub use protocol::{CommandTransport, SubmitHints};
