//! Connection-level objects.
//!
//! A [`Connection`] pairs an established transport with the parameters it
//! was opened with, and acts as the factory for statements. The transport
//! itself (socket, block protocol, login) is provided by the caller as a
//! [`CommandTransport`](crate::transport::CommandTransport) implementation.

pub mod params;

pub use params::{ConnectionBuilder, ConnectionParams};

use crate::statement::{ResultSetConcurrency, ResultSetType, Statement};
use crate::transport::CommandTransport;
use std::sync::Arc;

/// An open connection: the statement factory.
///
/// Statements created here share the connection's transport; each one
/// starts with the connection's default fetch size.
pub struct Connection {
    transport: Arc<dyn CommandTransport>,
    params: ConnectionParams,
}

impl Connection {
    /// Wrap an established transport together with its parameters.
    pub fn new(transport: Arc<dyn CommandTransport>, params: ConnectionParams) -> Connection {
        Connection { transport, params }
    }

    /// The parameters this connection was opened with.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Create a statement with forward-only, read-only results.
    pub fn create_statement(&self) -> Statement {
        self.create_statement_with(ResultSetType::ForwardOnly, ResultSetConcurrency::ReadOnly)
    }

    /// Create a statement with the requested result-set type and
    /// concurrency; requests the server cannot honor are downgraded with a
    /// warning on the statement.
    pub fn create_statement_with(
        &self,
        result_set_type: ResultSetType,
        concurrency: ResultSetConcurrency,
    ) -> Statement {
        let mut statement =
            Statement::new(Arc::clone(&self.transport), result_set_type, concurrency);
        statement.set_initial_fetch_size(self.params.fetch_size);
        statement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectionError;
    use crate::result::ResultCursor;
    use crate::transport::SubmitHints;
    use async_trait::async_trait;

    struct NullTransport;

    #[async_trait]
    impl CommandTransport for NullTransport {
        async fn submit(
            &self,
            _command: &str,
            _hints: &SubmitHints,
        ) -> Result<ResultCursor, ConnectionError> {
            Ok(ResultCursor::new(Vec::new()))
        }

        fn discard_result(&self, _result_id: u64) {}
    }

    fn connection() -> Connection {
        let params = ConnectionParams::builder()
            .database("demo")
            .fetch_size(64)
            .build()
            .unwrap();
        Connection::new(Arc::new(NullTransport), params)
    }

    #[tokio::test]
    async fn test_statements_inherit_connection_fetch_size() {
        let conn = connection();
        assert_eq!(conn.params().database, "demo");

        let stmt = conn.create_statement();
        assert_eq!(stmt.fetch_size().await, 64);
    }

    #[tokio::test]
    async fn test_statement_type_passes_through() {
        let conn = connection();
        let stmt = conn.create_statement_with(
            ResultSetType::ScrollInsensitive,
            ResultSetConcurrency::ReadOnly,
        );
        assert_eq!(
            stmt.result_set_type().await,
            ResultSetType::ScrollInsensitive
        );
        assert!(stmt.warnings().await.unwrap().is_empty());
    }
}
