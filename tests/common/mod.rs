//! Scripted transport shared by the integration tests.
//!
//! Each test hands the transport the reply sequences its submissions should
//! produce, in order. The transport records every submission and every
//! discarded result id so tests can assert on the traffic a statement
//! generated.

use async_trait::async_trait;
use bytes::Bytes;
use monet_rs::{
    CommandTransport, Connection, ConnectionError, ConnectionParams, ResultCursor, ResultEntry,
    ResultKind, SubmitHints, TableData,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

/// One canned reply.
#[derive(Clone)]
pub enum Reply {
    /// A tabular result with the given raw row block.
    Table {
        id: u64,
        columns: Vec<String>,
        rows: &'static str,
        row_count: u64,
    },
    /// An update count with the given textual payload.
    Update(&'static str),
    /// A schema-change acknowledgment.
    Schema,
    /// A transaction acknowledgment.
    Transaction,
}

/// Outcome of one submission.
pub enum Submission {
    /// A complete reply sequence.
    Replies(Vec<Reply>),
    /// Replies that arrived before the server aborted, plus its error text.
    RepliesThenFault(Vec<Reply>, &'static str),
    /// The submission itself is refused.
    Refused(&'static str),
}

/// Transport double that plays back a prepared script.
pub struct ScriptedTransport {
    self_ref: Weak<ScriptedTransport>,
    script: Mutex<VecDeque<Submission>>,
    submitted: Mutex<Vec<(String, SubmitHints)>>,
    discarded: Mutex<Vec<u64>>,
}

impl ScriptedTransport {
    pub fn with_script(script: Vec<Submission>) -> Arc<ScriptedTransport> {
        Arc::new_cyclic(|weak| ScriptedTransport {
            self_ref: weak.clone(),
            script: Mutex::new(script.into()),
            submitted: Mutex::new(Vec::new()),
            discarded: Mutex::new(Vec::new()),
        })
    }

    pub fn submitted(&self) -> Vec<(String, SubmitHints)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn discarded(&self) -> Vec<u64> {
        self.discarded.lock().unwrap().clone()
    }

    fn entry(&self, reply: &Reply) -> ResultEntry {
        match reply {
            Reply::Table {
                id,
                columns,
                rows,
                row_count,
            } => {
                let mut data = TableData::new(
                    *id,
                    columns.clone(),
                    Bytes::from_static(rows.as_bytes()),
                    *row_count,
                );
                if let Some(me) = self.self_ref.upgrade() {
                    data = data.with_transport(me);
                }
                ResultEntry::table(data)
            }
            Reply::Update(payload) => ResultEntry::update_count(*payload),
            Reply::Schema => ResultEntry::of_kind(ResultKind::SchemaChange),
            Reply::Transaction => ResultEntry::of_kind(ResultKind::Transaction),
        }
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn submit(
        &self,
        command: &str,
        hints: &SubmitHints,
    ) -> Result<ResultCursor, ConnectionError> {
        self.submitted
            .lock()
            .unwrap()
            .push((command.to_string(), *hints));
        match self.script.lock().unwrap().pop_front() {
            None => Err(ConnectionError::Transport(
                "scripted transport ran out of submissions".into(),
            )),
            Some(Submission::Refused(message)) => Err(ConnectionError::Rejected(message.into())),
            Some(Submission::Replies(replies)) => Ok(ResultCursor::new(
                replies.iter().map(|r| self.entry(r)).collect(),
            )),
            Some(Submission::RepliesThenFault(replies, message)) => Ok(ResultCursor::with_fault(
                replies.iter().map(|r| self.entry(r)).collect(),
                message,
            )),
        }
    }

    fn discard_result(&self, result_id: u64) {
        self.discarded.lock().unwrap().push(result_id);
    }
}

/// A one-column table reply with one row per entry of `rows`.
pub fn table(id: u64, rows: &'static str, row_count: u64) -> Reply {
    Reply::Table {
        id,
        columns: vec!["value".to_string()],
        rows,
        row_count,
    }
}

/// A connection over the given transport with test parameters.
pub fn connection(transport: Arc<ScriptedTransport>) -> Connection {
    let params = ConnectionParams::builder()
        .host("localhost")
        .database("demo")
        .username("monetdb")
        .password("monetdb")
        .build()
        .expect("test parameters are valid");
    Connection::new(transport, params)
}
