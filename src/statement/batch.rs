//! Accumulator for batched commands.
//!
//! Commands are kept as an ordered list and only joined into one submission
//! text when the batch executes. Keeping the list immutable until then
//! means clearing or re-running a batch never aliases a half-built buffer.

/// Ordered list of command texts accumulated for one batch submission.
#[derive(Debug, Default)]
pub struct BatchBuffer {
    commands: Vec<String>,
}

impl BatchBuffer {
    /// An empty batch.
    pub fn new() -> BatchBuffer {
        BatchBuffer::default()
    }

    /// Append one command to the batch.
    pub fn append(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    /// Discard every accumulated command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of accumulated commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the batch holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Materialize the combined submission text: each command followed by
    /// the statement terminator and a separator. An empty batch
    /// materializes to an empty string.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(
            self.commands.iter().map(|c| c.len() + 2).sum(),
        );
        for command in &self.commands {
            text.push_str(command);
            text.push(';');
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_materializes_to_empty_string() {
        let batch = BatchBuffer::new();
        assert!(batch.is_empty());
        assert_eq!(batch.to_text(), "");
    }

    #[test]
    fn test_commands_join_with_terminator_and_separator() {
        let mut batch = BatchBuffer::new();
        batch.append("insert into t values (1)");
        batch.append("insert into t values (2)");

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.to_text(),
            "insert into t values (1);\ninsert into t values (2);\n"
        );
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut batch = BatchBuffer::new();
        batch.append("delete from t");
        batch.clear();

        assert!(batch.is_empty());
        assert_eq!(batch.to_text(), "");
    }
}
