use thiserror::Error;

/// Errors raised by the bucketing layer itself. Collaborator failures
/// (model steps, checkpoint I/O) travel as `anyhow::Error` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BucketError {
    /// Every bucket store reported zero examples; there is nothing to
    /// schedule. Fatal at startup, before any training step runs.
    #[error("no training examples in any of the {buckets} buckets")]
    EmptyCorpus { buckets: usize },

    /// The input does not fit the largest bucket. Interactive sessions
    /// report this per line and keep running.
    #[error("input of {tokens} tokens exceeds the largest bucket input capacity of {capacity}")]
    InputTooLong { tokens: usize, capacity: usize },
}
