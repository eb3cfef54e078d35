use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid timeline config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("invalid timeline input: {0}")]
    Input(#[source] serde_json::Error),
    #[error("job {job_id}: log entry {index} has invalid timestamp {value:?}")]
    InvalidTimestamp {
        job_id: String,
        index: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid job name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
