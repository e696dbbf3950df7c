use thiserror::Error;

/// Errors shared by every backup monitoring function.
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing or invalid configuration: {0}")]
    MissingConfig(#[from] envconfig::Error),
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] EventError),
    #[error("backend unavailable during {operation}: {message}")]
    BackendUnavailable { operation: String, message: String },
    #[error("failed to upsert {failed} of {total} alarms")]
    AlarmSyncIncomplete { failed: usize, total: usize },
    #[error("custom resource response could not be delivered: {0}")]
    ResponseFailed(String),
}

impl Error {
    pub fn backend(operation: &str, err: impl std::fmt::Display) -> Self {
        Error::BackendUnavailable {
            operation: operation.to_owned(),
            message: err.to_string(),
        }
    }
}

/// Reasons an upload notification cannot be turned into a metric.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("event contains no records")]
    NoRecords,
    #[error("record has no object key")]
    MissingKey,
    #[error("object key is empty")]
    EmptyKey,
    #[error("system identifier is empty")]
    EmptySystem,
    #[error("object key is not valid UTF-8 once decoded: {0}")]
    NotUtf8(String),
    #[error("object key {key:?} has no segment at index {index}")]
    MissingSegment { key: String, index: usize },
    #[error("object key {key:?} has an empty segment at index {index}")]
    EmptySegment { key: String, index: usize },
}
