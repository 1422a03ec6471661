use thiserror::Error;

/// Failure talking to the chat backend.
///
/// There is no transient/permanent split: every variant is reported once
/// and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned status {status}")]
    Status { status: u16 },

    #[error("invalid response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("no uploaded file at index {0}")]
    NoSuchFile(usize),

    #[error("chat was reset before the request finished")]
    Reset,

    #[error("speech recognition failed: {0}")]
    Speech(String),

    #[error("invalid widget configuration: {0}")]
    Config(#[from] serde_json::Error),
}
