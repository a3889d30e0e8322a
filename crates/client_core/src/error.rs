use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of an entity-client call: the call was rejected rather than
/// answered with a `success` envelope.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid entity base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid entity name '{0}'")]
    InvalidEntityName(String),
    #[error("failed to build http client: {0}")]
    Builder(#[source] reqwest::Error),
    #[error("entity request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("entity store unavailable during {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },
}

impl ClientError {
    /// True for failures that happened on the wire (connect, timeout, status, decode).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Unavailable { .. })
    }
}
