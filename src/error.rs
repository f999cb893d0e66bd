use thiserror::Error;

/// Everything that can go wrong while setting up a round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriviaError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("cannot sample {requested} items from a pool of {available}")]
    InvalidSampleSize { requested: usize, available: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TriviaError {
    /// True for failures that came from talking to the trivia provider.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::MalformedPayload(_))
    }
}

impl From<serde_json::Error> for TriviaError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}
