use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrustServistaError>;

#[derive(Debug, Error)]
pub enum TrustServistaError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API key rejected (status {status})")]
    Auth { status: u16 },

    #[error("API error (status {status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl TrustServistaError {
    /// Only connection-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrustServistaError::Transport(_))
    }
}

impl From<reqwest::Error> for TrustServistaError {
    fn from(err: reqwest::Error) -> Self {
        TrustServistaError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TrustServistaError {
    fn from(err: serde_json::Error) -> Self {
        TrustServistaError::Parse(err.to_string())
    }
}
