use thiserror::Error;

pub type Result<T> = std::result::Result<T, BingError>;

#[derive(Debug, Error)]
pub enum BingError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BingError {
    fn from(err: reqwest::Error) -> Self {
        BingError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BingError {
    fn from(err: serde_json::Error) -> Self {
        BingError::Parse(err.to_string())
    }
}
