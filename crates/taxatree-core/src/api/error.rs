use thiserror::Error;

/// Errors that can occur while talking to the observations API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API returned error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Rate limited. Try again later.")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
