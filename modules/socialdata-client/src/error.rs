use thiserror::Error;

pub type Result<T> = std::result::Result<T, SocialDataError>;

#[derive(Debug, Error)]
pub enum SocialDataError {
    #[error("User not found")]
    NotFound,

    #[error("Insufficient credits")]
    InsufficientCredits,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SocialDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // Surface timeouts as network errors; callers map them to their
            // own timeout taxonomy.
            SocialDataError::Network(format!("timeout: {err}"))
        } else if err.is_decode() {
            SocialDataError::Parse(err.to_string())
        } else {
            SocialDataError::Network(err.to_string())
        }
    }
}
