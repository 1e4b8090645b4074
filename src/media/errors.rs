use std::time::Duration;

/// Errors raised while asking a remote service for an image.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to decode: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
