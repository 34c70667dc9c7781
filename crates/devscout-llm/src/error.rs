use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("completion API returned no content")]
    EmptyResponse,

    #[error("failed to parse completion response: {0}")]
    Deserialize(#[from] serde_json::Error),
}
