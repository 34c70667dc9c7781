use thiserror::Error;

/// Errors returned by the GitHub API client.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 404 for the requested resource.
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// HTTP 429, or 403 with an exhausted rate-limit window.
    #[error("rate limited by GitHub (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
