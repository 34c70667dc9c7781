use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Failure reported by a remote collaborator (profile service or text
/// generation service).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The requested identity or document does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unreachable service, rate limiting, timeouts, or a malformed payload.
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// User-visible failure of an analysis, search, or ranking call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoutError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no profile matched the requested filters")]
    NoMatch,

    #[error("none of the candidates could be analyzed")]
    NoCandidates,
}

impl ScoutError {
    /// Stable snake_case identifier for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::NotFound(_) => "not_found",
            Self::Upstream(_) => "upstream_error",
            Self::InvalidFilter(_) => "invalid_filter",
            Self::InvalidRequest(_) => "invalid_request",
            Self::NoMatch => "no_match",
            Self::NoCandidates => "no_candidates",
        }
    }
}

impl From<ServiceError> for ScoutError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => Self::NotFound(what),
            ServiceError::Upstream(detail) => Self::Upstream(detail),
        }
    }
}
