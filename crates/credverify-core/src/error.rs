use std::fmt;

/// Broad class of a verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad credential or bad configuration; never retried.
    Configuration,
    /// The credential's expiry attribute rejects it.
    Expiry,
    /// The remote backend reported substantive check failures.
    BackendVerification,
    /// The backend could not be reached or answered unintelligibly.
    Transport,
    /// Anything else.
    Unexpected,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Expiry => write!(f, "expiry"),
            Self::BackendVerification => write!(f, "backend_verification"),
            Self::Transport => write!(f, "transport"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// Verifier construction and dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("unknown verification method: {0}")]
    UnknownMethod(String),

    #[error("unknown verification method: online verification requires a verifierName")]
    MissingVerifierName,

    #[error("invalid verifier name: {0}")]
    InvalidVerifierName(String),

    #[error("unknown online verifier: {0}")]
    UnknownVerifier(String),

    #[error("missing apiEndpoint for verifier: {0}")]
    MissingEndpoint(String),

    #[error("invalid apiEndpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid verification settings: {0}")]
    InvalidSettings(String),

    #[error("http client error: {0}")]
    HttpClient(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl VerifierError {
    /// Taxonomy bucket for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpClient(_) | Self::Internal(_) => ErrorCategory::Unexpected,
            _ => ErrorCategory::Configuration,
        }
    }
}
