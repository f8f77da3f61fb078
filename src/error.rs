use thiserror::Error as ThisError;

/// Outcomes of authentication calls that are surfaced to the caller.
#[derive(ThisError, Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// 401 / 403
    #[error("{0}")]
    Authentication(String),

    /// 5xx or a malformed success body
    #[error("{0}")]
    Server(String),

    /// any other non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// backend not reachable
    #[error("{0}")]
    Connectivity(String),
}

impl AuthError {
    pub fn message(&self) -> &str {
        match self {
            AuthError::Validation(msg)
            | AuthError::Authentication(msg)
            | AuthError::Server(msg)
            | AuthError::Connectivity(msg)
            | AuthError::Rejected { message: msg, .. } => msg,
        }
    }
}

/// Failures of a storage backend. Absorbed by the credential store.
#[derive(ThisError, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// The request could not complete at all.
#[derive(ThisError, Debug)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Request(String),

    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },
}

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("can't read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("can't parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("api_base_url is not configured, use --api-base, SIGCHOS_API_BASE or the config file")]
    MissingApiBase,

    #[error("invalid api_base_url {url}: {reason}")]
    InvalidApiBase { url: String, reason: String },
}
