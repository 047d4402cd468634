use dealmap_core::ParseError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("You must supply an API key")]
    MissingApiKey,

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Dealmap API error [{status}]: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse Dealmap response: {0}")]
    Parse(#[from] ParseError),

    #[error("Deal not found: {0}")]
    NotFound(String),
}

/// Broad category of an [`Error`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while building a client, never by a request.
    Configuration,
    /// Connection failures, timeouts and non-2xx responses.
    Transport,
    /// The body was not well-formed XML or lacked a required value.
    Parse,
    /// The details response held no deal.
    NotFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingApiKey | Error::InvalidBaseUrl { .. } => ErrorKind::Configuration,
            Error::Transport(_) | Error::Status { .. } => ErrorKind::Transport,
            Error::Parse(_) => ErrorKind::Parse,
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }
}
