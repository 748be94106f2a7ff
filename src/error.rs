use serde::Serialize;
use thiserror::Error;

/// Central error type for Syft operations.
#[derive(Error, Debug)]
pub enum SyftError {
    /// Reading the selected file failed before anything was sent.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The search service returned a non-2xx response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A network or transport error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The file picker refused the file (type or size).
    #[error("File rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyftError {
    /// Coarse classification shown to the user. Anything that is not a local
    /// read failure counts as a transport failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            SyftError::Encoding(_) | SyftError::Io(_) => FailureKind::EncodingFailure,
            _ => FailureKind::TransportFailure,
        }
    }
}

/// Convenience type alias for Syft results.
pub type SyftResult<T> = Result<T, SyftError>;

/// What the view layer is allowed to know about a failed search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    EncodingFailure,
    TransportFailure,
}

impl FailureKind {
    /// Banner text. Both kinds read the same to the user.
    pub fn banner(&self) -> &'static str {
        "Your request could not be processed, try again later."
    }
}
