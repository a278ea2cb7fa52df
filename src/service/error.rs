use thiserror::Error;

/// Everything that can go wrong between picking a file and showing a result.
///
/// Cloneable so it can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("{0}")]
    Transport(String),

    /// Non-2xx status; carries the raw response body
    #[error("Server error: {0}")]
    Server(String),

    /// Valid JSON without the fields this tool needs
    #[error("{0}")]
    MissingData(String),

    /// Body was not JSON
    #[error("Invalid JSON response: {0}")]
    Parse(String),

    /// A returned image could not be decoded
    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for ProcessError {
    fn from(err: std::io::Error) -> Self {
        ProcessError::Io(err.to_string())
    }
}
