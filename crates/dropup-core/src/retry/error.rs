//! Upload step error type for retry classification.

use std::fmt;

/// Error returned by a single storage-client step (curl failure, HTTP error,
/// or an API error surfaced in the response body).
/// Used so we can classify and decide retries before converting to the
/// public `UploadError`.
#[derive(Debug)]
pub enum StepError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status with no more specific API tag.
    Http { code: u32, summary: String },
    /// Credential rejected (401, invalid or expired access token). Not retried.
    Auth(String),
    /// Destination path conflict with overwrite disabled. Not retried.
    Conflict(String),
    /// Account is out of space on the remote.
    InsufficientSpace,
    /// Response body did not have the expected shape.
    Malformed(String),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Curl(e) => write!(f, "{}", e),
            StepError::Http { code, summary } => {
                if summary.is_empty() {
                    write!(f, "HTTP {}", code)
                } else {
                    write!(f, "HTTP {}: {}", code, summary)
                }
            }
            StepError::Auth(msg) => write!(f, "authentication: {}", msg),
            StepError::Conflict(msg) => write!(f, "path conflict: {}", msg),
            StepError::InsufficientSpace => write!(f, "insufficient space in account"),
            StepError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StepError::Curl(e) => Some(e),
            _ => None,
        }
    }
}
