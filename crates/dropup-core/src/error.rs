//! Public error type for upload callers, with CLI exit-code mapping.

use crate::retry::StepError;
use thiserror::Error;

/// Final error of one upload. Retryable failures that eventually succeed
/// never surface here; only the last failure after exhaustion, or a fatal
/// failure, crosses this boundary.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Local file missing or not a regular file. Never retried.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Reading the local file failed mid-upload.
    #[error("local read failed: {0}")]
    Read(#[from] std::io::Error),

    /// Credential rejected. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Remote failure after exhausted retries, or a non-retryable remote
    /// failure such as a path conflict.
    #[error("upload failed: {0}")]
    Failed(#[source] StepError),
}

impl UploadError {
    /// Process exit code for the CLI: 1 local, 2 auth, 3 upload.
    pub fn exit_code(&self) -> i32 {
        match self {
            UploadError::FileNotFound(_) | UploadError::Read(_) => 1,
            UploadError::Auth(_) => 2,
            UploadError::Failed(_) => 3,
        }
    }

    /// Converts the final step error of a retry loop, routing authentication
    /// failures to their own variant so they exit with code 2.
    pub(crate) fn from_step(e: StepError) -> Self {
        match e {
            StepError::Auth(msg) => UploadError::Auth(msg),
            other => UploadError::Failed(other),
        }
    }
}
