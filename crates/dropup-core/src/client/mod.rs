//! Storage client boundary: the remote operations the upload planner drives.
//!
//! The planner only sees this trait, so strategy and retry behaviour can be
//! tested against a scripted in-memory client without a live network.

mod dropbox;

pub use dropbox::DropboxClient;

use crate::retry::StepError;

/// Opaque upload session identifier returned by `start_session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote upload operations. Every method is a single blocking network call
/// returning a tagged `StepError` on failure so the retry layer can classify
/// it exhaustively.
pub trait StorageClient {
    /// Uploads an entire file in one request. Returns the final remote path.
    fn single_upload(&self, path: &str, data: &[u8], overwrite: bool) -> Result<String, StepError>;

    /// Opens an upload session, transmitting the first chunk.
    fn start_session(&self, data: &[u8]) -> Result<SessionId, StepError>;

    /// Appends one chunk at the given byte offset.
    fn append_to_session(
        &self,
        session: &SessionId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), StepError>;

    /// Commits the session at `offset` (== total size) to the destination
    /// path. Returns the final remote path.
    fn finish_session(
        &self,
        session: &SessionId,
        offset: u64,
        path: &str,
        overwrite: bool,
    ) -> Result<String, StepError>;
}
