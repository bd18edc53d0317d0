//! Upload planner: strategy selection and session orchestration.
//!
//! Validates the local file, normalizes the destination, then picks the
//! strategy by size: at or below the threshold a single-shot upload, above
//! it a chunked session (start, sequential appends, finish). Every network
//! step goes through the retry executor; the local existence check does not
//! (retrying a deterministic local check is pointless).

mod chunked;
mod local_path;
mod remote_path;
mod session;
mod single;

pub use local_path::resolve_local_path;
pub use remote_path::{destination_path, normalize_remote_path};
pub use session::{SessionPhase, UploadSession};

use crate::client::StorageClient;
use crate::error::UploadError;
use crate::retry::RetryPolicy;
use std::path::PathBuf;

/// Files at or below this size go up in a single request (Dropbox caps
/// single-request uploads at 150 MiB).
pub const DEFAULT_CHUNK_THRESHOLD: u64 = 150 * 1024 * 1024;

/// Chunk size for session uploads.
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;

/// One upload job. Immutable after construction.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Local file to upload (Git Bash / Cygwin forms tolerated on Windows).
    pub local_path: PathBuf,
    /// Destination folder; `Reports`, `/Reports` and `//Reports` are the same.
    pub folder: String,
    /// Remote filename override; defaults to the local base name.
    pub filename: Option<String>,
    /// Overwrite an existing remote file instead of failing on conflict.
    pub overwrite: bool,
    /// Inclusive upper bound (bytes) for the single-shot strategy.
    pub chunk_threshold: u64,
    /// Chunk size (bytes) for session uploads.
    pub chunk_size: u64,
}

impl UploadRequest {
    pub fn new(local_path: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            folder: folder.into(),
            filename: None,
            overwrite: true,
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Uploads one file, returning the final remote path.
pub fn upload<C: StorageClient>(
    client: &C,
    request: &UploadRequest,
    policy: &RetryPolicy,
) -> Result<String, UploadError> {
    let path = resolve_local_path(&request.local_path.to_string_lossy());

    let meta = std::fs::metadata(&path)
        .map_err(|e| UploadError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    if !meta.is_file() {
        return Err(UploadError::FileNotFound(format!(
            "not a regular file: {}",
            path.display()
        )));
    }
    let file_size = meta.len();

    let name = match &request.filename {
        Some(n) => n.clone(),
        None => path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                UploadError::FileNotFound(format!("no filename in path: {}", path.display()))
            })?,
    };
    let dest = remote_path::destination_path(&request.folder, &name);

    tracing::info!(
        "uploading {} ({} bytes) to {}",
        path.display(),
        file_size,
        dest
    );

    let remote = if file_size <= request.chunk_threshold {
        single::upload_single(client, &path, &dest, request.overwrite, policy)?
    } else {
        chunked::upload_chunked(
            client,
            &path,
            file_size,
            &dest,
            request.overwrite,
            request.chunk_size,
            policy,
        )?
    };

    tracing::info!("upload complete: {}", remote);
    Ok(remote)
}
