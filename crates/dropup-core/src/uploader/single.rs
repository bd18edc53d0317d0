//! Single-shot upload for files at or below the chunking threshold.

use crate::client::StorageClient;
use crate::error::UploadError;
use crate::retry::{run_with_retry, RetryPolicy};
use std::path::Path;

/// Uploads the whole file in one request, retried as a unit.
pub(super) fn upload_single<C: StorageClient>(
    client: &C,
    path: &Path,
    dest: &str,
    overwrite: bool,
    policy: &RetryPolicy,
) -> Result<String, UploadError> {
    let data = std::fs::read(path)?;
    run_with_retry(policy, || client.single_upload(dest, &data, overwrite))
        .map_err(UploadError::from_step)
}
