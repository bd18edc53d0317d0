//! Chunked upload: session start, sequential appends, finish.
//!
//! Chunks are strictly sequential because each append's offset depends on
//! the prior chunk's completion. Each network step is retried independently,
//! so a transient failure on one chunk re-sends only that chunk.

use super::session::UploadSession;
use crate::client::StorageClient;
use crate::error::UploadError;
use crate::retry::{run_with_retry, RetryPolicy};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub(super) fn upload_chunked<C: StorageClient>(
    client: &C,
    path: &Path,
    file_size: u64,
    dest: &str,
    overwrite: bool,
    chunk_size: u64,
    policy: &RetryPolicy,
) -> Result<String, UploadError> {
    // The handle is scoped to this function; every exit path releases it.
    let mut file = File::open(path)?;
    let mut session = UploadSession::new(file_size);
    let chunk_size = chunk_size.max(1);
    let mut buf = vec![0u8; chunk_size as usize];

    // The first chunk rides on start_session. The whole call is re-attempted
    // on transient failure; there is no partial-chunk resume.
    let first_len = fill_from(&mut file, &mut buf)?;
    let first_chunk = &buf[..first_len];
    let session_id = match run_with_retry(policy, || client.start_session(first_chunk)) {
        Ok(id) => id,
        Err(e) => {
            session.mark_failed();
            return Err(UploadError::from_step(e));
        }
    };
    session.mark_started(session_id.clone(), first_len as u64);
    tracing::debug!(
        "session {}: started, {}/{} bytes",
        session_id,
        session.offset(),
        file_size
    );

    while !session.is_complete() {
        let want = session.remaining().min(chunk_size) as usize;
        let got = fill_from(&mut file, &mut buf[..want])?;
        if got < want {
            // File shrank under us; the session is abandoned on the remote.
            session.mark_failed();
            return Err(UploadError::Read(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "file truncated during upload ({} of {} bytes readable)",
                    session.offset() + got as u64,
                    file_size
                ),
            )));
        }

        let offset = session.offset();
        let chunk = &buf[..want];
        if let Err(e) = run_with_retry(policy, || client.append_to_session(&session_id, offset, chunk))
        {
            session.mark_failed();
            return Err(UploadError::from_step(e));
        }
        session.mark_appended(want as u64);
        tracing::debug!(
            "session {}: {}/{} bytes ({:.0}%)",
            session_id,
            session.offset(),
            file_size,
            session.offset() as f64 / file_size as f64 * 100.0
        );
    }

    let offset = session.offset();
    let remote = match run_with_retry(policy, || {
        client.finish_session(&session_id, offset, dest, overwrite)
    }) {
        Ok(p) => p,
        Err(e) => {
            session.mark_failed();
            return Err(UploadError::from_step(e));
        }
    };
    session.mark_finished();
    Ok(remote)
}

/// Reads until `buf` is full or EOF; returns the number of bytes read.
fn fill_from(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
