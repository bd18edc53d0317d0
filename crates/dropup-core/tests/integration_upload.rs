//! Integration test: full chunked upload against an in-memory storage client.
//!
//! Reassembles the bytes received across start_session and all appends and
//! asserts they match the source file exactly, for a file well above the
//! chunking threshold.

use dropup_core::client::{SessionId, StorageClient};
use dropup_core::retry::{RetryPolicy, StepError};
use dropup_core::uploader::{self, UploadRequest};
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::time::Duration;

/// In-memory storage: concatenates the bytes of the session in arrival
/// order, validating offsets, and records the committed path.
#[derive(Default)]
struct MemoryStore {
    received: RefCell<Vec<u8>>,
    session_open: Cell<bool>,
    committed: RefCell<Option<String>>,
    // Fail the first N appends to exercise per-chunk retry on the real path.
    append_failures: Cell<u32>,
}

impl StorageClient for MemoryStore {
    fn single_upload(&self, path: &str, data: &[u8], _overwrite: bool) -> Result<String, StepError> {
        self.received.borrow_mut().extend_from_slice(data);
        *self.committed.borrow_mut() = Some(path.to_string());
        Ok(path.to_string())
    }

    fn start_session(&self, data: &[u8]) -> Result<SessionId, StepError> {
        assert!(!self.session_open.get(), "only one session per upload");
        self.session_open.set(true);
        self.received.borrow_mut().extend_from_slice(data);
        Ok(SessionId("mem-session".into()))
    }

    fn append_to_session(
        &self,
        session: &SessionId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), StepError> {
        assert_eq!(session.0, "mem-session");
        assert!(self.session_open.get());
        if self.append_failures.get() > 0 {
            self.append_failures.set(self.append_failures.get() - 1);
            return Err(StepError::Http {
                code: 500,
                summary: "simulated".into(),
            });
        }
        assert_eq!(
            offset,
            self.received.borrow().len() as u64,
            "append offset must equal bytes received so far"
        );
        self.received.borrow_mut().extend_from_slice(data);
        Ok(())
    }

    fn finish_session(
        &self,
        session: &SessionId,
        offset: u64,
        path: &str,
        _overwrite: bool,
    ) -> Result<String, StepError> {
        assert_eq!(session.0, "mem-session");
        assert_eq!(offset, self.received.borrow().len() as u64);
        self.session_open.set(false);
        *self.committed.borrow_mut() = Some(path.to_string());
        Ok(path.to_string())
    }
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(50),
    }
}

#[test]
fn chunked_upload_reassembles_exact_bytes() {
    let body: Vec<u8> = (0u8..251).cycle().take(1_000_003).collect();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.bin");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&body)
        .unwrap();

    let store = MemoryStore::default();
    store.append_failures.set(1);
    let mut request = UploadRequest::new(&path, "/backups/2026");
    request.chunk_threshold = 256 * 1024;
    request.chunk_size = 64 * 1024;

    let remote = uploader::upload(&store, &request, &policy()).unwrap();
    assert_eq!(remote, "/backups/2026/large.bin");
    assert_eq!(store.committed.borrow().as_deref(), Some("/backups/2026/large.bin"));
    assert_eq!(*store.received.borrow(), body, "reassembled bytes must match the file");
    assert!(!store.session_open.get(), "session must be committed");
}

#[test]
fn small_upload_is_one_call_with_full_contents() {
    let body = b"ten bytes!".to_vec();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.md");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&body)
        .unwrap();

    let store = MemoryStore::default();
    let request = UploadRequest::new(&path, "/Reports");

    let remote = uploader::upload(&store, &request, &policy()).unwrap();
    assert_eq!(remote, "/Reports/file.md");
    assert_eq!(*store.received.borrow(), body);
    assert!(!store.session_open.get(), "no session for small files");
}
