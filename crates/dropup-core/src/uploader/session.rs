//! Chunked upload session state machine.

use crate::client::SessionId;

/// Phase of a chunked upload session.
///
/// `Failed` is terminal and reachable from any non-terminal phase. A failed
/// session is abandoned: the remote side is not told to discard it (known
/// gap carried over from the protocol design).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Started,
    Appending,
    Finished,
    Failed,
}

/// One in-progress chunked upload. The offset only moves forward, by exactly
/// the bytes each step transmitted, and never past `total`.
#[derive(Debug)]
pub struct UploadSession {
    id: Option<SessionId>,
    offset: u64,
    total: u64,
    phase: SessionPhase,
}

impl UploadSession {
    pub fn new(total: u64) -> Self {
        Self {
            id: None,
            offset: 0,
            total,
            phase: SessionPhase::NotStarted,
        }
    }

    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining(&self) -> u64 {
        self.total - self.offset
    }

    /// All bytes transmitted; the session may be committed.
    pub fn is_complete(&self) -> bool {
        self.offset == self.total
    }

    /// Records a successful `start_session` carrying the first chunk.
    pub fn mark_started(&mut self, id: SessionId, first_chunk_len: u64) {
        debug_assert_eq!(self.phase, SessionPhase::NotStarted);
        debug_assert!(first_chunk_len <= self.total);
        self.id = Some(id);
        self.offset = first_chunk_len;
        self.phase = SessionPhase::Started;
    }

    /// Records a successful append of `len` bytes.
    pub fn mark_appended(&mut self, len: u64) {
        debug_assert!(matches!(
            self.phase,
            SessionPhase::Started | SessionPhase::Appending
        ));
        debug_assert!(self.offset + len <= self.total);
        self.offset += len;
        self.phase = SessionPhase::Appending;
    }

    /// Records the session commit. Only valid once all bytes are transmitted.
    pub fn mark_finished(&mut self) {
        debug_assert!(self.is_complete());
        self.phase = SessionPhase::Finished;
    }

    pub fn mark_failed(&mut self) {
        debug_assert!(!matches!(self.phase, SessionPhase::Finished));
        self.phase = SessionPhase::Failed;
    }
}
