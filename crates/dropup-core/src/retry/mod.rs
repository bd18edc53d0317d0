//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! credential failures) and exponential backoff decisions so that every
//! network-facing upload step shares a consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::StepError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
