//! Classify step errors into retry policy error kinds.

use super::error::StepError;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        401 => ErrorKind::Fatal,
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a step error into an ErrorKind.
///
/// Authentication and conflict failures are fatal: retrying a rejected
/// credential or a path collision with overwrite disabled cannot succeed.
pub fn classify(e: &StepError) -> ErrorKind {
    match e {
        StepError::Curl(ce) => classify_curl_error(ce),
        StepError::Http { code, .. } => classify_http_status(*code),
        StepError::Auth(_) | StepError::Conflict(_) => ErrorKind::Fatal,
        StepError::InsufficientSpace => ErrorKind::Quota,
        StepError::Malformed(_) => ErrorKind::Other,
    }
}
