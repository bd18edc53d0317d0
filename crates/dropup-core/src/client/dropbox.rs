//! Dropbox content API client over curl (blocking).
//!
//! Every operation is a POST with the request parameters in a
//! `Dropbox-API-Arg` JSON header and the file bytes as an octet-stream body.
//! API failures are mapped to tagged `StepError` variants by inspecting the
//! `error_summary` of the JSON error body.

use super::{SessionId, StorageClient};
use crate::retry::StepError;
use std::time::Duration;

const API_UPLOAD: &str = "https://content.dropboxapi.com/2/files/upload";
const API_SESSION_START: &str = "https://content.dropboxapi.com/2/files/upload_session/start";
const API_SESSION_APPEND: &str = "https://content.dropboxapi.com/2/files/upload_session/append_v2";
const API_SESSION_FINISH: &str = "https://content.dropboxapi.com/2/files/upload_session/finish";

/// Blocking Dropbox client authenticated with a bearer access token.
pub struct DropboxClient {
    token: String,
}

impl DropboxClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Performs one POST: API arg header, octet-stream body, response body
    /// collected in memory. Returns the HTTP status and raw body.
    fn post(&self, url: &str, arg: &serde_json::Value, body: &[u8]) -> Result<(u32, Vec<u8>), StepError> {
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(StepError::Curl)?;
        easy.post(true).map_err(StepError::Curl)?;
        easy.post_field_size(body.len() as u64)
            .map_err(StepError::Curl)?;
        easy.connect_timeout(Duration::from_secs(30))
            .map_err(StepError::Curl)?;
        // Prefer low-speed timeout: abort if throughput drops below 1 KiB/s for 60s,
        // so large chunks on slow links are not killed by a short wall-clock timeout.
        easy.low_speed_limit(1024).map_err(StepError::Curl)?;
        easy.low_speed_time(Duration::from_secs(60))
            .map_err(StepError::Curl)?;
        // Safety net: hard timeout so a completely stuck transfer eventually fails.
        easy.timeout(Duration::from_secs(3600))
            .map_err(StepError::Curl)?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: Bearer {}", self.token))
            .map_err(StepError::Curl)?;
        list.append(&format!("Dropbox-API-Arg: {}", header_safe_json(arg)))
            .map_err(StepError::Curl)?;
        list.append("Content-Type: application/octet-stream")
            .map_err(StepError::Curl)?;
        easy.http_headers(list).map_err(StepError::Curl)?;

        {
            let mut remaining = body;
            let mut transfer = easy.transfer();
            transfer
                .read_function(move |buf| {
                    let n = remaining.len().min(buf.len());
                    buf[..n].copy_from_slice(&remaining[..n]);
                    remaining = &remaining[n..];
                    Ok(n)
                })
                .map_err(StepError::Curl)?;
            transfer
                .write_function(|data| {
                    response.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(StepError::Curl)?;
            transfer.perform().map_err(StepError::Curl)?;
        }

        let code = easy.response_code().map_err(StepError::Curl)? as u32;
        Ok((code, response))
    }

    fn expect_json(&self, url: &str, arg: &serde_json::Value, body: &[u8]) -> Result<serde_json::Value, StepError> {
        let (code, response) = self.post(url, arg, body)?;
        if !(200..300).contains(&code) {
            return Err(parse_api_error(code, &response));
        }
        serde_json::from_slice(&response)
            .map_err(|e| StepError::Malformed(format!("invalid response JSON: {}", e)))
    }

    fn expect_ok(&self, url: &str, arg: &serde_json::Value, body: &[u8]) -> Result<(), StepError> {
        let (code, response) = self.post(url, arg, body)?;
        if !(200..300).contains(&code) {
            return Err(parse_api_error(code, &response));
        }
        Ok(())
    }
}

impl StorageClient for DropboxClient {
    fn single_upload(&self, path: &str, data: &[u8], overwrite: bool) -> Result<String, StepError> {
        let arg = serde_json::json!({
            "path": path,
            "mode": write_mode(overwrite),
            "autorename": false,
            "mute": true,
        });
        let metadata = self.expect_json(API_UPLOAD, &arg, data)?;
        path_from_metadata(&metadata)
    }

    fn start_session(&self, data: &[u8]) -> Result<SessionId, StepError> {
        let arg = serde_json::json!({ "close": false });
        let v = self.expect_json(API_SESSION_START, &arg, data)?;
        v.get("session_id")
            .and_then(|s| s.as_str())
            .map(|s| SessionId(s.to_string()))
            .ok_or_else(|| StepError::Malformed("missing session_id in start response".into()))
    }

    fn append_to_session(
        &self,
        session: &SessionId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), StepError> {
        let arg = serde_json::json!({
            "cursor": { "session_id": session.0, "offset": offset },
            "close": false,
        });
        self.expect_ok(API_SESSION_APPEND, &arg, data)
    }

    fn finish_session(
        &self,
        session: &SessionId,
        offset: u64,
        path: &str,
        overwrite: bool,
    ) -> Result<String, StepError> {
        let arg = serde_json::json!({
            "cursor": { "session_id": session.0, "offset": offset },
            "commit": {
                "path": path,
                "mode": write_mode(overwrite),
                "autorename": false,
                "mute": true,
            },
        });
        let metadata = self.expect_json(API_SESSION_FINISH, &arg, &[])?;
        path_from_metadata(&metadata)
    }
}

fn write_mode(overwrite: bool) -> &'static str {
    if overwrite {
        "overwrite"
    } else {
        "add"
    }
}

/// Maps a non-2xx response to a tagged step error using the Dropbox
/// `error_summary` field (e.g. `path/conflict/file/...`).
fn parse_api_error(code: u32, body: &[u8]) -> StepError {
    let summary = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_summary")
                .and_then(|s| s.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    if code == 401
        || summary.contains("invalid_access_token")
        || summary.contains("expired_access_token")
    {
        let msg = if summary.is_empty() {
            format!("HTTP {}", code)
        } else {
            summary
        };
        return StepError::Auth(msg);
    }
    if summary.contains("conflict") {
        return StepError::Conflict(summary);
    }
    if summary.contains("insufficient_space") {
        return StepError::InsufficientSpace;
    }
    StepError::Http { code, summary }
}

fn path_from_metadata(metadata: &serde_json::Value) -> Result<String, StepError> {
    metadata
        .get("path_display")
        .or_else(|| metadata.get("path_lower"))
        .and_then(|p| p.as_str())
        .map(str::to_string)
        .ok_or_else(|| StepError::Malformed("missing path_display in upload response".into()))
}

/// Serializes the API arg for use in an HTTP header: non-ASCII characters
/// are escaped as `\uXXXX`, which Dropbox requires for header transport.
fn header_safe_json(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    let mut buf = [0u16; 2];
    for ch in raw.chars() {
        if (' '..='\u{7e}').contains(&ch) {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut buf) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_safe_json_passes_ascii_through() {
        let arg = serde_json::json!({ "path": "/Reports/file.md", "mode": "overwrite" });
        let s = header_safe_json(&arg);
        assert!(s.contains("/Reports/file.md"));
        assert!(s.is_ascii());
    }

    #[test]
    fn header_safe_json_escapes_non_ascii() {
        let arg = serde_json::json!({ "path": "/Ünïcode/naïve.md" });
        let s = header_safe_json(&arg);
        assert!(s.is_ascii());
        assert!(s.contains("\\u00dc"), "got: {}", s);
        assert!(s.contains("\\u00ef"), "got: {}", s);
    }

    #[test]
    fn header_safe_json_escapes_astral_as_surrogate_pair() {
        let arg = serde_json::json!({ "path": "/📁/x" });
        let s = header_safe_json(&arg);
        assert!(s.contains("\\ud83d\\udcc1"), "got: {}", s);
    }

    #[test]
    fn api_error_401_is_auth() {
        let err = parse_api_error(401, b"");
        assert!(matches!(err, StepError::Auth(_)));
    }

    #[test]
    fn api_error_expired_token_is_auth() {
        let body = br#"{"error_summary": "expired_access_token/..", "error": {".tag": "expired_access_token"}}"#;
        let err = parse_api_error(400, body);
        assert!(matches!(err, StepError::Auth(_)));
    }

    #[test]
    fn api_error_conflict_tagged() {
        let body = br#"{"error_summary": "path/conflict/file/.."}"#;
        let err = parse_api_error(409, body);
        assert!(matches!(err, StepError::Conflict(_)));
    }

    #[test]
    fn api_error_insufficient_space_tagged() {
        let body = br#"{"error_summary": "path/insufficient_space/.."}"#;
        let err = parse_api_error(507, body);
        assert!(matches!(err, StepError::InsufficientSpace));
    }

    #[test]
    fn api_error_5xx_keeps_code() {
        let err = parse_api_error(503, b"upstream unavailable");
        match err {
            StepError::Http { code, summary } => {
                assert_eq!(code, 503);
                assert_eq!(summary, "upstream unavailable");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn path_from_metadata_prefers_path_display() {
        let v = serde_json::json!({ "path_display": "/Reports/File.md", "path_lower": "/reports/file.md" });
        assert_eq!(path_from_metadata(&v).unwrap(), "/Reports/File.md");
    }

    #[test]
    fn path_from_metadata_missing_is_malformed() {
        let v = serde_json::json!({ "name": "file.md" });
        assert!(matches!(
            path_from_metadata(&v),
            Err(StepError::Malformed(_))
        ));
    }
}
