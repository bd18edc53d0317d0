//! Local path resolution for shell-mangled Windows paths.
//!
//! Git Bash presents Windows drives as `/c/Users/...` and Cygwin/MSYS2 as
//! `/cygdrive/c/...`; both break `std::fs` on Windows if used verbatim.

use std::path::PathBuf;

/// Converts a Git Bash or Cygwin drive prefix to the native drive-letter
/// form. Returns `None` when the input is not one of those forms.
fn windows_drive_form(input: &str) -> Option<String> {
    let b = input.as_bytes();
    if b.len() >= 3 && b[0] == b'/' && b[1].is_ascii_alphabetic() && b[2] == b'/' {
        let drive = (b[1] as char).to_ascii_uppercase();
        return Some(format!("{}:{}", drive, &input[2..]));
    }
    if let Some(rest) = input.strip_prefix("/cygdrive/") {
        let rb = rest.as_bytes();
        if rb.len() >= 2 && rb[0].is_ascii_alphabetic() && rb[1] == b'/' {
            let drive = (rb[0] as char).to_ascii_uppercase();
            return Some(format!("{}:{}", drive, &rest[1..]));
        }
    }
    None
}

/// Resolves a local path string. On Windows, Git Bash and Cygwin drive
/// prefixes are rewritten; elsewhere the path is used as-is (a Unix path
/// like `/c/data` is a real path there, not a mangled drive).
pub fn resolve_local_path(input: &str) -> PathBuf {
    if cfg!(windows) {
        if let Some(native) = windows_drive_form(input) {
            return PathBuf::from(native);
        }
    }
    PathBuf::from(input)
}
