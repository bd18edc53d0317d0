//! Dropbox destination path normalization.

/// Normalizes a Dropbox path to one canonical form: leading `/` enforced,
/// backslashes converted (Windows input), duplicate slashes collapsed.
pub fn normalize_remote_path(path: &str) -> String {
    let mut p = path.replace('\\', "/");
    if !p.starts_with('/') {
        p.insert(0, '/');
    }
    while p.contains("//") {
        p = p.replace("//", "/");
    }
    p
}

/// Joins a destination folder and filename into a normalized remote path.
pub fn destination_path(folder: &str, filename: &str) -> String {
    normalize_remote_path(&format!("{}/{}", folder, filename))
}
