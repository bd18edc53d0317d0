//! CLI for the dropup Dropbox uploader.

use clap::Parser;
use dropup_core::client::DropboxClient;
use dropup_core::config::{self, DropupConfig};
use dropup_core::error::UploadError;
use dropup_core::uploader::{self, UploadRequest};
use std::io::Write;

/// Upload a file to Dropbox, chunking large files into upload sessions.
#[derive(Debug, Parser)]
#[command(name = "dropup")]
#[command(about = "Upload files to Dropbox, chunking large files", long_about = None)]
pub struct Cli {
    /// Path to the file to upload.
    pub file: String,

    /// Destination folder in Dropbox (default: DROPBOX_FOLDER env var, or "/").
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Custom filename in Dropbox (default: the local filename).
    #[arg(short = 'n', long)]
    pub filename: Option<String>,

    /// Dropbox access token (default: DROPBOX_ACCESS_TOKEN env var).
    #[arg(short, long)]
    pub token: Option<String>,

    /// Don't overwrite existing files.
    #[arg(long)]
    pub no_overwrite: bool,

    /// Enable verbose output.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when RUST_LOG is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Runs one upload. Returns the final remote path; the error carries the
/// process exit code (1 local, 2 auth, 3 upload).
pub fn run(cli: &Cli) -> Result<String, UploadError> {
    let cfg = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("config unavailable ({e:#}), using defaults");
        DropupConfig::default()
    });
    tracing::debug!("loaded config: {cfg:?}");

    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("DROPBOX_ACCESS_TOKEN").ok())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            UploadError::Auth(
                "no Dropbox access token; set DROPBOX_ACCESS_TOKEN or pass --token".into(),
            )
        })?;

    let folder = cli
        .folder
        .clone()
        .or_else(|| std::env::var("DROPBOX_FOLDER").ok())
        .unwrap_or_else(|| "/".to_string());

    let mut request = UploadRequest::new(&cli.file, folder);
    request.filename = cli.filename.clone();
    request.overwrite = !cli.no_overwrite;
    request.chunk_threshold = cfg.chunk_threshold_bytes;
    request.chunk_size = cfg.chunk_size_bytes;

    let client = DropboxClient::new(token);
    let policy = cfg.retry_policy();
    let remote = uploader::upload(&client, &request, &policy)?;

    write_github_output(&remote);
    Ok(remote)
}

/// In GitHub Actions, publish the remote path as a step output.
fn write_github_output(remote: &str) {
    let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
        return;
    };
    if path.is_empty() {
        return;
    }
    match std::fs::OpenOptions::new().append(true).create(true).open(&path) {
        Ok(mut f) => {
            if let Err(e) = writeln!(f, "dropbox_path={remote}") {
                tracing::warn!("could not write GITHUB_OUTPUT: {e}");
            }
        }
        Err(e) => tracing::warn!("could not open GITHUB_OUTPUT: {e}"),
    }
}
