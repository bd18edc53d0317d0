//! Logging init: stderr subscriber, level chosen by the CLI verbosity flags.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr. `default_directive` is used when
/// `RUST_LOG` is not set (the CLI passes "debug" for --verbose, "error" for
/// --quiet, "info" otherwise).
pub fn init_logging(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
