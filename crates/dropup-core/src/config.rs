use crate::retry::RetryPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per step (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 5.0 = 5s).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 5.0,
            max_delay_secs: 60,
        }
    }
}

/// Global configuration loaded from `~/.config/dropup/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropupConfig {
    /// Files at or below this size (bytes) are uploaded in one request.
    pub chunk_threshold_bytes: u64,
    /// Chunk size (bytes) for session uploads of larger files.
    pub chunk_size_bytes: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for DropupConfig {
    fn default() -> Self {
        Self {
            chunk_threshold_bytes: 150 * 1024 * 1024,
            chunk_size_bytes: 4 * 1024 * 1024,
            retry: None,
        }
    }
}

impl DropupConfig {
    /// Retry policy from the optional `[retry]` table, or the defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        match &self.retry {
            Some(r) => RetryPolicy {
                max_attempts: r.max_attempts.max(1),
                base_delay: Duration::from_secs_f64(r.base_delay_secs.max(0.0)),
                max_delay: Duration::from_secs(r.max_delay_secs),
            },
            None => RetryPolicy::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dropup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DropupConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DropupConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DropupConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = DropupConfig::default();
        assert_eq!(cfg.chunk_threshold_bytes, 150 * 1024 * 1024);
        assert_eq!(cfg.chunk_size_bytes, 4 * 1024 * 1024);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = DropupConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: DropupConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.chunk_threshold_bytes, cfg.chunk_threshold_bytes);
        assert_eq!(parsed.chunk_size_bytes, cfg.chunk_size_bytes);
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            chunk_threshold_bytes = 1048576
            chunk_size_bytes = 65536

            [retry]
            max_attempts = 5
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: DropupConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.chunk_threshold_bytes, 1_048_576);
        assert_eq!(cfg.chunk_size_bytes, 65_536);
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(15));
    }

    #[test]
    fn default_policy_when_retry_missing() {
        let toml = r#"
            chunk_threshold_bytes = 1048576
            chunk_size_bytes = 65536
        "#;
        let cfg: DropupConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(5));
    }
}
