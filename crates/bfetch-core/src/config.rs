use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub(crate) fn default_user_agent() -> String {
    format!("bfetch/{}", env!("CARGO_PKG_VERSION"))
}

/// Global configuration loaded from `~/.config/bfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Seconds to wait for the TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Optional overall transfer deadline in seconds (None = no limit).
    pub timeout_secs: Option<u64>,
    /// Abort when throughput stays below `stall_min_bytes_per_sec` for this many seconds.
    pub stall_timeout_secs: Option<u64>,
    pub stall_min_bytes_per_sec: u32,
    /// User-Agent header; defaults to `bfetch/<version>`.
    pub user_agent: Option<String>,
    /// Refuse response bodies larger than this (the body is held in memory).
    pub max_body_bytes: Option<u64>,
    /// Allow the filename to resolve outside the working directory.
    pub allow_outside_cwd: bool,
    /// Reserve disk space for the body before writing it.
    pub preallocate: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: None,
            stall_timeout_secs: Some(60),
            stall_min_bytes_per_sec: 1024,
            user_agent: None,
            max_body_bytes: None,
            allow_outside_cwd: false,
            preallocate: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.connect_timeout_secs, 30);
        assert_eq!(cfg.timeout_secs, None);
        assert_eq!(cfg.stall_timeout_secs, Some(60));
        assert!(!cfg.allow_outside_cwd);
        assert!(cfg.preallocate);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FetchConfig {
            timeout_secs: Some(120),
            user_agent: Some("ci-fetch/2".into()),
            ..FetchConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            connect_timeout_secs = 5
            max_body_bytes = 1_000_000
        "#;
        let cfg: FetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.connect_timeout_secs, 5);
        assert_eq!(cfg.max_body_bytes, Some(1_000_000));
        assert_eq!(cfg.stall_min_bytes_per_sec, 1024);
        assert!(cfg.user_agent.is_none());
        assert!(cfg.preallocate);
    }

    #[test]
    fn config_toml_rejects_wrong_types() {
        let toml = r#"connect_timeout_secs = "soon""#;
        assert!(toml::from_str::<FetchConfig>(toml).is_err());
    }
}
