use crate::redirect::{RedirectDisplay, RedirectPolicy, DEFAULT_MAX_REDIRECTS};
use crate::transport::TransportOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User defaults loaded from `~/.config/ralad/config.toml`. Every key is
/// optional; command-line flags override what is set here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaladConfig {
    /// Redirect confirmation policy: "always", "relaxed" or "never".
    pub redirect_policy: RedirectPolicy,
    /// How redirect targets are shown: "full", "part" or "truncate".
    pub redirect_display: RedirectDisplay,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    /// Skip TLS certificate verification.
    pub unsafe_tls: bool,
    pub connect_timeout_secs: u64,
    /// Abort when the transfer stays below this rate (bytes/s) ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
}

impl Default for RaladConfig {
    fn default() -> Self {
        Self {
            redirect_policy: RedirectPolicy::default(),
            redirect_display: RedirectDisplay::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            unsafe_tls: false,
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

impl RaladConfig {
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            unsafe_tls: self.unsafe_tls,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            low_speed_limit: self.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
        }
    }
}

/// Location of an existing config file, if any.
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ralad")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration from the XDG config dir, or defaults when no file
/// exists. Nothing is written to disk.
pub fn load() -> Result<RaladConfig> {
    match config_path()? {
        Some(path) => load_from(&path),
        None => {
            tracing::debug!("no config file, using defaults");
            Ok(RaladConfig::default())
        }
    }
}

pub fn load_from(path: &Path) -> Result<RaladConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: RaladConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
