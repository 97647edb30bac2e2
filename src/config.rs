//! Application configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/wfshade/config.json` when present.  Every
//! key is optional; a missing file means compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "socket": "/run/user/1000/wayfire-wayland-1-.socket",
//!   "timeout_ms": 2000,
//!   "max_frame_len": 1048576
//! }
//! ```

use crate::ipc::connection::ConnectOptions;
use crate::ipc::frame::DEFAULT_MAX_FRAME_LEN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compositor socket.  Takes precedence over `$WAYFIRE_SOCKET`.
    pub socket: Option<PathBuf>,
    /// Read/write deadline for a single call (ms).  `0` waits forever.
    pub timeout_ms: u64,
    /// Largest response frame accepted (bytes).
    pub max_frame_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket: None,
            timeout_ms: 5000,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Socket options derived from this configuration.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            timeout: (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms)),
            max_frame_len: self.max_frame_len,
        }
    }

    /// Pick the endpoint: explicit flag, then config file, then the
    /// compositor's environment.
    pub fn resolve_endpoint(&self, flag: Option<&Path>, env: Option<PathBuf>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.socket.clone())
            .or(env)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
