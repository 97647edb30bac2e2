//! Wayfire-specific pieces.
//!
//! [`filters`] implements [`ShaderControl`](crate::traits::ShaderControl)
//! against the `wf/filters/*` methods registered by Wayfire's `filters`
//! plugin.  Nothing outside this module should know Wayfire's method names
//! or environment variables.

pub mod filters;

use std::path::PathBuf;

/// Environment variable Wayfire exports with the path of its IPC socket.
pub const SOCKET_ENV: &str = "WAYFIRE_SOCKET";

/// The IPC socket advertised by the running compositor, if any.
pub fn socket_from_env() -> Option<PathBuf> {
    std::env::var_os(SOCKET_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
