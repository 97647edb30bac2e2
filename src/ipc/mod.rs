//! Client side of the compositor's IPC socket.
//!
//! The compositor speaks length-prefixed JSON over a Unix stream socket:
//! every frame is a little-endian `u32` byte count followed by that many
//! bytes of UTF-8 JSON.  Requests look like
//! `{"method": "...", "data": {...}}`; responses are method-specific
//! objects.
//!
//! The layers, leaves first:
//!
//! * [`connection`] owns the socket (or any other [`Transport`](crate::traits::Transport)).
//! * [`frame`] reads and writes whole frames.
//! * [`client`] pairs one request with exactly one response.

pub mod client;
pub mod connection;
pub mod frame;
pub mod message;

use std::path::PathBuf;

/// Everything that can go wrong while talking to the compositor.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// The endpoint does not exist or refused the connection.
    #[error("cannot connect to {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The peer closed the stream before a full read was satisfied.
    #[error("connection closed after {received} of {expected} bytes")]
    Truncated { expected: usize, received: usize },

    /// The length prefix announced a frame larger than allowed.
    #[error("frame of {len} bytes exceeds maximum of {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// The payload was not valid JSON (or could not be serialized).
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A read or write did not complete before the configured deadline.
    #[error("timed out waiting for the compositor")]
    Timeout,

    /// Any other transport failure.
    #[error("io error: {0}")]
    Io(std::io::Error),

    /// The connection was closed explicitly.
    #[error("connection is closed")]
    Closed,

    /// An earlier failure left the stream in an unknown state.
    #[error("connection failed earlier and cannot be reused")]
    Failed,

    /// The compositor answered with `{"error": ...}` where a value was
    /// required.
    #[error("compositor error: {0}")]
    Remote(String),

    /// The response was well formed but lacked an expected key.
    #[error("response has no {0:?} field")]
    MissingField(&'static str),
}

impl IpcError {
    /// `true` for errors caused by a corrupt stream or protocol mismatch.
    pub fn is_protocol(&self) -> bool {
        matches!(self, IpcError::FrameTooLarge { .. } | IpcError::Json(_))
    }
}

impl From<std::io::Error> for IpcError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            // Socket timeouts report WouldBlock on Unix.
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => IpcError::Timeout,
            _ => IpcError::Io(err),
        }
    }
}
