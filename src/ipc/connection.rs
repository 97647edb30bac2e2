//! A single stream to the compositor's IPC socket.
//!
//! A [`Connection`] is created connected, moves to [`State::Failed`] on the
//! first transport or framing error, and to [`State::Closed`] on
//! [`close`](Connection::close).  Both are terminal: there is no
//! reconnection.  The socket is shut down when the connection is dropped.

use super::frame;
use super::IpcError;
use crate::traits::Transport;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lifecycle of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Connected,
    /// An I/O, truncation or protocol error occurred; frame boundaries can
    /// no longer be trusted.
    Failed,
    Closed,
}

/// Socket-level knobs applied when opening a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOptions {
    /// Read and write deadline.  `None` blocks forever.
    pub timeout: Option<Duration>,
    /// Largest inbound frame accepted.
    pub max_frame_len: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(5)),
            max_frame_len: frame::DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// An open byte stream to a fixed endpoint.
pub struct Connection<T: Transport = UnixStream> {
    endpoint: PathBuf,
    stream: T,
    state: State,
    max_frame_len: usize,
}

impl Connection<UnixStream> {
    /// Connect to the Unix socket at `endpoint` with default options.
    pub fn open(endpoint: impl AsRef<Path>) -> Result<Self, IpcError> {
        Self::open_with(endpoint, &ConnectOptions::default())
    }

    /// Connect to the Unix socket at `endpoint`.
    pub fn open_with(endpoint: impl AsRef<Path>, options: &ConnectOptions) -> Result<Self, IpcError> {
        let path = endpoint.as_ref().to_path_buf();
        let setup = || -> std::io::Result<UnixStream> {
            let stream = UnixStream::connect(&path)?;
            stream.set_read_timeout(options.timeout)?;
            stream.set_write_timeout(options.timeout)?;
            Ok(stream)
        };
        let stream = setup().map_err(|source| IpcError::Connection {
            path: path.clone(),
            source,
        })?;
        debug!("connected to {}", path.display());

        let mut conn = Self::from_transport(path, stream);
        conn.max_frame_len = options.max_frame_len;
        Ok(conn)
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already established transport.
    ///
    /// `endpoint` is only used for diagnostics.
    pub fn from_transport(endpoint: impl Into<PathBuf>, stream: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            stream,
            state: State::Connected,
            max_frame_len: frame::DEFAULT_MAX_FRAME_LEN,
        }
    }

    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    pub fn set_max_frame_len(&mut self, max: usize) {
        self.max_frame_len = max;
    }

    /// Write all of `bytes`.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), IpcError> {
        self.guarded(|s| {
            s.write_all(bytes)?;
            s.flush()?;
            Ok(())
        })
    }

    /// One read of at most `n` bytes.  An empty result means the peer
    /// closed its end.
    pub fn receive_up_to(&mut self, n: usize) -> Result<Vec<u8>, IpcError> {
        self.guarded(|s| {
            let mut buf = vec![0u8; n];
            let read = loop {
                match s.read(&mut buf) {
                    Ok(read) => break read,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            buf.truncate(read);
            Ok(buf)
        })
    }

    /// Send `value` as one frame.
    pub fn write_message<M: Serialize + ?Sized>(&mut self, value: &M) -> Result<(), IpcError> {
        self.guarded(|s| frame::write_message(s, value))
    }

    /// Receive one frame and decode it.
    pub fn read_message<M: DeserializeOwned>(&mut self) -> Result<M, IpcError> {
        let max = self.max_frame_len;
        self.guarded(|s| frame::read_message(s, max))
    }

    /// Shut the stream down.  Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), IpcError> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;
        debug!("closing connection to {}", self.endpoint.display());
        match self.stream.close() {
            Ok(()) => Ok(()),
            // The peer may have gone already.
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(IpcError::Io(e)),
        }
    }

    /// Run `op` on the stream if the connection is usable, marking it
    /// failed if `op` errors.
    fn guarded<R>(&mut self, op: impl FnOnce(&mut T) -> Result<R, IpcError>) -> Result<R, IpcError> {
        match self.state {
            State::Connected => {}
            State::Failed => return Err(IpcError::Failed),
            State::Closed => return Err(IpcError::Closed),
        }
        let result = op(&mut self.stream);
        if let Err(e) = &result {
            warn!("connection to {} failed: {}", self.endpoint.display(), e);
            self.state = State::Failed;
        }
        result
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        if self.state != State::Closed {
            let _ = self.stream.close();
        }
    }
}

//  Tests
