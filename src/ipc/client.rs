//! Request/response engine.
//!
//! The compositor's protocol carries no request ids: the frame read right
//! after a request is that request's answer.  [`Client`] therefore keeps
//! its connection locked for the whole write-then-read, so at most one call
//! is in flight per connection even when the client is shared between
//! threads.

use super::connection::{ConnectOptions, Connection, State};
use super::message::{Message, Response};
use super::IpcError;
use crate::traits::Transport;
use log::debug;
use serde_json::{Map, Value};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::sync::Mutex;

/// Issues calls over one [`Connection`], one at a time.
pub struct Client<T: Transport = UnixStream> {
    conn: Mutex<Connection<T>>,
}

impl Client<UnixStream> {
    /// Connect to the compositor socket at `endpoint` with default options.
    pub fn connect(endpoint: impl AsRef<Path>) -> Result<Self, IpcError> {
        Ok(Self::new(Connection::open(endpoint)?))
    }

    /// Connect to the compositor socket at `endpoint`.
    pub fn connect_with(endpoint: impl AsRef<Path>, options: &ConnectOptions) -> Result<Self, IpcError> {
        Ok(Self::new(Connection::open_with(endpoint, options)?))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(conn: Connection<T>) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Invoke `method` with `data` and wait for its response.
    ///
    /// Errors from the connection are returned unchanged; nothing is
    /// retried.
    pub fn call(&self, method: &str, data: Map<String, Value>) -> Result<Response, IpcError> {
        self.request(&Message {
            method: method.to_string(),
            data,
        })
    }

    /// Send a prepared [`Message`] and wait for its response.
    pub fn request(&self, message: &Message) -> Result<Response, IpcError> {
        // A poisoned lock means a caller panicked mid-call; the stream may
        // hold half a frame.
        let mut conn = self.conn.lock().map_err(|_| IpcError::Failed)?;
        debug!("call {}", message.method);
        conn.write_message(message)?;
        let response: Response = conn.read_message()?;
        if let Some(err) = response.error() {
            debug!("{} answered with error: {}", message.method, err);
        }
        Ok(response)
    }

    /// Current state of the underlying connection.
    pub fn state(&self) -> State {
        match self.conn.lock() {
            Ok(conn) => conn.state(),
            Err(_) => State::Failed,
        }
    }

    /// Close the underlying connection.  Later calls fail with
    /// [`IpcError::Closed`].
    pub fn close(&self) -> Result<(), IpcError> {
        self.conn.lock().map_err(|_| IpcError::Failed)?.close()
    }

    /// Give back the connection, e.g. to reuse its framing for other
    /// methods or an event stream.
    pub fn into_connection(self) -> Result<Connection<T>, IpcError> {
        self.conn.into_inner().map_err(|_| IpcError::Failed)
    }
}

//  Tests
