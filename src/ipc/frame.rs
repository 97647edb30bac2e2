//! Length-prefixed JSON framing.
//!
//! # Wire format
//!
//! ```text
//! +----------------+---------------------------+
//! | u32 LE  length | length bytes of UTF-8 JSON |
//! +----------------+---------------------------+
//! ```
//!
//! A transport may hand back fewer bytes than asked for, so every read goes
//! through [`read_exact`], which keeps reading until the count is met or the
//! peer hangs up.  Inbound lengths are checked against a maximum before
//! anything is allocated.

use super::IpcError;
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{ErrorKind, Read, Write};

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest inbound frame accepted unless configured otherwise (16 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Read exactly `n` bytes from `reader`.
///
/// Fails with [`IpcError::Truncated`] as soon as a read returns zero bytes
/// before `n` were collected.
pub fn read_exact<R: Read + ?Sized>(reader: &mut R, n: usize) -> Result<Vec<u8>, IpcError> {
    let mut buf = vec![0u8; n];
    let mut filled = 0;
    while filled < n {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(IpcError::Truncated {
                    expected: n,
                    received: filled,
                })
            }
            Ok(read) => filled += read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(buf)
}

/// Read one frame and decode its payload as JSON.
///
/// Frames announcing more than `max_len` bytes are rejected with
/// [`IpcError::FrameTooLarge`] before the payload is read.
pub fn read_message<T, R>(reader: &mut R, max_len: usize) -> Result<T, IpcError>
where
    T: DeserializeOwned,
    R: Read + ?Sized,
{
    let header = read_exact(reader, HEADER_LEN)?;
    let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    if len > max_len {
        return Err(IpcError::FrameTooLarge { len, max: max_len });
    }
    let payload = read_exact(reader, len)?;
    trace!("<- {}", String::from_utf8_lossy(&payload));
    Ok(serde_json::from_slice(&payload)?)
}

/// Encode `value` as one frame: length prefix followed by the JSON bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, IpcError> {
    let payload = serde_json::to_vec(value)?;
    let len = u32::try_from(payload.len()).map_err(|_| IpcError::FrameTooLarge {
        len: payload.len(),
        max: u32::MAX as usize,
    })?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Serialize `value` and write it as one frame.
///
/// Prefix and payload go out in a single buffer; partial writes are retried
/// until every byte is on the wire.
pub fn write_message<T, W>(writer: &mut W, value: &T) -> Result<(), IpcError>
where
    T: Serialize + ?Sized,
    W: Write + ?Sized,
{
    let frame = encode(value)?;
    trace!("-> {}", String::from_utf8_lossy(&frame[HEADER_LEN..]));
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

//  Tests
