//! **wfshade**: drive Wayfire's per-view and fullscreen shaders over IPC.
//!
//! The compositor listens on a Unix socket and speaks length-prefixed JSON.
//! This crate is the client side of that conversation.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::Transport`]: the byte stream under a connection, so the
//!   framing and call logic can be exercised without a compositor.
//! * [`traits::ShaderControl`]: the shader operations tools rely on, so a
//!   tool is not coupled to Wayfire's method names.
//!
//! [`ipc`] holds the connection, the frame codec and the request/response
//! engine; [`wayfire`] maps [`ShaderControl`](traits::ShaderControl) onto
//! the `wf/filters/*` methods.  [`command`] and [`config`] back the
//! `wfshade` binary.
//!
//! ```no_run
//! use std::path::Path;
//! use wfshade::ipc::client::Client;
//! use wfshade::traits::ShaderControl;
//!
//! # fn main() -> Result<(), wfshade::ipc::IpcError> {
//! let client = Client::connect("/run/user/1000/wayfire-wayland-1-.socket")?;
//! if !client.view_has_shader(42)? {
//!     client.set_view_shader(42, Path::new("/home/me/shaders/invert"))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod ipc;
pub mod traits;
pub mod wayfire;
