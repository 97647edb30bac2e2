//! Core traits that decouple wfshade from a concrete socket or compositor.
//!
//! * [`Transport`] is the byte stream underneath a
//!   [`Connection`](crate::ipc::connection::Connection).  The real one is a
//!   [`UnixStream`]; tests plug in in-memory fakes.
//! * [`ShaderControl`] is the set of shader operations a tool needs.  The
//!   Wayfire implementation lives in [`wayfire`](crate::wayfire); tools
//!   only depend on this trait.

use crate::ipc::message::Response;
use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

/// Identifier the compositor assigns to a view.
pub type ViewId = u64;

/// An ordered, reliable byte stream to the compositor.
///
/// `read` may return fewer bytes than requested and `Ok(0)` means the
/// peer closed its end.
pub trait Transport: Read + Write + Send {
    /// Shut down both directions of the stream.
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for UnixStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(std::net::Shutdown::Both)
    }
}

/// Apply, remove and query shaders on views and outputs.
///
/// Shader paths must already be absolute; implementations send them as is.
/// Semantic validation (does the view exist, does the file compile) is up
/// to the compositor.
pub trait ShaderControl {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Apply `shader` to `view`, replacing any shader it already has.
    fn set_view_shader(&self, view: ViewId, shader: &Path) -> Result<Response, Self::Error>;

    /// Remove the shader from `view`.
    fn unset_view_shader(&self, view: ViewId) -> Result<Response, Self::Error>;

    /// Whether `view` currently has a shader.
    fn view_has_shader(&self, view: ViewId) -> Result<bool, Self::Error>;

    /// Apply `shader` to the fullscreen stage of `output`.
    fn set_fs_shader(&self, output: &str, shader: &Path) -> Result<Response, Self::Error>;

    /// Remove the fullscreen shader from `output`.
    fn unset_fs_shader(&self, output: &str) -> Result<Response, Self::Error>;

    /// Whether `output` currently has a fullscreen shader.
    fn fs_has_shader(&self, output: &str) -> Result<bool, Self::Error>;

    /// Remove the fullscreen shader if `output` has one, otherwise apply
    /// `shader`.  Returns the response of the set/unset call and whether a
    /// shader is active afterwards.
    fn toggle_fs_shader(&self, output: &str, shader: &Path) -> Result<(Response, bool), Self::Error> {
        if self.fs_has_shader(output)? {
            Ok((self.unset_fs_shader(output)?, false))
        } else {
            Ok((self.set_fs_shader(output, shader)?, true))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    //  Mock ShaderControl

    /// A test double that keeps shader state in memory and records calls.
    #[derive(Debug, Default)]
    struct MockCompositor {
        fs: RefCell<HashMap<String, PathBuf>>,
        calls: RefCell<Vec<String>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    fn ok() -> Response {
        Response(json!({"result": "ok"}))
    }

    impl ShaderControl for MockCompositor {
        type Error = MockError;

        fn set_view_shader(&self, _: ViewId, _: &Path) -> Result<Response, MockError> {
            Err(MockError)
        }

        fn unset_view_shader(&self, _: ViewId) -> Result<Response, MockError> {
            Err(MockError)
        }

        fn view_has_shader(&self, _: ViewId) -> Result<bool, MockError> {
            Err(MockError)
        }

        fn set_fs_shader(&self, output: &str, shader: &Path) -> Result<Response, MockError> {
            self.calls.borrow_mut().push(format!("set {output}"));
            self.fs.borrow_mut().insert(output.into(), shader.into());
            Ok(ok())
        }

        fn unset_fs_shader(&self, output: &str) -> Result<Response, MockError> {
            self.calls.borrow_mut().push(format!("unset {output}"));
            self.fs.borrow_mut().remove(output);
            Ok(ok())
        }

        fn fs_has_shader(&self, output: &str) -> Result<bool, MockError> {
            self.calls.borrow_mut().push(format!("query {output}"));
            Ok(self.fs.borrow().contains_key(output))
        }
    }

    #[test]
    fn toggle_sets_then_unsets() {
        let c = MockCompositor::default();
        let shader = Path::new("/shaders/crt");

        let (_, active) = c.toggle_fs_shader("DP-1", shader).unwrap();
        assert!(active);
        assert_eq!(c.fs.borrow().get("DP-1").map(PathBuf::as_path), Some(shader));

        let (_, active) = c.toggle_fs_shader("DP-1", shader).unwrap();
        assert!(!active);
        assert!(c.fs.borrow().is_empty());

        assert_eq!(
            *c.calls.borrow(),
            vec!["query DP-1", "set DP-1", "query DP-1", "unset DP-1"]
        );
    }

    #[test]
    fn toggle_propagates_query_failure() {
        struct Broken;
        impl ShaderControl for Broken {
            type Error = MockError;
            fn set_view_shader(&self, _: ViewId, _: &Path) -> Result<Response, MockError> {
                unreachable!()
            }
            fn unset_view_shader(&self, _: ViewId) -> Result<Response, MockError> {
                unreachable!()
            }
            fn view_has_shader(&self, _: ViewId) -> Result<bool, MockError> {
                unreachable!()
            }
            fn set_fs_shader(&self, _: &str, _: &Path) -> Result<Response, MockError> {
                panic!("must not set after a failed query")
            }
            fn unset_fs_shader(&self, _: &str) -> Result<Response, MockError> {
                panic!("must not unset after a failed query")
            }
            fn fs_has_shader(&self, _: &str) -> Result<bool, MockError> {
                Err(MockError)
            }
        }

        assert!(Broken.toggle_fs_shader("DP-1", Path::new("/x")).is_err());
    }

    #[test]
    fn unix_stream_close_shuts_down_peer() {
        let (mut a, mut b) = UnixStream::pair().unwrap();
        Transport::close(&mut a).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(b.read(&mut buf).unwrap(), 0);
    }
}
