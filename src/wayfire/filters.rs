//! [`ShaderControl`] over Wayfire's `filters` plugin.
//!
//! | Method                          | `data`                        | Reply            |
//! |---------------------------------|-------------------------------|------------------|
//! | `wf/filters/set-view-shader`    | `view-id`, `shader-path`      | ack              |
//! | `wf/filters/unset-view-shader`  | `view-id`                     | ack              |
//! | `wf/filters/view-has-shader`    | `view-id`                     | `has-shader`     |
//! | `wf/filters/set-fs-shader`      | `output-name`, `shader-path`  | ack              |
//! | `wf/filters/unset-fs-shader`    | `output-name`                 | ack              |
//! | `wf/filters/fs-has-shader`      | `output-name`                 | `has-shader`     |
//!
//! An ack is `{"result": "ok"}` or `{"error": "..."}`; either is handed back
//! as a [`Response`].

use crate::ipc::client::Client;
use crate::ipc::message::{Message, Response};
use crate::ipc::IpcError;
use crate::traits::{ShaderControl, Transport, ViewId};
use log::info;
use serde_json::Value;
use std::path::Path;

pub const SET_VIEW_SHADER: &str = "wf/filters/set-view-shader";
pub const UNSET_VIEW_SHADER: &str = "wf/filters/unset-view-shader";
pub const VIEW_HAS_SHADER: &str = "wf/filters/view-has-shader";
pub const SET_FS_SHADER: &str = "wf/filters/set-fs-shader";
pub const UNSET_FS_SHADER: &str = "wf/filters/unset-fs-shader";
pub const FS_HAS_SHADER: &str = "wf/filters/fs-has-shader";

const VIEW_ID: &str = "view-id";
const OUTPUT_NAME: &str = "output-name";
const SHADER_PATH: &str = "shader-path";
const HAS_SHADER: &str = "has-shader";

/// Paths travel as JSON strings; a non-UTF-8 path cannot be sent.
fn path_value(shader: &Path) -> Result<Value, IpcError> {
    Ok(serde_json::to_value(shader)?)
}

impl<T: Transport> ShaderControl for Client<T> {
    type Error = IpcError;

    fn set_view_shader(&self, view: ViewId, shader: &Path) -> Result<Response, IpcError> {
        info!("view {}: applying {}", view, shader.display());
        self.request(
            &Message::new(SET_VIEW_SHADER)
                .with(VIEW_ID, view)
                .with(SHADER_PATH, path_value(shader)?),
        )
    }

    fn unset_view_shader(&self, view: ViewId) -> Result<Response, IpcError> {
        info!("view {}: removing shader", view);
        self.request(&Message::new(UNSET_VIEW_SHADER).with(VIEW_ID, view))
    }

    fn view_has_shader(&self, view: ViewId) -> Result<bool, IpcError> {
        self.request(&Message::new(VIEW_HAS_SHADER).with(VIEW_ID, view))?
            .flag(HAS_SHADER)
    }

    fn set_fs_shader(&self, output: &str, shader: &Path) -> Result<Response, IpcError> {
        info!("output {}: applying {}", output, shader.display());
        self.request(
            &Message::new(SET_FS_SHADER)
                .with(OUTPUT_NAME, output)
                .with(SHADER_PATH, path_value(shader)?),
        )
    }

    fn unset_fs_shader(&self, output: &str) -> Result<Response, IpcError> {
        info!("output {}: removing fullscreen shader", output);
        self.request(&Message::new(UNSET_FS_SHADER).with(OUTPUT_NAME, output))
    }

    fn fs_has_shader(&self, output: &str) -> Result<bool, IpcError> {
        self.request(&Message::new(FS_HAS_SHADER).with(OUTPUT_NAME, output))?
            .flag(HAS_SHADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::client::tests::{scripted_client, ScriptedTransport};
    use serde_json::json;

    fn ok() -> Value {
        json!({"result": "ok"})
    }

    #[test]
    fn set_view_shader_payload() {
        let (client, written) = scripted_client(&[ok()]);
        let resp = client.set_view_shader(42, Path::new("/abs/shader.glsl")).unwrap();
        assert!(resp.is_ok());
        assert_eq!(
            ScriptedTransport::sent(&written),
            vec![json!({
                "method": "wf/filters/set-view-shader",
                "data": {"view-id": 42, "shader-path": "/abs/shader.glsl"}
            })]
        );
    }

    #[test]
    fn unset_view_shader_payload() {
        let (client, written) = scripted_client(&[ok()]);
        client.unset_view_shader(7).unwrap();
        assert_eq!(
            ScriptedTransport::sent(&written),
            vec![json!({"method": "wf/filters/unset-view-shader", "data": {"view-id": 7}})]
        );
    }

    #[test]
    fn fs_payloads_always_name_the_output() {
        let (client, written) = scripted_client(&[
            ok(),
            ok(),
            json!({"result": "ok", "has-shader": true}),
        ]);
        client.set_fs_shader("DP-1", Path::new("/s/crt")).unwrap();
        client.unset_fs_shader("DP-1").unwrap();
        client.fs_has_shader("DP-1").unwrap();
        assert_eq!(
            ScriptedTransport::sent(&written),
            vec![
                json!({"method": SET_FS_SHADER, "data": {"output-name": "DP-1", "shader-path": "/s/crt"}}),
                json!({"method": UNSET_FS_SHADER, "data": {"output-name": "DP-1"}}),
                json!({"method": FS_HAS_SHADER, "data": {"output-name": "DP-1"}}),
            ]
        );
    }

    #[test]
    fn queries_pass_the_flag_through() {
        let (client, _) = scripted_client(&[
            json!({"result": "ok", "has-shader": true}),
            json!({"result": "ok", "has-shader": false}),
            json!({"result": "ok", "has-shader": false}),
            json!({"result": "ok", "has-shader": true}),
        ]);
        assert!(client.view_has_shader(1).unwrap());
        assert!(!client.view_has_shader(1).unwrap());
        assert!(!client.fs_has_shader("HDMI-A-1").unwrap());
        assert!(client.fs_has_shader("HDMI-A-1").unwrap());
    }

    #[test]
    fn query_on_unknown_view_reports_remote_error() {
        let (client, _) = scripted_client(&[json!({"error": "Failed to find view with given id."})]);
        match client.view_has_shader(999) {
            Err(IpcError::Remote(msg)) => assert_eq!(msg, "Failed to find view with given id."),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn set_failure_is_returned_as_data() {
        let (client, _) = scripted_client(&[json!({"error": "Failed to compile shader."})]);
        let resp = client.set_view_shader(3, Path::new("/bad.glsl")).unwrap();
        assert_eq!(resp.error(), Some("Failed to compile shader."));
    }

    #[test]
    fn toggle_uses_wayfire_methods() {
        let (client, written) = scripted_client(&[
            json!({"result": "ok", "has-shader": true}),
            ok(),
        ]);
        let (_, active) = client.toggle_fs_shader("DP-2", Path::new("/s/crt")).unwrap();
        assert!(!active);
        let methods: Vec<Value> = ScriptedTransport::sent(&written)
            .into_iter()
            .map(|m| m["method"].clone())
            .collect();
        assert_eq!(methods, vec![json!(FS_HAS_SHADER), json!(UNSET_FS_SHADER)]);
    }

    #[test]
    fn non_utf8_path_is_rejected_before_sending() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (client, written) = scripted_client(&[ok()]);
        let path = Path::new(OsStr::from_bytes(b"/shaders/\xff"));
        let err = client.set_view_shader(1, path).unwrap_err();
        assert!(matches!(err, IpcError::Json(_)));
        assert!(written.lock().unwrap().is_empty());
    }
}
