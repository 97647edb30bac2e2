//! Request and response payloads carried inside frames.

use super::IpcError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One outbound request: a method name plus its arguments.
///
/// Serializes to `{"method": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub method: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Message {
    /// A message with an empty `data` object.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            data: Map::new(),
        }
    }

    /// Add a field to `data`, builder style.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// Whatever the compositor sent back.
///
/// The shape depends on the method.  By convention a successful call
/// carries `"result": "ok"` and a failed one carries `"error": "<text>"`.
/// Neither is enforced here; a compositor-side failure is ordinary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(pub Value);

impl Response {
    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The compositor's error message, if it reported one.
    pub fn error(&self) -> Option<&str> {
        self.get("error").and_then(Value::as_str)
    }

    /// `true` unless the response carries an `error`.
    pub fn is_ok(&self) -> bool {
        self.error().is_none()
    }

    /// Extract a boolean under `key`.
    ///
    /// A response with an `error` instead becomes [`IpcError::Remote`].
    pub fn flag(&self, key: &'static str) -> Result<bool, IpcError> {
        match self.get(key).and_then(Value::as_bool) {
            Some(b) => Ok(b),
            None => match self.error() {
                Some(msg) => Err(IpcError::Remote(msg.to_string())),
                None => Err(IpcError::MissingField(key)),
            },
        }
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_serializes_method_and_data() {
        let msg = Message::new("wf/filters/view-has-shader").with("view-id", 7u64);
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            v,
            json!({"method": "wf/filters/view-has-shader", "data": {"view-id": 7}})
        );
    }

    #[test]
    fn message_without_data_gets_empty_object() {
        let msg: Message = serde_json::from_str(r#"{"method":"x"}"#).unwrap();
        assert!(msg.data.is_empty());
        let v = serde_json::to_value(Message::new("x")).unwrap();
        assert_eq!(v, json!({"method": "x", "data": {}}));
    }

    #[test]
    fn flag_reads_boolean() {
        let r = Response(json!({"result": "ok", "has-shader": false}));
        assert!(!r.flag("has-shader").unwrap());
        assert!(r.is_ok());
    }

    #[test]
    fn flag_surfaces_remote_error() {
        let r = Response(json!({"error": "Failed to find view with given id."}));
        assert!(!r.is_ok());
        match r.flag("has-shader") {
            Err(IpcError::Remote(msg)) => assert_eq!(msg, "Failed to find view with given id."),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn flag_missing_without_error() {
        let r = Response(json!({"result": "ok"}));
        assert!(matches!(r.flag("has-shader"), Err(IpcError::MissingField("has-shader"))));
    }

    #[test]
    fn non_boolean_flag_is_missing() {
        let r = Response(json!({"has-shader": "yes"}));
        assert!(matches!(r.flag("has-shader"), Err(IpcError::MissingField(_))));
    }
}
