//! JSON-RPC 2.0 envelopes shared by the plugin boundary and the store.
//!
//! Both directions use the same shape: a request carries an id, a method
//! name and a flat parameter object; a response carries the same id and
//! exactly one of a result or an error object. Parameters whose names start
//! with `_` are reserved for the engine.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Protocol version string sent in every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Flat name to value parameter mapping.
pub type Params = Map<String, Value>;

/// Reserved parameter carrying the plugin call correlation id.
pub const PLUGIN_CALL_ID: &str = "_plugin_call_id";
/// Reserved parameter carrying the id of the extension the plugin serves.
pub const EXTENSION_ID: &str = "_extension_id";
/// Reserved parameter carrying the caller-supplied argument strings.
pub const PLUGIN_CALL_ARGUMENTS: &str = "_plugin_call_arguments";
/// Reserved parameter selecting extension (elevated) versus caller authority.
pub const AS_EXTENSION: &str = "_as_extension";

/// Standard JSON-RPC error codes plus the store's not-found sentinel.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Entity or attribute absent. Callers branch on this explicitly.
    pub const NOT_FOUND: i64 = -32004;
}

/// Request identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// A method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Creates a request with an object parameter set.
    pub fn new(id: RequestId, method: impl Into<String>, params: Params) -> Self {
        Self {
            jsonrpc: default_version(),
            id: Some(id),
            method: method.into(),
            params: Some(Value::Object(params)),
        }
    }

    /// Returns the parameters if they form an object.
    pub fn params_object(&self) -> Option<&Params> {
        self.params.as_ref().and_then(Value::as_object)
    }
}

/// Error payload of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reply to a request.
///
/// Construct through [`Response::success`] or [`Response::error`] so that
/// exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RequestId>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result: None,
            error: Some(ErrorObject::new(code, message)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
