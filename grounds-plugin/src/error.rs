//! Error types for plugin handlers.

use grounds_attr::AttrError;
use grounds_rpc::{RpcError, codes};
use serde_json::Value;
use thiserror::Error;

/// Result of one subcommand handler.
pub type HandlerResult = Result<Value, PluginError>;

/// Errors a handler can finish with.
///
/// Only the message reaches the caller. Argument problems answer with the
/// invalid-params code; everything else answers with the internal-error
/// code, whatever code the underlying store call carried.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Wrong argument count or malformed argument.
    #[error("{0}")]
    InvalidArguments(String),

    /// A store call failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// A stored attribute could not be decoded.
    #[error(transparent)]
    Attr(#[from] AttrError),

    /// The handler refused the request.
    #[error("{0}")]
    Rejected(String),
}

impl PluginError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Returns the code this error is reported with.
    pub fn response_code(&self) -> i64 {
        match self {
            Self::InvalidArguments(_) => codes::INVALID_PARAMS,
            _ => codes::INTERNAL_ERROR,
        }
    }

    /// Returns true if a store call reported something absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rpc(e) if e.is_not_found())
    }
}

/// Result of a handler whose output went to players as messages.
pub fn done() -> HandlerResult {
    Ok(Value::String(String::new()))
}
