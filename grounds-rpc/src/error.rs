//! Error types for the RPC layer.

use crate::protocol::{ErrorObject, codes};
use grounds_attr::AttrError;
use thiserror::Error;

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Errors that can occur while calling the attribute store.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Socket could not be opened, written or read.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Request could not be serialized or the response was not JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response was JSON but not a usable response envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Rejected locally before any network call.
    #[error("{0}")]
    InvalidParams(String),

    /// The store answered with an error object.
    #[error("{message}")]
    Remote { code: i64, message: String },

    /// An attribute returned by the store could not be decoded.
    #[error(transparent)]
    Attr(#[from] AttrError),
}

impl RpcError {
    /// Returns the numeric code for this failure.
    ///
    /// Remote errors keep the store's code; local faults map onto the
    /// standard JSON-RPC codes so every failure carries one.
    pub fn code(&self) -> i64 {
        match self {
            Self::Remote { code, .. } => *code,
            Self::Serialization(_) => codes::PARSE_ERROR,
            Self::MalformedResponse(_) => codes::INVALID_REQUEST,
            Self::InvalidParams(_) => codes::INVALID_PARAMS,
            Self::Transport(_) | Self::Attr(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Returns true if the store reported the entity or attribute absent.
    ///
    /// Only a remote error can mean "not found"; local faults never do.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { code, .. } if *code == codes::NOT_FOUND)
    }
}

impl From<ErrorObject> for RpcError {
    fn from(error: ErrorObject) -> Self {
        Self::Remote {
            code: error.code,
            message: error.message,
        }
    }
}
