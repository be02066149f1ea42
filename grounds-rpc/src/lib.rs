//! JSON-RPC plumbing between Grounds plugins and the attribute store.
//!
//! Plugins are invoked with one JSON-RPC request and answer it with one
//! response. While handling a call they reach back into the store over a
//! local socket with the same envelope format. This crate provides:
//!
//! - the envelope types and error codes ([`protocol`])
//! - the transport seam and its Unix socket implementation ([`transport`])
//! - a typed client for the store's methods ([`ApiClient`])
//! - structured reply payloads ([`message`])

mod client;
mod error;
pub mod message;
pub mod protocol;
pub mod transport;

pub use client::ApiClient;
pub use error::{RpcError, RpcResult};
pub use protocol::{ErrorObject, Params, Request, RequestId, Response, codes};
pub use transport::{ApiTransport, UnixSocketTransport};
