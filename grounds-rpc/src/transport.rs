//! Transport abstraction for reaching the attribute store.
//!
//! The store listens on a local stream socket and handles exactly one
//! request per connection: the client writes one raw JSON request, the
//! server writes one raw JSON response and closes.

use crate::error::{RpcError, RpcResult};
use crate::protocol::{Request, Response};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::debug;

pub mod mock;

/// Default location of the store's domain socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/groundsapi.sock";

/// Sends one request envelope and waits for its response envelope.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn round_trip(&self, request: Request) -> RpcResult<Response>;
}

/// Transport over the store's Unix domain socket.
///
/// Opens a fresh connection for every call: no pooling, no retry and no
/// timeout. A hung store hangs the caller; impose a deadline outside if
/// one is needed.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    socket_path: PathBuf,
}

impl UnixSocketTransport {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Default for UnixSocketTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SOCKET_PATH)
    }
}

#[async_trait]
impl ApiTransport for UnixSocketTransport {
    async fn round_trip(&self, request: Request) -> RpcResult<Response> {
        let payload = serde_json::to_vec(&request)?;

        let mut stream = UnixStream::connect(&self.socket_path).await?;
        stream.write_all(&payload).await?;
        stream.flush().await?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        if buf.is_empty() {
            return Err(RpcError::MalformedResponse(format!(
                "connection closed without a response to {}",
                request.method
            )));
        }
        debug!(method = %request.method, bytes = buf.len(), "Received store response");

        Ok(serde_json::from_slice(&buf)?)
    }
}
