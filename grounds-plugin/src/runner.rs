//! One-shot execution: one request in, one response out.

use crate::dispatcher::Dispatcher;
use grounds_rpc::Response;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Reads one request envelope from `input` until EOF, dispatches it and
/// writes exactly one response envelope to `output`.
///
/// Returns the response written. Only I/O on the two streams can fail;
/// every request problem is reported inside the response.
pub async fn run_once<R, W>(dispatcher: &Dispatcher, mut input: R, mut output: W) -> std::io::Result<Response>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    input.read_to_end(&mut buf).await?;
    debug!(bytes = buf.len(), "Read plugin request");

    let response = dispatcher.handle_bytes(&buf).await;
    let body = serde_json::to_vec(&response)?;
    output.write_all(&body).await?;
    output.flush().await?;
    Ok(response)
}
