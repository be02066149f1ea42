//! Call handling for Grounds plugins.
//!
//! A plugin is a process started once per call. It reads a single JSON-RPC
//! request from stdin, answers it on stdout and exits. The request method
//! names a handler family, and the reserved parameters carry the call id,
//! the extension id and the caller's argument strings; argument 0 selects
//! the handler within the family.
//!
//! ```no_run
//! # use grounds_plugin::{Dispatcher, PluginConfig, PluginContext, PluginCall, Subcommand, HandlerResult, run_once};
//! # use grounds_rpc::UnixSocketTransport;
//! # use std::sync::Arc;
//! struct Ping;
//!
//! #[async_trait::async_trait]
//! impl Subcommand for Ping {
//!     fn select(call: &PluginCall) -> Option<Self> {
//!         (call.subcommand() == Some("ping")).then_some(Ping)
//!     }
//!
//!     async fn run(self, ctx: &PluginContext) -> HandlerResult {
//!         ctx.api.send_message_to_caller("pong").await?;
//!         Ok(serde_json::Value::String(String::new()))
//!     }
//! }
//!
//! # async fn demo() -> std::io::Result<()> {
//! let config = PluginConfig::default();
//! let transport = Arc::new(UnixSocketTransport::new(&config.socket_path));
//! let dispatcher = Dispatcher::new(transport, config).register::<Ping>("ping");
//! run_once(&dispatcher, tokio::io::stdin(), tokio::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

mod call;
mod config;
mod dispatcher;
mod error;
pub mod logging;
mod runner;

pub use call::{CallDecodeError, PluginCall};
pub use config::PluginConfig;
pub use dispatcher::{Dispatcher, PluginContext, Subcommand};
pub use error::{HandlerResult, PluginError, done};
pub use runner::run_once;
