//! Grounds chat plugin.
//!
//! Started by the engine once per call: reads one JSON-RPC request from
//! stdin, writes one response to stdout and exits.
//!
//! Usage:
//!   grounds-chat [--config plugin.toml] [--socket /tmp/groundsapi.sock]

use anyhow::{Context, Result};
use clap::Parser;
use grounds_plugin::logging::init_tracing;
use grounds_plugin::{PluginConfig, run_once};
use grounds_rpc::UnixSocketTransport;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "grounds-chat")]
#[command(about = "A Grounds plugin for a chat system")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Attribute store socket, overriding the config file
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = PluginConfig::load(args.config.as_deref()).with_socket_override(args.socket);
    debug!(socket = ?config.socket_path, "Using attribute store");
    let transport = Arc::new(UnixSocketTransport::new(&config.socket_path));
    let dispatcher = grounds_chat::dispatcher(transport, config);

    run_once(&dispatcher, tokio::io::stdin(), tokio::io::stdout())
        .await
        .context("failed to answer plugin call")?;
    Ok(())
}
