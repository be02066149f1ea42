//! Tracing setup for plugin binaries.

use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Targets raised to debug by `--verbose`.
const PLUGIN_TARGETS: &[&str] = &[
    "grounds_attr",
    "grounds_rpc",
    "grounds_access",
    "grounds_plugin",
    "grounds_chat",
    "grounds_events",
];

/// Installs a compact subscriber writing to stderr; stdout carries the
/// response envelope. `RUST_LOG` is honoured, and `verbose` forces debug
/// output for the plugin crates only.
///
/// Calling this twice leaves the first subscriber in place.
pub fn init_tracing(verbose: bool) {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(plugin_filter(base, verbose))
        .with_target(false)
        .compact()
        .try_init();
}

fn plugin_filter(base: EnvFilter, verbose: bool) -> EnvFilter {
    if !verbose {
        return base;
    }
    PLUGIN_TARGETS
        .iter()
        .filter_map(|target| format!("{target}=debug").parse::<Directive>().ok())
        .fold(base, |filter, directive| filter.add_directive(directive))
}
