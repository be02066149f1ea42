//! Event calendar for Grounds.
//!
//! Events live as attributes on the plugin's extension, one `ATTRLIST` per
//! event named `#<event name>`. Start times are stored as epoch seconds
//! and shown to each player in their own time zone.

mod command;
pub mod event;
pub mod time;

pub use command::{EVENT_METHOD, EventCommand};
pub use event::Event;

use grounds_plugin::{Dispatcher, PluginConfig};
use grounds_rpc::ApiTransport;
use std::sync::Arc;

/// Builds the dispatcher answering the `event` method.
pub fn dispatcher(transport: Arc<dyn ApiTransport>, config: PluginConfig) -> Dispatcher {
    Dispatcher::new(transport, config).register::<EventCommand>(EVENT_METHOD)
}
