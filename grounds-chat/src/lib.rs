//! Chat channels for Grounds.
//!
//! Channels live as attributes on the plugin's extension. Players talk in
//! and manage their membership with `chat`, administrators shape channels
//! with `chatadmin`, and `chatguestautojoin` drops arriving guests into
//! the guest channel.
//!
//! A channel the caller may not see answers exactly like a missing one, so
//! restricted channels do not leak their existence.

mod admin;
mod autojoin;
pub mod channel;
mod chat;

pub use admin::{CHAT_ADMIN_METHOD, ChatAdminCommand};
pub use autojoin::{CHAT_GUEST_AUTOJOIN_METHOD, GUEST_CHANNEL, GuestAutojoin};
pub use channel::Channel;
pub use chat::{CHAT_METHOD, ChatCommand};

use grounds_plugin::{Dispatcher, PluginConfig};
use grounds_rpc::ApiTransport;
use std::sync::Arc;

/// Builds the dispatcher answering all chat methods.
pub fn dispatcher(transport: Arc<dyn ApiTransport>, config: PluginConfig) -> Dispatcher {
    Dispatcher::new(transport, config)
        .register::<ChatCommand>(CHAT_METHOD)
        .register::<ChatAdminCommand>(CHAT_ADMIN_METHOD)
        .register::<GuestAutojoin>(CHAT_GUEST_AUTOJOIN_METHOD)
}
