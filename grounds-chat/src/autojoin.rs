//! Guest auto-join: the `chatguestautojoin` method.
//!
//! The engine calls this when a thing is yoinked into the world. Guest
//! players are put in the guest channel.

use crate::channel::get_channel;
use async_trait::async_trait;
use grounds_plugin::{HandlerResult, PluginCall, PluginContext, PluginError, Subcommand, done};
use serde_json::Value;
use tracing::{debug, info};

pub const CHAT_GUEST_AUTOJOIN_METHOD: &str = "chatguestautojoin";

/// Channel every guest player joins.
pub const GUEST_CHANNEL: &str = "#guest";

const GUEST_PREFIX: &str = "guest";
const PLAYER_TYPE: &str = "Player";

/// The single handler of `chatguestautojoin`. Argument 0 is the event
/// payload rather than a subcommand name.
#[derive(Debug, Clone, Copy)]
pub struct GuestAutojoin;

#[async_trait]
impl Subcommand for GuestAutojoin {
    fn select(_call: &PluginCall) -> Option<Self> {
        Some(Self)
    }

    async fn run(self, ctx: &PluginContext) -> HandlerResult {
        ctx.call.check_argument_count(1)?;
        let payload = ctx.call.event_payload()?;

        let name = payload
            .get("yoinkedThingName")
            .and_then(Value::as_str)
            .ok_or_else(|| PluginError::InvalidArguments("Event payload has no yoinkedThingName".to_string()))?;
        let thing_type = payload.get("yoinkedThingType").and_then(Value::as_str);
        if !name.starts_with(GUEST_PREFIX) || thing_type != Some(PLAYER_TYPE) {
            debug!(thing = name, ?thing_type, "Not a guest player, ignoring");
            return done();
        }

        let mut channel = get_channel(ctx, GUEST_CHANNEL).await?;
        if !channel.is_member(name) {
            channel
                .add_member(&ctx.api, ctx.extension_id(), name, true)
                .await?;
            info!(player = name, channel = GUEST_CHANNEL, "Guest joined channel");
        }
        done()
    }
}
