//! Player commands: the `chat` method.

use crate::channel::{Channel, channel_not_found, get_channel, visible_channels};
use async_trait::async_trait;
use grounds_plugin::{HandlerResult, PluginCall, PluginContext, PluginError, Subcommand, done};
use tracing::{info, warn};

pub const CHAT_METHOD: &str = "chat";

/// Subcommands of `chat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    /// `say <channel> <message>`
    Say,
    /// `join <channel>`
    Join,
    /// `leave <channel>`
    Leave,
    /// `list`
    List,
    /// `mine`
    Mine,
    /// `members <channel>`
    Members,
}

#[async_trait]
impl Subcommand for ChatCommand {
    fn select(call: &PluginCall) -> Option<Self> {
        match call.subcommand()? {
            "say" => Some(Self::Say),
            "join" => Some(Self::Join),
            "leave" => Some(Self::Leave),
            "list" => Some(Self::List),
            "mine" => Some(Self::Mine),
            "members" => Some(Self::Members),
            _ => None,
        }
    }

    async fn run(self, ctx: &PluginContext) -> HandlerResult {
        match self {
            Self::Say => say(ctx).await,
            Self::Join => join(ctx).await,
            Self::Leave => leave(ctx).await,
            Self::List => list(ctx).await,
            Self::Mine => mine(ctx).await,
            Self::Members => members(ctx).await,
        }
    }
}

/// Loads the channel named by argument 1 and the caller, failing as if the
/// channel did not exist when the caller may not see it.
async fn visible_channel(ctx: &PluginContext) -> Result<(Channel, String), PluginError> {
    let name = &ctx.call.arguments[1];
    let channel = get_channel(ctx, name).await?;
    let caller = ctx.api.get_caller_name().await?;
    if !ctx.access().may_see(&channel.acl, &caller).await {
        return Err(channel_not_found(name));
    }
    Ok((channel, caller))
}

async fn say(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(3)?;
    let (channel, caller) = visible_channel(ctx).await?;
    if !channel.is_member(&caller) {
        return Err(PluginError::rejected(format!("You do not belong to {}", channel.name)));
    }

    let message = format!("[{}] {}: {}", channel.name, caller, ctx.call.arguments[2]);
    for member in &channel.members {
        if let Err(e) = ctx.api.send_message(member, &message).await {
            warn!(channel = %channel.name, member = %member, error = %e, "Failed to deliver chat message");
        }
    }
    done()
}

async fn join(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let (mut channel, caller) = visible_channel(ctx).await?;
    if !ctx.access().may_join(&channel.acl, &caller).await {
        return Err(PluginError::rejected(format!("You may not join {}", channel.name)));
    }
    if channel.is_member(&caller) {
        ctx.api
            .send_message_to_caller(&format!("You are already a member of {}", channel.name))
            .await?;
        return done();
    }

    channel
        .add_member(&ctx.api, ctx.extension_id(), &caller, true)
        .await?;
    info!(channel = %channel.name, player = %caller, "Player joined channel");
    done()
}

async fn leave(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let (mut channel, caller) = visible_channel(ctx).await?;
    if !channel.is_member(&caller) {
        ctx.api
            .send_message_to_caller(&format!("You are not a member of {}", channel.name))
            .await?;
        return done();
    }

    channel
        .remove_member(&ctx.api, ctx.extension_id(), &caller, true)
        .await?;
    info!(channel = %channel.name, player = %caller, "Player left channel");
    done()
}

fn sorted_names<'a>(channels: impl Iterator<Item = &'a Channel>) -> Vec<&'a str> {
    let mut names: Vec<&str> = channels.map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    names
}

async fn list(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(1)?;
    let caller = ctx.api.get_caller_name().await?;
    let channels = visible_channels(ctx, &caller).await?;
    if channels.is_empty() {
        ctx.api.send_message_to_caller("No channels found").await?;
        return done();
    }

    let names = sorted_names(channels.iter());
    ctx.api
        .send_message_with_header_to_caller(&names.join("\n"), "Channels:")
        .await?;
    done()
}

async fn mine(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(1)?;
    let caller = ctx.api.get_caller_name().await?;
    let channels = visible_channels(ctx, &caller).await?;
    let names = sorted_names(channels.iter().filter(|c| c.is_member(&caller)));
    if names.is_empty() {
        ctx.api.send_message_to_caller("No channels found").await?;
        return done();
    }

    ctx.api
        .send_message_with_header_to_caller(&names.join("\n"), "Your channels:")
        .await?;
    done()
}

async fn members(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let (channel, caller) = visible_channel(ctx).await?;
    if !channel.is_member(&caller) {
        ctx.api
            .send_message_to_caller(&format!("You are not a member of {}", channel.name))
            .await?;
        return done();
    }

    // The caller is a member, so the list is never empty here.
    ctx.api
        .send_message_with_header_to_caller(
            &channel.members.join("\n"),
            &format!("Members of {}", channel.name),
        )
        .await?;
    done()
}
