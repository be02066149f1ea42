//! Administrative commands: the `chatadmin` method.
//!
//! Writes here run with the caller's authority (`as_extension = false`),
//! so the engine only accepts them from players allowed to modify the
//! extension.

use crate::channel::{Channel, check_player_name, get_channel, has_channel};
use async_trait::async_trait;
use grounds_access::Action;
use grounds_attr::multi::join_names;
use grounds_plugin::{HandlerResult, PluginCall, PluginContext, PluginError, Subcommand, done};
use grounds_rpc::message::Record;
use tracing::info;

pub const CHAT_ADMIN_METHOD: &str = "chatadmin";

/// Subcommands of `chatadmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAdminCommand {
    Create,
    Delete,
    Inspect,
    SetVisibility,
    SetJoinability,
    AddMember,
    RemoveMember,
}

#[async_trait]
impl Subcommand for ChatAdminCommand {
    fn select(call: &PluginCall) -> Option<Self> {
        match call.subcommand()? {
            "create" => Some(Self::Create),
            "delete" => Some(Self::Delete),
            "inspect" => Some(Self::Inspect),
            "set_visibility" => Some(Self::SetVisibility),
            "set_joinability" => Some(Self::SetJoinability),
            "add_member" => Some(Self::AddMember),
            "remove_member" => Some(Self::RemoveMember),
            _ => None,
        }
    }

    async fn run(self, ctx: &PluginContext) -> HandlerResult {
        match self {
            Self::Create => create(ctx).await,
            Self::Delete => delete(ctx).await,
            Self::Inspect => inspect(ctx).await,
            Self::SetVisibility => set_access(ctx, Action::See).await,
            Self::SetJoinability => set_access(ctx, Action::Join).await,
            Self::AddMember => add_member(ctx).await,
            Self::RemoveMember => remove_member(ctx).await,
        }
    }
}

async fn create(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let name = &ctx.call.arguments[1];
    if has_channel(ctx, name).await? {
        return Err(PluginError::rejected(format!("Channel {name} already exists")));
    }

    let attr = Channel::new(name.as_str()).to_attr()?;
    ctx.api.set_attr(ctx.extension_id(), &attr, false).await?;
    info!(channel = %name, "Created channel");
    ctx.api
        .send_message_to_caller(&format!("Created channel {name}"))
        .await?;
    done()
}

async fn delete(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let name = &ctx.call.arguments[1];
    if !has_channel(ctx, name).await? {
        return Err(PluginError::rejected(format!("Channel {name} does not exist")));
    }

    ctx.api.remove_attr(ctx.extension_id(), name, false).await?;
    info!(channel = %name, "Deleted channel");
    ctx.api
        .send_message_to_caller(&format!("Deleted channel {name}"))
        .await?;
    done()
}

async fn inspect(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let channel = get_channel(ctx, &ctx.call.arguments[1]).await?;

    let record = Record::new()
        .field("Name", channel.name.as_str())
        .field("Members", join_names(&channel.members))
        .field("Visible to roles", join_names(&channel.acl.see.roles))
        .field("Joinable by roles", join_names(&channel.acl.join.roles))
        .field("Visible to players", join_names(&channel.acl.see.players))
        .field("Joinable by players", join_names(&channel.acl.join.players));
    ctx.api
        .send_record_to_caller(&record, "Channel details:")
        .await?;
    done()
}

/// `set_visibility` / `set_joinability <channel> roles=..|players=..`
///
/// Every argument is validated before anything is written.
async fn set_access(ctx: &PluginContext, action: Action) -> HandlerResult {
    ctx.call.check_argument_count_at_least(3)?;
    let mut channel = get_channel(ctx, &ctx.call.arguments[1]).await?;
    for arg in &ctx.call.arguments[2..] {
        channel.apply_access_arg(action, arg)?;
    }

    ctx.api
        .set_attr(ctx.extension_id(), &channel.to_attr()?, false)
        .await?;
    info!(channel = %channel.name, %action, "Updated channel access");
    ctx.api
        .send_message_to_caller(&format!("Updated channel {}", channel.name))
        .await?;
    done()
}

/// `add_member <player> <channel>`
async fn add_member(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(3)?;
    let player = &ctx.call.arguments[1];
    check_player_name(player)?;
    let mut channel = get_channel(ctx, &ctx.call.arguments[2]).await?;
    if channel.is_member(player) {
        ctx.api
            .send_message_to_caller(&format!("{player} is already a member of {}", channel.name))
            .await?;
        return done();
    }

    channel
        .add_member(&ctx.api, ctx.extension_id(), player, false)
        .await?;
    done()
}

/// `remove_member <player> <channel>`
async fn remove_member(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(3)?;
    let player = &ctx.call.arguments[1];
    check_player_name(player)?;
    let mut channel = get_channel(ctx, &ctx.call.arguments[2]).await?;
    if !channel.is_member(player) {
        ctx.api
            .send_message_to_caller(&format!("{player} is not a member of {}", channel.name))
            .await?;
        return done();
    }

    channel
        .remove_member(&ctx.api, ctx.extension_id(), player, false)
        .await?;
    done()
}
