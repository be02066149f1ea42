//! Chat channels and their storage on the extension.

use grounds_access::{AccessControl, AccessList, Action};
use grounds_attr::multi::{is_valid_name, join_names, split_names};
use grounds_attr::{Attr, AttrError, AttrResult};
use grounds_plugin::{PluginContext, PluginError};
use grounds_rpc::{ApiClient, RpcResult};
use tracing::{debug, warn};

const MEMBERS: &str = "members";
const VIS_ROLES: &str = "visRoles";
const JOIN_ROLES: &str = "joinRoles";
const VIS_PLAYERS: &str = "visPlayers";
const JOIN_PLAYERS: &str = "joinPlayers";

/// Prefix marking an extension attribute as a channel.
pub const CHANNEL_PREFIX: char = '#';

/// A chat channel.
///
/// Stored as an `ATTRLIST` attribute on the extension, named after the
/// channel, holding five comma-joined `STRING` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub members: Vec<String>,
    pub acl: AccessControl,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decodes a stored channel. Absent fields read as empty lists.
    pub fn from_attr(attr: &Attr) -> AttrResult<Self> {
        let field = |name: &str| -> AttrResult<Vec<String>> {
            match attr.find(name) {
                Ok(field) => Ok(split_names(&field.value)),
                Err(AttrError::FieldNotFound(_)) => Ok(Vec::new()),
                Err(e) => Err(e),
            }
        };

        Ok(Self {
            name: attr.name.clone(),
            members: field(MEMBERS)?,
            acl: AccessControl::new(
                AccessList::new(field(VIS_ROLES)?, field(VIS_PLAYERS)?),
                AccessList::new(field(JOIN_ROLES)?, field(JOIN_PLAYERS)?),
            ),
        })
    }

    pub fn to_attr(&self) -> AttrResult<Attr> {
        Attr::list(
            self.name.clone(),
            &[
                self.members_attr(),
                Attr::string(VIS_ROLES, join_names(&self.acl.see.roles)),
                Attr::string(JOIN_ROLES, join_names(&self.acl.join.roles)),
                Attr::string(VIS_PLAYERS, join_names(&self.acl.see.players)),
                Attr::string(JOIN_PLAYERS, join_names(&self.acl.join.players)),
            ],
        )
    }

    fn members_attr(&self) -> Attr {
        Attr::string(MEMBERS, join_names(&self.members))
    }

    pub fn is_member(&self, player: &str) -> bool {
        self.members.iter().any(|m| m == player)
    }

    /// Applies `roles=a,b` or `players=a,b` to the list for `action`. An
    /// empty value clears the list; an empty name inside a list is rejected.
    pub fn apply_access_arg(&mut self, action: Action, arg: &str) -> Result<(), PluginError> {
        let list = self.acl.list_mut(action);
        if let Some(roles) = arg.strip_prefix("roles=") {
            list.roles = parse_names(arg, roles)?;
        } else if let Some(players) = arg.strip_prefix("players=") {
            list.players = parse_names(arg, players)?;
        } else {
            return Err(PluginError::InvalidArguments(format!("Unsupported argument {arg}")));
        }
        Ok(())
    }

    /// Adds `player` and writes the member field back to the store.
    pub async fn add_member(
        &mut self,
        api: &ApiClient,
        extension_id: &str,
        player: &str,
        as_extension: bool,
    ) -> RpcResult<()> {
        self.members.push(player.to_string());
        self.store_members(api, extension_id, as_extension).await
    }

    /// Removes the first occurrence of `player` and writes the member
    /// field back to the store.
    pub async fn remove_member(
        &mut self,
        api: &ApiClient,
        extension_id: &str,
        player: &str,
        as_extension: bool,
    ) -> RpcResult<()> {
        if let Some(pos) = self.members.iter().position(|m| m == player) {
            self.members.remove(pos);
        }
        self.store_members(api, extension_id, as_extension).await
    }

    async fn store_members(&self, api: &ApiClient, extension_id: &str, as_extension: bool) -> RpcResult<()> {
        debug!(channel = %self.name, members = self.members.len(), "Storing channel members");
        api.set_attr_in_attr_list_value(extension_id, &self.name, self.members_attr(), as_extension)
            .await
    }
}

fn parse_names(arg: &str, value: &str) -> Result<Vec<String>, PluginError> {
    let names = split_names(value);
    if names.iter().any(|n| n.is_empty()) {
        return Err(PluginError::InvalidArguments(format!("Empty name in argument {arg}")));
    }
    Ok(names)
}

/// Rejects player names that cannot be stored in a member list.
pub fn check_player_name(name: &str) -> Result<(), PluginError> {
    if !is_valid_name(name) {
        return Err(PluginError::InvalidArguments(format!("'{name}' is not a valid player name")));
    }
    Ok(())
}

pub fn channel_not_found(name: &str) -> PluginError {
    PluginError::rejected(format!("Channel {name} not found"))
}

fn check_channel_name(name: &str) -> Result<(), PluginError> {
    if !name.starts_with(CHANNEL_PREFIX) {
        return Err(PluginError::InvalidArguments("That is not a valid channel name".to_string()));
    }
    Ok(())
}

/// Loads a channel, or `None` if the store has no such attribute.
pub async fn find_channel(ctx: &PluginContext, name: &str) -> Result<Option<Channel>, PluginError> {
    check_channel_name(name)?;
    match ctx.api.get_attr(ctx.extension_id(), name, true).await {
        Ok(attr) => Ok(Some(Channel::from_attr(&attr)?)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Loads a channel, failing with "not found" if it does not exist.
pub async fn get_channel(ctx: &PluginContext, name: &str) -> Result<Channel, PluginError> {
    find_channel(ctx, name).await?.ok_or_else(|| channel_not_found(name))
}

pub async fn has_channel(ctx: &PluginContext, name: &str) -> Result<bool, PluginError> {
    Ok(find_channel(ctx, name).await?.is_some())
}

/// Names of all channels on the extension, in store order.
pub async fn channel_names(ctx: &PluginContext) -> Result<Vec<String>, PluginError> {
    let names = ctx.api.get_attr_names(ctx.extension_id(), true).await?;
    Ok(names
        .into_iter()
        .filter(|n| n.starts_with(CHANNEL_PREFIX))
        .collect())
}

/// Channels `player` may see. Channels that fail to load are skipped.
pub async fn visible_channels(ctx: &PluginContext, player: &str) -> Result<Vec<Channel>, PluginError> {
    let access = ctx.access();
    let mut visible = Vec::new();
    for name in channel_names(ctx).await? {
        let channel = match get_channel(ctx, &name).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(channel = %name, error = %e, "Skipping unreadable channel");
                continue;
            }
        };
        if access.may_see(&channel.acl, player).await {
            visible.push(channel);
        }
    }
    Ok(visible)
}
