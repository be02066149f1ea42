//! Handlers of the `event` method.

use crate::event::{EVENT_PREFIX, Event, attr_name};
use crate::time::{caller_zone, display, parse_start};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use grounds_plugin::{HandlerResult, PluginCall, PluginContext, PluginError, Subcommand, done};
use grounds_rpc::message::{Column, Record, Table};
use tracing::info;

pub const EVENT_METHOD: &str = "event";

/// Subcommands of `event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCommand {
    /// `create <name> <description> <start> <location>`
    Create,
    /// `list`
    List,
    /// `get <name>`
    Get,
    /// `delete <name>`
    Delete,
}

#[async_trait]
impl Subcommand for EventCommand {
    fn select(call: &PluginCall) -> Option<Self> {
        match call.subcommand()? {
            "create" => Some(Self::Create),
            "list" => Some(Self::List),
            "get" => Some(Self::Get),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    async fn run(self, ctx: &PluginContext) -> HandlerResult {
        match self {
            Self::Create => create(ctx).await,
            Self::List => list(ctx).await,
            Self::Get => get(ctx).await,
            Self::Delete => delete(ctx).await,
        }
    }
}

fn does_not_exist(attr_name: &str) -> PluginError {
    PluginError::rejected(format!("Event '{attr_name}' does not exist"))
}

async fn zone(ctx: &PluginContext) -> Result<Tz, PluginError> {
    Ok(caller_zone(&ctx.api.get_caller_timezone().await?))
}

/// Loads the event stored under `attr_name`, reporting absence as
/// "does not exist".
async fn load(ctx: &PluginContext, attr_name: &str) -> Result<Event, PluginError> {
    match ctx.api.get_attr(ctx.extension_id(), attr_name, true).await {
        Ok(attr) => Ok(Event::from_attr(&attr)?),
        Err(e) if e.is_not_found() => Err(does_not_exist(attr_name)),
        Err(e) => Err(e.into()),
    }
}

async fn create(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(5)?;
    let args = &ctx.call.arguments;
    let name = &args[1];
    let stored_name = attr_name(name);

    if ctx.api.has_attr(ctx.extension_id(), &stored_name, true).await? {
        return Err(PluginError::rejected(format!("Event '{stored_name}' already exists")));
    }

    let owner = ctx.api.get_caller_name().await?;
    let tz = zone(ctx).await?;
    let start = parse_start(&args[3], &tz)
        .ok_or_else(|| PluginError::InvalidArguments(format!("Unrecognized start time {}", args[3])))?;

    let event = Event {
        name: name.clone(),
        description: args[2].clone(),
        start: start.with_timezone(&Utc),
        location: args[4].clone(),
        owner: Some(owner),
    };
    ctx.api
        .set_attr(ctx.extension_id(), &event.to_attr()?, true)
        .await?;
    info!(event = %name, start = %event.start, "Created event");

    ctx.api
        .send_message_to_caller(&format!("Created event '{name}'"))
        .await?;
    done()
}

async fn list(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(1)?;
    let tz = zone(ctx).await?;

    let names: Vec<String> = ctx
        .api
        .get_attr_names(ctx.extension_id(), true)
        .await?
        .into_iter()
        .filter(|n| n.starts_with(EVENT_PREFIX))
        .collect();
    if names.is_empty() {
        ctx.api.send_message_to_caller("No events found").await?;
        return done();
    }

    let mut events = Vec::with_capacity(names.len());
    for name in &names {
        let attr = ctx.api.get_attr(ctx.extension_id(), name, true).await?;
        events.push(Event::from_attr(&attr)?);
    }
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.name.cmp(&b.name)));

    let mut table = Table::new(vec![Column::new("NAME", "%-40.40s"), Column::new("TIME", "%s")]);
    for event in &events {
        table.push_row(vec![event.name.clone(), display(&event.start.with_timezone(&tz))]);
    }
    ctx.api.send_table_to_caller(&table, "Events:").await?;
    done()
}

async fn get(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let name = &ctx.call.arguments[1];
    let event = load(ctx, &attr_name(name)).await?;
    let tz = zone(ctx).await?;

    let record = Record::new()
        .field("Name", name.as_str())
        .field("Time", display(&event.start.with_timezone(&tz)))
        .field("Location", event.location.as_str())
        .field("Organizer", event.owner.clone().unwrap_or_default())
        .field("", "")
        .field("", event.description.as_str());
    ctx.api.send_record_to_caller(&record, "Event details:").await?;
    done()
}

async fn delete(ctx: &PluginContext) -> HandlerResult {
    ctx.call.check_argument_count(2)?;
    let name = &ctx.call.arguments[1];
    let stored_name = attr_name(name);
    let event = load(ctx, &stored_name).await?;

    let caller = ctx.api.get_caller_name().await?;
    let owner = event
        .owner
        .ok_or_else(|| PluginError::rejected("Event is missing an owner"))?;
    if owner != caller {
        return Err(PluginError::rejected("You are not the owner"));
    }

    ctx.api
        .remove_attr(ctx.extension_id(), &stored_name, true)
        .await?;
    info!(event = %name, owner = %owner, "Deleted event");
    ctx.api
        .send_message_to_caller(&format!("Deleted event '{name}'"))
        .await?;
    done()
}
