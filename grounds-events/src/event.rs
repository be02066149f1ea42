//! Calendar events and their attribute encoding.

use chrono::{DateTime, Utc};
use grounds_attr::{Attr, AttrError, AttrResult};

const DESCRIPTION: &str = "description";
const START_TIMESTAMP: &str = "startTimestamp";
const LOCATION: &str = "location";
const OWNER: &str = "owner";

/// Prefix of event attributes on the extension.
pub const EVENT_PREFIX: char = '#';

/// Returns the attribute name for the event called `name`.
pub fn attr_name(name: &str) -> String {
    format!("{EVENT_PREFIX}{name}")
}

/// One scheduled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Name as players type it, without the prefix.
    pub name: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub location: String,
    /// Player who created the event. Older records may lack one.
    pub owner: Option<String>,
}

impl Event {
    pub fn to_attr(&self) -> AttrResult<Attr> {
        let mut fields = vec![
            Attr::string(DESCRIPTION, self.description.as_str()),
            Attr::timestamp(START_TIMESTAMP, &self.start),
            Attr::string(LOCATION, self.location.as_str()),
        ];
        if let Some(owner) = &self.owner {
            fields.push(Attr::string(OWNER, owner.as_str()));
        }
        Attr::list(attr_name(&self.name), &fields)
    }

    /// Decodes a stored event. Duplicate fields resolve to the last one
    /// stored; missing text fields read as empty.
    pub fn from_attr(attr: &Attr) -> AttrResult<Self> {
        let fields = attr.list_value_map()?;
        let text = |name: &str| fields.get(name).map(|a| a.value.clone()).unwrap_or_default();

        let start = fields
            .get(START_TIMESTAMP)
            .ok_or_else(|| AttrError::FieldNotFound(START_TIMESTAMP.to_string()))?
            .timestamp_value(&Utc)?;

        Ok(Self {
            name: attr
                .name
                .strip_prefix(EVENT_PREFIX)
                .unwrap_or(&attr.name)
                .to_string(),
            description: text(DESCRIPTION),
            start,
            location: text(LOCATION),
            owner: fields.get(OWNER).map(|a| a.value.clone()),
        })
    }
}
