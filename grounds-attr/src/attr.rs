//! The attribute wire type and its codec.

use crate::{AttrError, AttrResult};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Type tag carried by every attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttrType {
    String,
    Integer,
    Boolean,
    /// Decimal Unix epoch seconds.
    Timestamp,
    /// Identifier of another thing in the world.
    Thing,
    /// One serialized attribute.
    Attr,
    /// A JSON array of serialized attributes.
    AttrList,
}

impl AttrType {
    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
            Self::Thing => "THING",
            Self::Attr => "ATTR",
            Self::AttrList => "ATTRLIST",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttrType {
    type Err = AttrError;

    fn from_str(s: &str) -> AttrResult<Self> {
        match s {
            "STRING" => Ok(Self::String),
            "INTEGER" => Ok(Self::Integer),
            "BOOLEAN" => Ok(Self::Boolean),
            "TIMESTAMP" => Ok(Self::Timestamp),
            "THING" => Ok(Self::Thing),
            "ATTR" => Ok(Self::Attr),
            "ATTRLIST" => Ok(Self::AttrList),
            other => Err(AttrError::UnknownType(other.to_string())),
        }
    }
}

/// A typed, named value.
///
/// Serializes as `{"name": ..., "value": ..., "type": ...}` in that field
/// order, which is the byte layout the attribute store persists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
}

impl Attr {
    /// Creates an attribute from raw parts.
    pub fn new(name: impl Into<String>, value: impl Into<String>, attr_type: AttrType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attr_type,
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, AttrType::String)
    }

    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, value.to_string(), AttrType::Integer)
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, value.to_string(), AttrType::Boolean)
    }

    /// Creates a timestamp attribute. Sub-second precision and the zone of
    /// `value` are dropped; only the epoch second is stored.
    pub fn timestamp<Tz: TimeZone>(name: impl Into<String>, value: &DateTime<Tz>) -> Self {
        Self::new(name, value.timestamp().to_string(), AttrType::Timestamp)
    }

    pub fn thing(name: impl Into<String>, thing_id: impl Into<String>) -> Self {
        Self::new(name, thing_id, AttrType::Thing)
    }

    /// Creates an `ATTR` attribute wrapping another attribute.
    pub fn nested(name: impl Into<String>, inner: &Attr) -> AttrResult<Self> {
        let name = name.into();
        let value = serde_json::to_string(inner).map_err(|source| AttrError::Encoding {
            name: name.clone(),
            source,
        })?;
        Ok(Self::new(name, value, AttrType::Attr))
    }

    /// Creates an `ATTRLIST` attribute from an ordered sequence of fields.
    pub fn list(name: impl Into<String>, fields: &[Attr]) -> AttrResult<Self> {
        let name = name.into();
        let value = serde_json::to_string(fields).map_err(|source| AttrError::Encoding {
            name: name.clone(),
            source,
        })?;
        Ok(Self::new(name, value, AttrType::AttrList))
    }

    /// Creates an `ATTRLIST` attribute from a name-indexed map. Fields are
    /// written sorted by name so the encoding is stable.
    pub fn list_from_map(name: impl Into<String>, fields: &HashMap<String, Attr>) -> AttrResult<Self> {
        let mut sorted: Vec<&Attr> = fields.values().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        let owned: Vec<Attr> = sorted.into_iter().cloned().collect();
        Self::list(name, &owned)
    }

    fn expect_type(&self, expected: AttrType) -> AttrResult<()> {
        if self.attr_type != expected {
            return Err(AttrError::TypeMismatch {
                name: self.name.clone(),
                expected,
                actual: self.attr_type,
            });
        }
        Ok(())
    }

    fn invalid_value(&self) -> AttrError {
        AttrError::InvalidValue {
            name: self.name.clone(),
            attr_type: self.attr_type,
            value: self.value.clone(),
        }
    }

    /// Decodes the fields of an `ATTRLIST` attribute, in stored order.
    pub fn list_value(&self) -> AttrResult<Vec<Attr>> {
        self.expect_type(AttrType::AttrList)?;
        serde_json::from_str(&self.value).map_err(|source| AttrError::Decoding {
            name: self.name.clone(),
            source,
        })
    }

    /// Returns the first field named `field`.
    ///
    /// Duplicate names resolve to the earliest entry, unlike
    /// [`Attr::list_value_map`]. Both behaviours exist in stored data.
    pub fn find(&self, field: &str) -> AttrResult<Attr> {
        self.list_value()?
            .into_iter()
            .find(|a| a.name == field)
            .ok_or_else(|| AttrError::FieldNotFound(field.to_string()))
    }

    /// Decodes the fields of an `ATTRLIST` attribute indexed by name. Later
    /// duplicates overwrite earlier ones.
    pub fn list_value_map(&self) -> AttrResult<HashMap<String, Attr>> {
        let fields = self.list_value()?;
        let mut map = HashMap::with_capacity(fields.len());
        for field in fields {
            map.insert(field.name.clone(), field);
        }
        Ok(map)
    }

    /// Returns a copy of this list with `field` upserted by name.
    ///
    /// Duplicates collapse last-write-wins, matching
    /// [`Attr::list_value_map`]; surviving fields keep the position of their
    /// first appearance and a new field is appended.
    pub fn with_field(&self, field: Attr) -> AttrResult<Attr> {
        let mut merged: Vec<Attr> = Vec::new();
        for existing in self.list_value()? {
            match merged.iter_mut().find(|a| a.name == existing.name) {
                Some(slot) => *slot = existing,
                None => merged.push(existing),
            }
        }
        match merged.iter_mut().find(|a| a.name == field.name) {
            Some(slot) => *slot = field,
            None => merged.push(field),
        }
        Attr::list(self.name.clone(), &merged)
    }

    pub fn int_value(&self) -> AttrResult<i64> {
        self.expect_type(AttrType::Integer)?;
        self.value.parse().map_err(|_| self.invalid_value())
    }

    pub fn bool_value(&self) -> AttrResult<bool> {
        self.expect_type(AttrType::Boolean)?;
        if self.value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if self.value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.invalid_value())
        }
    }

    pub fn thing_value(&self) -> AttrResult<&str> {
        self.expect_type(AttrType::Thing)?;
        Ok(&self.value)
    }

    /// Decodes the attribute wrapped by an `ATTR` attribute.
    pub fn attr_value(&self) -> AttrResult<Attr> {
        self.expect_type(AttrType::Attr)?;
        serde_json::from_str(&self.value).map_err(|source| AttrError::Decoding {
            name: self.name.clone(),
            source,
        })
    }

    /// Returns the stored epoch second.
    pub fn epoch_seconds(&self) -> AttrResult<i64> {
        self.expect_type(AttrType::Timestamp)?;
        self.value.parse().map_err(|_| self.invalid_value())
    }

    /// Decodes a timestamp in the caller's zone. The zone is not stored, so
    /// one value renders differently for callers in different zones.
    pub fn timestamp_value<Tz: TimeZone>(&self, tz: &Tz) -> AttrResult<DateTime<Tz>> {
        let secs = self.epoch_seconds()?;
        tz.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| self.invalid_value())
    }
}

/// Renders the attribute spec form `name[TYPE]=value`.
impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]={}", self.name, self.attr_type, self.value)
    }
}

/// Parses `name[TYPE]=value`, or `name=value` for a `STRING` attribute.
impl FromStr for Attr {
    type Err = AttrError;

    fn from_str(spec: &str) -> AttrResult<Self> {
        let typed = spec.split_once('[').and_then(|(name, rest)| {
            let (type_name, value) = rest.split_once(']')?;
            let value = value.strip_prefix('=')?;
            (!name.is_empty() && !type_name.is_empty()).then_some((name, type_name, value))
        });
        if let Some((name, type_name, value)) = typed {
            return Ok(Attr::new(name, value, type_name.parse()?));
        }

        match spec.split_once('=') {
            Some((name, value)) if !name.is_empty() && !name.contains('[') => {
                Ok(Attr::string(name, value))
            }
            _ => Err(AttrError::InvalidSpec(spec.to_string())),
        }
    }
}
