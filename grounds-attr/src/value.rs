use crate::{Attr, AttrResult, AttrType};

/// Typed view of an attribute payload.
///
/// Each variant corresponds to one [`AttrType`]; lists hold decoded
/// attributes, which may themselves be lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    /// Epoch seconds.
    Timestamp(i64),
    Thing(String),
    Attr(Box<Attr>),
    AttrList(Vec<Attr>),
}

impl AttrValue {
    /// Decodes the payload of `attr` according to its type tag.
    pub fn decode(attr: &Attr) -> AttrResult<Self> {
        Ok(match attr.attr_type {
            AttrType::String => Self::String(attr.value.clone()),
            AttrType::Integer => Self::Integer(attr.int_value()?),
            AttrType::Boolean => Self::Boolean(attr.bool_value()?),
            AttrType::Timestamp => Self::Timestamp(attr.epoch_seconds()?),
            AttrType::Thing => Self::Thing(attr.value.clone()),
            AttrType::Attr => Self::Attr(Box::new(attr.attr_value()?)),
            AttrType::AttrList => Self::AttrList(attr.list_value()?),
        })
    }

    pub fn attr_type(&self) -> AttrType {
        match self {
            Self::String(_) => AttrType::String,
            Self::Integer(_) => AttrType::Integer,
            Self::Boolean(_) => AttrType::Boolean,
            Self::Timestamp(_) => AttrType::Timestamp,
            Self::Thing(_) => AttrType::Thing,
            Self::Attr(_) => AttrType::Attr,
            Self::AttrList(_) => AttrType::AttrList,
        }
    }

    /// Encodes this value as an attribute named `name`.
    pub fn into_attr(self, name: impl Into<String>) -> AttrResult<Attr> {
        let name = name.into();
        Ok(match self {
            Self::String(s) => Attr::string(name, s),
            Self::Integer(i) => Attr::integer(name, i),
            Self::Boolean(b) => Attr::boolean(name, b),
            Self::Timestamp(secs) => Attr::new(name, secs.to_string(), AttrType::Timestamp),
            Self::Thing(id) => Attr::thing(name, id),
            Self::Attr(inner) => Attr::nested(name, &inner)?,
            Self::AttrList(fields) => Attr::list(name, &fields)?,
        })
    }
}
