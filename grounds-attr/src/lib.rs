//! Attribute encoding for Grounds plugins.
//!
//! The attribute store has no native record type. Every piece of persisted
//! state is an [`Attr`]: a name, a string-encoded value and a type tag. A
//! composite entity (a chat channel, a calendar event) is one `ATTRLIST`
//! attribute whose value is the JSON array of its field attributes, each of
//! which may itself be a list.
//!
//! This crate provides:
//! - [`Attr`] and [`AttrType`], wire-compatible with the store's
//!   `{name, value, type}` JSON shape
//! - [`AttrValue`], a closed typed view over an attribute's payload
//! - two accessors over list payloads that deliberately disagree on
//!   duplicate names: [`Attr::find`] (first match) and
//!   [`Attr::list_value_map`] (last write wins)
//! - [`multi`] helpers for comma-joined multi-valued fields

mod attr;
pub mod multi;
mod value;

pub use attr::{Attr, AttrType};
pub use value::AttrValue;

/// Result type alias using the crate's error type.
pub type AttrResult<T> = std::result::Result<T, AttrError>;

/// Errors raised while encoding or decoding attributes.
#[derive(Debug, thiserror::Error)]
pub enum AttrError {
    #[error("failed to encode attribute {name}: {source}")]
    Encoding {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode attribute {name}: {source}")]
    Decoding {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Attr {name} is of type {actual}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: AttrType,
        actual: AttrType,
    },

    #[error("Attribute {0} not found")]
    FieldNotFound(String),

    #[error("invalid {attr_type} value for attribute {name}: {value:?}")]
    InvalidValue {
        name: String,
        attr_type: AttrType,
        value: String,
    },

    #[error("invalid attribute spec {0:?}")]
    InvalidSpec(String),

    #[error("unknown attribute type {0:?}")]
    UnknownType(String),
}
