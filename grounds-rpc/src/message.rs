//! Structured payloads for messages sent back to players.

use serde::{Deserialize, Serialize};

/// Key/value listing rendered by the engine as aligned pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub keys: Vec<String>,
    pub values: Vec<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one key/value pair.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self.values.push(value.into());
        self
    }
}

/// Column of a [`Table`]: header text and a printf-style cell format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column(pub String, pub String);

impl Column {
    pub fn new(header: impl Into<String>, format: impl Into<String>) -> Self {
        Self(header.into(), format.into())
    }
}

/// Rows of cells under fixed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}
