//! Schema types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default pattern for timestamp columns (JIRA's own `created`/`updated` shape)
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%L%z";

/// Default timezone for timestamp strings without an offset
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Target type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Long,
    Double,
    String,
    Timestamp,
    Json,
}

impl ColumnType {
    /// Merge two observed types, returning the more general type
    pub fn merge_with(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Long, ColumnType::Double) | (ColumnType::Double, ColumnType::Long) => {
                ColumnType::Double
            }
            // Incompatible types - fall back to string
            _ => ColumnType::String,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Long => write!(f, "long"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Json => write!(f, "json"),
        }
    }
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Position within the schema
    #[serde(skip)]
    pub index: usize,
    /// Issue field name (dotted paths allowed)
    pub name: String,
    /// Target type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Parse pattern for timestamp columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Timezone for timestamp strings that carry no offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Column {
    /// Create a column of the given type
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            index: 0,
            name: name.into(),
            column_type,
            format: None,
            timezone: None,
        }
    }

    /// Create a timestamp column with an explicit pattern
    pub fn timestamp(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::new(name, ColumnType::Timestamp)
        }
    }

    /// Set the timezone
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Ordered, immutable set of uniquely named columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema, assigning column indexes and rejecting duplicate names
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate column name '{}'",
                    column.name
                )));
            }
        }

        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(index, mut column)| {
                column.index = index;
                column
            })
            .collect();

        Ok(Self { columns })
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at the given position
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Look up a column by name
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
