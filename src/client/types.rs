//! Issue and page types

use crate::pagination::Cursor;
use crate::types::{JsonObject, JsonValue};

/// One ticket, with its nested `fields` object merged into the top level
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    values: JsonObject,
}

impl Issue {
    /// Build an issue from one entry of a search response's `issues` array
    ///
    /// Returns `None` when the entry is not a JSON object.
    pub fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(raw) => Some(Self {
                values: flatten(&raw),
            }),
            _ => None,
        }
    }

    /// Value of a field, by top-level key or by dotted path through nested objects
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        if let Some(value) = self.values.get(name) {
            return Some(value);
        }
        if !name.contains('.') {
            return None;
        }

        let mut parts = name.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// All merged fields in response order
    pub fn values(&self) -> &JsonObject {
        &self.values
    }
}

/// Merge a nested `fields` object into a new top-level mapping
///
/// Keys from `fields` win on collision. An object without a `fields`
/// object is copied unchanged, so flattening twice is a no-op.
pub fn flatten(raw: &JsonObject) -> JsonObject {
    let Some(JsonValue::Object(fields)) = raw.get("fields") else {
        return raw.clone();
    };

    let mut merged: JsonObject = raw
        .iter()
        .filter(|(key, _)| key.as_str() != "fields")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }

    merged
}

/// One batch of issues plus continuation state
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Issues in server order
    pub issues: Vec<Issue>,
    /// Cursor for the following page, `None` once paging is finished
    pub next: Option<Cursor>,
    /// Total matching issues, reported in offset mode only
    pub total: Option<u64>,
}

impl Page {
    /// Check if this page ends pagination
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Number of issues in the page
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Check if the page has no issues
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
