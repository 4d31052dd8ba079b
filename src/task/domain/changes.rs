//! Field-level diffs captured for the audit trail.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Old and new value of a single changed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the change.
    pub old: Value,
    /// Value after the change.
    pub new: Value,
}

/// Ordered set of changed fields.
///
/// Fields are kept in the order they were recorded so `updated_fields` in
/// the history payload follows the edit order. Recording a field whose old
/// and new values are equal is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChanges {
    entries: Vec<(String, FieldChange)>,
}

impl FieldChanges {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a change unless `old` equals `new`.
    ///
    /// A field recorded twice keeps its first `old` value and the latest
    /// `new` value, and is dropped if that brings it back to its start.
    pub fn record(&mut self, field: &str, old: Value, new: Value) {
        if let Some(position) = self.entries.iter().position(|(name, _)| name == field) {
            let reverted = self.entries.get_mut(position).is_some_and(|(_, existing)| {
                existing.new = new;
                existing.old == existing.new
            });
            if reverted {
                self.entries.remove(position);
            }
            return;
        }
        if old == new {
            return;
        }
        self.entries
            .push((field.to_owned(), FieldChange { old, new }));
    }

    /// Returns whether no field changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of changed fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the change recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, change)| change)
    }

    /// Returns whether the given field changed.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns changed field names in recording order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Returns the changes keyed by field name.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, FieldChange> {
        self.entries.iter().cloned().collect()
    }
}
