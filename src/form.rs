//! Bracketed form-field construction
//!
//! The editor's forms use a flat naming scheme where nested option groups
//! become `group[field]` keys, deeper nesting becomes `group[field][sub]`,
//! and list-valued fields repeat a key with a trailing `[]` suffix. This
//! module keeps payload construction separate from validation and transport:
//! a [`FormData`] is an ordered, duplicate-preserving list of pairs that the
//! transport serializes as-is.

use crate::models::OptionGroups;

/// Produce the wire-level key for a group/field pair
pub fn bracket_key(group: &str, field: &str) -> String {
    format!("{group}[{field}]")
}

/// Ordered builder for a form payload
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain field
    pub fn field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((name.into(), value.to_string()));
        self
    }

    /// Append a `group[field]` field
    pub fn bracketed(self, group: &str, field: &str, value: impl ToString) -> Self {
        self.field(bracket_key(group, field), value)
    }

    /// Append a `group[field][sub]` field
    pub fn bracketed2(self, group: &str, field: &str, sub: &str, value: impl ToString) -> Self {
        self.field(format!("{group}[{field}][{sub}]"), value)
    }

    /// Append one `group[field][]` pair per value, preserving order
    pub fn bracketed_list<I, V>(mut self, group: &str, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let key = format!("{group}[{field}][]");
        for value in values {
            self.pairs.push((key.clone(), value.to_string()));
        }
        self
    }

    /// Merge a whole nested option mapping, flattening every
    /// (group, field, value) triple to a `group[field]` pair.
    ///
    /// Field names are taken as-is; matching the editor's vocabulary is the
    /// caller's responsibility.
    pub fn groups(mut self, options: &OptionGroups) -> Self {
        for (group, fields) in options {
            for (field, value) in fields {
                self.pairs.push((bracket_key(group, field), value.clone()));
            }
        }
        self
    }

    /// The flat wire-level pairs, in insertion order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
