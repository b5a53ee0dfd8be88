//! Index descriptors.
//!
//! Every model has exactly one primary index (partition key, optionally
//! followed by the sort key) and zero or more secondary indexes, each an
//! arbitrary ordered field list. Descriptors are immutable once the model is
//! registered.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::KeySchema;

/// Whether an index is the model's primary index or a declared secondary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexKind {
    /// Partition key (+ sort key).
    Primary,
    /// Declared secondary index.
    #[default]
    Secondary,
}

/// A named, ordered set of fields that can answer lookups without a scan.
///
/// Serializes as `{"fields": [...]}`, with `name` only when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    #[serde(skip)]
    kind: IndexKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    fields: Vec<String>,
}

impl IndexDescriptor {
    /// The primary index for a key schema.
    pub fn primary(key: &KeySchema) -> Self {
        let mut fields = vec![key.partition_key.clone()];
        fields.extend(key.sort_key.clone());
        Self {
            kind: IndexKind::Primary,
            name: None,
            fields,
        }
    }

    /// A secondary index over the given fields, in order.
    pub fn secondary<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: IndexKind::Secondary,
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a name (e.g. the store-side index name).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Primary or secondary.
    pub const fn kind(&self) -> IndexKind {
        self.kind
    }

    /// True for the primary index.
    pub fn is_primary(&self) -> bool {
        self.kind == IndexKind::Primary
    }

    /// Index name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// First field: the partition key of this index.
    pub fn partition_key(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Second field: the sort key of this index, if any.
    pub fn sort_key(&self) -> Option<&str> {
        self.fields.get(1).map(String::as_str)
    }

    /// True if every field of this index appears in `fields`.
    ///
    /// Extra fields in `fields` are allowed: this is a covering match, not a
    /// prefix match.
    pub fn is_covered_by(&self, fields: &BTreeSet<&str>) -> bool {
        !self.fields.is_empty() && self.fields.iter().all(|f| fields.contains(f.as_str()))
    }

    pub(crate) fn into_secondary(mut self) -> Self {
        self.kind = IndexKind::Secondary;
        self
    }
}

/// The primary index plus the secondary indexes of one model, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSet {
    primary: IndexDescriptor,
    secondary: Vec<IndexDescriptor>,
}

impl IndexSet {
    /// Index set with only the primary index derived from `key`.
    pub fn new(key: &KeySchema) -> Self {
        Self {
            primary: IndexDescriptor::primary(key),
            secondary: Vec::new(),
        }
    }

    /// Append a secondary index. Declaration order is preserved.
    #[must_use]
    pub fn with_secondary(mut self, index: IndexDescriptor) -> Self {
        self.push_secondary(index);
        self
    }

    /// The primary index.
    pub fn primary(&self) -> &IndexDescriptor {
        &self.primary
    }

    /// Secondary indexes in declaration order.
    pub fn secondary(&self) -> &[IndexDescriptor] {
        &self.secondary
    }

    /// Partition-key field name of the primary index.
    pub fn partition_key(&self) -> &str {
        self.primary.partition_key().unwrap_or_default()
    }

    pub(crate) fn set_primary(&mut self, key: &KeySchema) {
        self.primary = IndexDescriptor::primary(key);
    }

    pub(crate) fn push_secondary(&mut self, index: IndexDescriptor) {
        self.secondary.push(index.into_secondary());
    }
}
