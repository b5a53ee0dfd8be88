//! Records, their key schema, and identifiers.
//!
//! A `Record` is an attribute map tagged with the model it belongs to and the
//! names of that model's key fields, so it can always answer "what is my own
//! identifier" without consulting the registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// Names of the partition key and optional sort key of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    /// Partition key field name.
    pub partition_key: String,
    /// Sort key field name, if the model has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl KeySchema {
    /// Key schema with only a partition key.
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    /// Add a sort key.
    #[must_use]
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }
}

impl Default for KeySchema {
    fn default() -> Self {
        Self::new("id")
    }
}

/// Opaque identifier of a record: the canonical text of its partition-key value.
///
/// Number keys are held as their decimal text, so `42` and `"42"` name the
/// same record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Read an identifier out of a scalar attribute value.
    ///
    /// Non-empty text and integers count; floats, sets and nulls do not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::BigInt(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Identifier> for Value {
    fn from(id: Identifier) -> Self {
        Value::Text(id.0)
    }
}

/// A stored item: model name, key schema and attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    model: String,
    key: KeySchema,
    attrs: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record of the given model.
    pub fn new(model: impl Into<String>, key: KeySchema) -> Self {
        Self {
            model: model.into(),
            key,
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Model this record belongs to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Key schema of the record's model.
    pub fn key_schema(&self) -> &KeySchema {
        &self.key
    }

    /// All attributes.
    pub fn attrs(&self) -> &BTreeMap<String, Value> {
        &self.attrs
    }

    /// Read an attribute. `Null` values read as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name).filter(|v| !v.is_null())
    }

    /// Write an attribute. Writing `Null` removes it.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        let name = name.into();
        if value.is_null() {
            self.attrs.remove(&name);
        } else {
            self.attrs.insert(name, value);
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attrs.remove(name)
    }

    /// Check whether an attribute is present.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The record's own identifier (its partition-key value), if set.
    pub fn identifier(&self) -> Option<Identifier> {
        self.get(&self.key.partition_key)
            .and_then(Identifier::from_value)
    }

    /// The record's identifier, or `Error::MissingKey`.
    pub fn require_identifier(&self) -> Result<Identifier> {
        self.identifier().ok_or_else(|| Error::MissingKey {
            model: self.model.clone(),
            field: self.key.partition_key.clone(),
        })
    }

    /// The record's sort-key value, if the model has a sort key and it is set.
    pub fn sort_key_value(&self) -> Option<&Value> {
        self.key.sort_key.as_deref().and_then(|sk| self.get(sk))
    }
}
