//! Attribute values stored on records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Serialized untagged so that query conditions read as
/// `{"field": "post_id", "value": "p1"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent / NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer number.
    BigInt(i64),
    /// Floating-point number.
    Double(f64),
    /// String.
    Text(String),
    /// Set of strings (the to-many reference field representation).
    StringSet(BTreeSet<String>),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// True if this is `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow as a string slice, if this is `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as an integer, if this is `BigInt`.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as a string set, if this is `StringSet`.
    pub fn as_string_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Value::StringSet(set) => Some(set),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::BigInt(_) => "bigint",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::StringSet(_) => "string_set",
            Value::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::BigInt(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<BTreeSet<String>> for Value {
    fn from(v: BTreeSet<String>) -> Self {
        Value::StringSet(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json_shape() {
        let set: BTreeSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        assert_eq!(
            serde_json::to_value(Value::StringSet(set)).unwrap(),
            serde_json::json!(["a", "b"])
        );
        assert_eq!(
            serde_json::to_value(Value::from("p1")).unwrap(),
            serde_json::json!("p1")
        );
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_deserialize_prefers_integer() {
        let v: Value = serde_json::from_value(serde_json::json!(5)).unwrap();
        assert_eq!(v, Value::BigInt(5));
    }

    #[test]
    fn test_option_into_value() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("x")).as_str(), Some("x"));
    }
}
