//! Equality-conjunction queries.

use std::collections::BTreeSet;

use dynomodel_core::Value;
use serde::{Deserialize, Serialize};

/// A single `field = value` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Attribute name.
    pub field: String,
    /// Value the attribute must equal.
    pub value: Value,
}

impl Condition {
    /// Create a condition.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A conjunction of equality conditions.
///
/// Serializes as `{"conditions": [{"field": ..., "value": ...}, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Conditions in the order they were added.
    pub conditions: Vec<Condition>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field = value` condition.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::new(field, value));
        self
    }

    /// Add a condition.
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// True if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Sorted, duplicate-free field names across all conditions.
    pub fn fields(&self) -> BTreeSet<&str> {
        self.conditions.iter().map(|c| c.field.as_str()).collect()
    }

    /// The value of the first condition on `field`.
    pub fn value_of(&self, field: &str) -> Option<&Value> {
        self.conditions
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.value)
    }
}

impl<F: Into<String>, V: Into<Value>> FromIterator<(F, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        Self {
            conditions: iter
                .into_iter()
                .map(|(field, value)| Condition::new(field, value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_sorted_and_deduplicated() {
        let query = Query::new()
            .eq("timestamp", 5_i64)
            .eq("post_id", "p1")
            .eq("post_id", "p2");
        let fields: Vec<_> = query.fields().into_iter().collect();
        assert_eq!(fields, vec!["post_id", "timestamp"]);
        assert_eq!(query.value_of("post_id"), Some(&Value::from("p1")));
    }

    #[test]
    fn test_wire_shape() {
        let query: Query = [("post_id", "p1")].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"conditions": [{"field": "post_id", "value": "p1"}]})
        );

        let parsed: Query = serde_json::from_value(serde_json::json!({
            "conditions": [{"field": "a", "value": 1}, {"field": "b", "value": "x"}]
        }))
        .unwrap();
        assert_eq!(parsed, Query::new().eq("a", 1_i64).eq("b", "x"));
    }
}
