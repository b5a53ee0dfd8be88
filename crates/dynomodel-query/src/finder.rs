//! Index selection for equality queries.
//!
//! Selection rules, in order:
//!
//! 1. If the query constrains the model's partition key, the primary index is
//!    used. Other fields (sort key or not) do not affect this.
//! 2. Otherwise the first secondary index, in declaration order, whose fields
//!    all appear in the query is used. Extra query fields are left for the
//!    executor to post-filter.
//! 3. Otherwise there is no usable index and the finder returns `None`; the
//!    executor decides between a scan and an error.
//!
//! Secondary indexes with identical field sets are legal. The one declared
//! first always wins.

use std::collections::BTreeSet;

use dynomodel_core::{IndexDescriptor, IndexSet};

use crate::query::Query;

/// Picks the index that can answer an equality query.
#[derive(Debug, Clone)]
pub struct IndexFinder<'a> {
    indexes: &'a IndexSet,
    fields: BTreeSet<&'a str>,
}

impl<'a> IndexFinder<'a> {
    /// Prepare a finder for one model's indexes and one query.
    pub fn new(indexes: &'a IndexSet, query: &'a Query) -> Self {
        Self {
            indexes,
            fields: query.fields(),
        }
    }

    /// The primary index if the partition key is queried, else the first
    /// covered secondary index.
    pub fn find(&self) -> Option<&'a IndexDescriptor> {
        let found = self
            .find_primary_index()
            .or_else(|| self.find_secondary_index());

        match found {
            Some(index) => tracing::debug!(
                target: "dynomodel::index",
                fields = ?self.fields,
                index = ?index.name(),
                primary = index.is_primary(),
                "Selected index"
            ),
            None => tracing::debug!(
                target: "dynomodel::index",
                fields = ?self.fields,
                "No index covers query"
            ),
        }

        found
    }

    /// The primary index, if the query includes the partition key.
    pub fn find_primary_index(&self) -> Option<&'a IndexDescriptor> {
        self.fields
            .contains(self.indexes.partition_key())
            .then(|| self.indexes.primary())
    }

    /// The first secondary index whose fields the query fully covers.
    pub fn find_secondary_index(&self) -> Option<&'a IndexDescriptor> {
        self.indexes
            .secondary()
            .iter()
            .find(|index| index.is_covered_by(&self.fields))
    }

    /// Sorted, duplicate-free query fields.
    pub fn fields(&self) -> &BTreeSet<&'a str> {
        &self.fields
    }
}

/// Convenience wrapper around `IndexFinder::find`.
pub fn find_index<'a>(indexes: &'a IndexSet, query: &'a Query) -> Option<&'a IndexDescriptor> {
    IndexFinder::new(indexes, query).find()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynomodel_core::{IndexDescriptor, KeySchema, ModelSchema};

    fn post_indexes() -> IndexSet {
        IndexSet::new(&KeySchema::new("id"))
            .with_secondary(IndexDescriptor::secondary(["post_id", "timestamp"]).named("by-post"))
    }

    #[test]
    fn test_partition_key_selects_primary() {
        let indexes = post_indexes();
        let query = Query::new().eq("id", "x");
        let index = find_index(&indexes, &query).unwrap();
        assert!(index.is_primary());
        assert_eq!(index.fields(), ["id".to_string()]);
    }

    #[test]
    fn test_primary_ignores_extra_fields() {
        let comment = ModelSchema::new("Comment")
            .partition_key("post_id")
            .sort_key("timestamp");
        let query = Query::new().eq("post_id", "p1").eq("title", "hello");
        let index = find_index(comment.indexes(), &query).unwrap();
        assert!(index.is_primary());
        assert_eq!(index.sort_key(), Some("timestamp"));
    }

    #[test]
    fn test_covered_secondary_selected() {
        let indexes = post_indexes();
        let query = Query::new().eq("post_id", "p1").eq("timestamp", 5_i64);
        let index = find_index(&indexes, &query).unwrap();
        assert_eq!(index.name(), Some("by-post"));
    }

    #[test]
    fn test_partial_secondary_not_found() {
        let indexes = post_indexes();
        let query = Query::new().eq("post_id", "p1");
        assert!(find_index(&indexes, &query).is_none());
    }

    #[test]
    fn test_partial_match_uses_primary_when_partition_key() {
        let comment = ModelSchema::new("Comment")
            .partition_key("post_id")
            .index(IndexDescriptor::secondary(["post_id", "timestamp"]));
        let query = Query::new().eq("post_id", "p1");
        assert!(find_index(comment.indexes(), &query).unwrap().is_primary());
    }

    #[test]
    fn test_extra_fields_still_cover_secondary() {
        let indexes = post_indexes();
        let query = Query::new()
            .eq("timestamp", 5_i64)
            .eq("author", "a")
            .eq("post_id", "p1");
        assert_eq!(find_index(&indexes, &query).unwrap().name(), Some("by-post"));
    }

    #[test]
    fn test_identical_indexes_first_declared_wins() {
        let indexes = IndexSet::new(&KeySchema::default())
            .with_secondary(IndexDescriptor::secondary(["a", "b"]).named("first"))
            .with_secondary(IndexDescriptor::secondary(["b", "a"]).named("second"));
        let query = Query::new().eq("a", 1_i64).eq("b", 2_i64);
        for _ in 0..10 {
            assert_eq!(find_index(&indexes, &query).unwrap().name(), Some("first"));
        }
    }

    #[test]
    fn test_empty_query_finds_nothing() {
        let indexes = post_indexes();
        assert!(find_index(&indexes, &Query::new()).is_none());
    }
}
