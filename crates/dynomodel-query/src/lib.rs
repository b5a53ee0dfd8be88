//! Equality queries and index selection for Dynomodel.
//!
//! A `Query` is a conjunction of `field = value` conditions. Before a query
//! executor issues a get or query call, it asks the `IndexFinder` which index
//! (primary or secondary) can answer the query. No I/O happens here.
//!
//! # Example
//!
//! ```
//! use dynomodel_core::{IndexDescriptor, ModelSchema};
//! use dynomodel_query::{IndexFinder, Query};
//!
//! let comment = ModelSchema::new("Comment")
//!     .index(IndexDescriptor::secondary(["post_id", "timestamp"]).named("by-post"));
//!
//! let query = Query::new().eq("post_id", "p1").eq("timestamp", 5_i64);
//! let index = IndexFinder::new(comment.indexes(), &query).find();
//! assert_eq!(index.and_then(|i| i.name()), Some("by-post"));
//! ```

pub mod finder;
pub mod query;

pub use finder::{IndexFinder, find_index};
pub use query::{Condition, Query};
