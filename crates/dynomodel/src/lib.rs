//! Dynomodel: lazy associations and index selection for wide-column stores.
//!
//! This crate re-exports the workspace crates behind one import:
//!
//! - `dynomodel-core`: records, values, model schemas and the model registry
//! - `dynomodel-query`: equality queries and the index finder
//! - `dynomodel-session`: runtime associations over a `Store`
//!
//! # Example
//!
//! ```ignore
//! use dynomodel::prelude::*;
//!
//! let registry = ModelRegistry::new()
//!     .with(
//!         ModelSchema::new("Comment")
//!             .index(IndexDescriptor::secondary(["post_id", "timestamp"]).named("by-post"))
//!             .association(AssociationDeclaration::to_one("post").foreign_key("post_id")),
//!     )?;
//!
//! let query = Query::new().eq("post_id", "p1").eq("timestamp", 5_i64);
//! let index = dynomodel::find_index_for(&registry, "Comment", &query)?;
//! assert_eq!(index.and_then(IndexDescriptor::name), Some("by-post"));
//! ```

pub use asupersync::{Cx, Outcome};
pub use dynomodel_core::{
    AssociationDeclaration, AssociationKind, ConfigurationError, Error, Identifier,
    IdentifierOrRecord, IndexDescriptor, IndexKind, IndexSet, KeySchema, LookupError,
    ModelRegistry, ModelSchema, Record, ReferenceFieldType, Result, Value,
};
pub use dynomodel_query::{Condition, IndexFinder, Query, find_index};
pub use dynomodel_session::{
    AnyAssociation, Association, AssociationConfig, Cardinality, InverseSync, LoadState, Store,
    TargetRef, ToMany, ToOne,
};

/// Pick the index of a registered model that can answer `query`.
///
/// Fails only if `model` is not registered. `Ok(None)` means no index covers
/// the query.
pub fn find_index_for<'a>(
    registry: &'a ModelRegistry,
    model: &str,
    query: &'a Query,
) -> Result<Option<&'a IndexDescriptor>> {
    Ok(find_index(registry.model(model)?.indexes(), query))
}

/// Everything needed to declare models, query them and load associations.
pub mod prelude {
    pub use crate::{
        AnyAssociation, Association, AssociationConfig, AssociationDeclaration, AssociationKind,
        Condition, ConfigurationError, Cx, Error, Identifier, IdentifierOrRecord,
        IndexDescriptor, IndexFinder, InverseSync, KeySchema, ModelRegistry, ModelSchema,
        Outcome, Query, Record, Result, Store, TargetRef, ToMany, ToOne, Value, find_index,
        find_index_for,
    };
}
