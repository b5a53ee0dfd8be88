//! Core types for Dynomodel.
//!
//! `dynomodel-core` is the **foundation layer**. It defines the data model the
//! association runtime and the index finder operate on, with no I/O.
//!
//! # Role In The Architecture
//!
//! - **Data model**: `Record`, `Value` and `Identifier` are what the backing
//!   store hands back and what association reference fields hold.
//! - **Declarations**: `ModelSchema`, `IndexDescriptor` and
//!   `AssociationDeclaration` describe a model once, at definition time.
//! - **Resolution**: `ModelRegistry` resolves target models and derives the
//!   inverse reference field of an association in one hop.
//!
//! # Who Uses This Crate
//!
//! - `dynomodel-query` reads `IndexSet` to pick an index for an equality query.
//! - `dynomodel-session` builds runtime associations from declarations and
//!   the registry, and loads targets through a `Store`.

pub mod association;
pub mod error;
pub mod index;
pub mod inflect;
pub mod record;
pub mod registry;
pub mod schema;
pub mod value;

pub use association::{
    AssociationDeclaration, AssociationKind, IdentifierOrRecord, ReferenceFieldType,
};
pub use error::{ConfigurationError, Error, LookupError, Result};
pub use index::{IndexDescriptor, IndexKind, IndexSet};
pub use record::{Identifier, KeySchema, Record};
pub use registry::ModelRegistry;
pub use schema::ModelSchema;
pub use value::Value;
