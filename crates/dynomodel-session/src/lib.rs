//! Lazy association loading for Dynomodel.
//!
//! An association is bound to one source record and one declaration. Its
//! target is resolved through a `Store` on first access, memoized, and kept
//! until reset or until the association itself is mutated.
//!
//! # Design Philosophy
//!
//! - **Explicit I/O**: every store call takes a `Cx` and returns an `Outcome`
//! - **Exclusive source**: an association borrows its source mutably, so no
//!   other code can change the reference field under a cached target
//! - **Write ordering**: on mutation the source is written first, then each
//!   target's inverse attribute; a failed target write is reported, never
//!   rolled back
//!
//! # Example
//!
//! ```ignore
//! let registry = ModelRegistry::new()
//!     .with(ModelSchema::new("Post").association(
//!         AssociationDeclaration::to_many("comments").inverse_of("post"),
//!     ))?
//!     .with(ModelSchema::new("Comment").association(
//!         AssociationDeclaration::to_one("post").foreign_key("post_id"),
//!     ))?;
//!
//! let mut comments = Association::<ToMany>::new(&registry, &mut post, "comments")?;
//! let loaded = comments.target(&cx, &store).await;
//! ```

/// Unwrap an `Outcome`, returning early from the enclosing `async fn` on
/// anything but `Ok`.
macro_rules! try_outcome {
    ($expr:expr) => {
        match $expr {
            ::asupersync::Outcome::Ok(value) => value,
            ::asupersync::Outcome::Err(e) => return ::asupersync::Outcome::Err(e),
            ::asupersync::Outcome::Cancelled(r) => return ::asupersync::Outcome::Cancelled(r),
            ::asupersync::Outcome::Panicked(p) => return ::asupersync::Outcome::Panicked(p),
        }
    };
}

/// Unwrap a `Result`, returning `Outcome::Err` on failure.
macro_rules! try_result {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => return ::asupersync::Outcome::Err(e.into()),
        }
    };
}

pub mod association;
pub mod config;
pub mod state;
pub mod store;

pub use association::{AnyAssociation, Association, Cardinality, TargetRef, ToMany, ToOne};
pub use config::{AssociationConfig, InverseSync};
pub use state::LoadState;
pub use store::Store;
