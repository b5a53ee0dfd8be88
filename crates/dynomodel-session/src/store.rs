//! The backing-store capability the association runtime depends on.
//!
//! Persistence, table naming and key encoding live behind this trait. The
//! association layer only ever fetches records by identifier and, for
//! bidirectional mutations, writes whole records back.

use std::future::Future;

use asupersync::{Cx, Outcome};
use dynomodel_core::{Error, Identifier, ModelSchema, Record};

/// By-identifier access to stored records.
///
/// Every call is cancel-correct: a cancelled call must not have partially
/// applied a write. Failures are reported as `Error::Lookup`.
pub trait Store: Send + Sync {
    /// Fetch one record of `model` by identifier. `None` if absent.
    fn get_by_id(
        &self,
        cx: &Cx,
        model: &ModelSchema,
        id: &Identifier,
    ) -> impl Future<Output = Outcome<Option<Record>, Error>> + Send;

    /// Fetch the records of `model` with the given identifiers.
    ///
    /// Missing identifiers are skipped. Result order is not guaranteed.
    fn get_many_by_id(
        &self,
        cx: &Cx,
        model: &ModelSchema,
        ids: &[Identifier],
    ) -> impl Future<Output = Outcome<Vec<Record>, Error>> + Send;

    /// Write a whole record, replacing any stored record with the same key.
    fn put(&self, cx: &Cx, record: &Record) -> impl Future<Output = Outcome<(), Error>> + Send;
}
