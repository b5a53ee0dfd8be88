//! Model schemas: key fields, indexes and association declarations of one model.

use std::borrow::Cow;

use crate::association::{AssociationDeclaration, ReferenceFieldType};
use crate::index::{IndexDescriptor, IndexSet};
use crate::record::{KeySchema, Record};

/// Everything the association and index layers need to know about a model.
///
/// # Example
///
/// ```
/// use dynomodel_core::{AssociationDeclaration, IndexDescriptor, ModelSchema};
///
/// let comment = ModelSchema::new("Comment")
///     .partition_key("post_id")
///     .sort_key("timestamp")
///     .index(IndexDescriptor::secondary(["author_id"]).named("by-author"))
///     .association(AssociationDeclaration::to_one("post").foreign_key("post_id"));
///
/// assert_eq!(comment.indexes().partition_key(), "post_id");
/// assert_eq!(comment.reference_fields().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    name: &'static str,
    key: KeySchema,
    indexes: IndexSet,
    associations: Vec<AssociationDeclaration>,
}

impl ModelSchema {
    /// A model partitioned on `id` with no sort key, indexes or associations.
    pub fn new(name: &'static str) -> Self {
        let key = KeySchema::default();
        Self {
            name,
            indexes: IndexSet::new(&key),
            key,
            associations: Vec::new(),
        }
    }

    /// Set the partition key field.
    #[must_use]
    pub fn partition_key(mut self, field: impl Into<String>) -> Self {
        self.key.partition_key = field.into();
        self.indexes.set_primary(&self.key);
        self
    }

    /// Set the sort key field.
    #[must_use]
    pub fn sort_key(mut self, field: impl Into<String>) -> Self {
        self.key.sort_key = Some(field.into());
        self.indexes.set_primary(&self.key);
        self
    }

    /// Declare a secondary index. Declaration order is kept and breaks ties.
    #[must_use]
    pub fn index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push_secondary(index);
        self
    }

    /// Declare an association.
    #[must_use]
    pub fn association(mut self, declaration: AssociationDeclaration) -> Self {
        self.associations.push(declaration);
        self
    }

    /// Model name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key schema.
    pub fn key(&self) -> &KeySchema {
        &self.key
    }

    /// Primary and secondary indexes.
    pub fn indexes(&self) -> &IndexSet {
        &self.indexes
    }

    /// Association declarations in declaration order.
    pub fn associations(&self) -> &[AssociationDeclaration] {
        &self.associations
    }

    /// Look up an association declaration by name.
    pub fn association_named(&self, name: &str) -> Option<&AssociationDeclaration> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Reference fields this model's associations add, with their types.
    ///
    /// The attribute layer registers these as real attributes.
    pub fn reference_fields(
        &self,
    ) -> impl Iterator<Item = (Cow<'static, str>, ReferenceFieldType)> + '_ {
        self.associations
            .iter()
            .map(|a| (a.declaration_field_name(), a.declaration_field_type()))
    }

    /// A new, empty record of this model.
    pub fn new_record(&self) -> Record {
        Record::new(self.name, self.key.clone())
    }
}
