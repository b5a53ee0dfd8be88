//! Association declarations.
//!
//! Associations are declared once per model when the model schema is built
//! and are read-only afterwards. A declaration only describes the
//! relationship; the runtime object that loads targets lives in
//! `dynomodel-session`.
//!
//! The source record stores the target identifier(s) in its **reference
//! field**: `<name>_ids` (a string set) for to-many associations, and
//! `<name>_id` or the `foreign_key` override (a single string) for to-one
//! associations.

use std::borrow::Cow;
use std::fmt;

use crate::error::Result;
use crate::inflect;
use crate::record::{Identifier, Record};

/// Relationship shape. Selects the runtime association variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// Belongs-to: the source references at most one target.
    ToOne,
    /// Has-many / has-and-belongs-to-many: the source references a set of targets.
    ToMany,
}

impl AssociationKind {
    /// Semantic type of the reference field for this kind.
    pub const fn reference_field_type(self) -> ReferenceFieldType {
        match self {
            AssociationKind::ToOne => ReferenceFieldType::Scalar,
            AssociationKind::ToMany => ReferenceFieldType::Set,
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationKind::ToOne => write!(f, "to-one"),
            AssociationKind::ToMany => write!(f, "to-many"),
        }
    }
}

/// Semantic type of a reference field, for the schema layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFieldType {
    /// A single identifier (string).
    Scalar,
    /// A set of identifiers (string set).
    Set,
}

/// Immutable configuration of one named association on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationDeclaration {
    /// Association name, e.g. `"comments"`.
    pub name: &'static str,

    /// Relationship shape.
    pub kind: AssociationKind,

    /// Explicit target model name. Overrides inference from `name`.
    pub explicit_target_type: Option<&'static str>,

    /// Name of the association on the target model that points back here.
    pub inverse_name: Option<&'static str>,

    /// Reference-field override for to-one associations.
    pub foreign_key: Option<&'static str>,
}

impl AssociationDeclaration {
    /// Create a declaration with required fields.
    #[must_use]
    pub const fn new(name: &'static str, kind: AssociationKind) -> Self {
        Self {
            name,
            kind,
            explicit_target_type: None,
            inverse_name: None,
            foreign_key: None,
        }
    }

    /// A to-one (belongs-to) declaration.
    #[must_use]
    pub const fn to_one(name: &'static str) -> Self {
        Self::new(name, AssociationKind::ToOne)
    }

    /// A to-many (has-many) declaration.
    #[must_use]
    pub const fn to_many(name: &'static str) -> Self {
        Self::new(name, AssociationKind::ToMany)
    }

    /// Set the target model name explicitly.
    #[must_use]
    pub const fn target_type(mut self, model: &'static str) -> Self {
        self.explicit_target_type = Some(model);
        self
    }

    /// Set the inverse association name on the target model.
    #[must_use]
    pub const fn inverse_of(mut self, name: &'static str) -> Self {
        self.inverse_name = Some(name);
        self
    }

    /// Override the reference field (to-one only).
    #[must_use]
    pub const fn foreign_key(mut self, field: &'static str) -> Self {
        self.foreign_key = Some(field);
        self
    }

    /// Target model name inferred from the association name.
    pub fn inferred_target_type(&self) -> String {
        inflect::classify(self.name)
    }

    /// The target model name: the explicit one if given, else the inferred one.
    pub fn target_type_name(&self) -> Cow<'static, str> {
        match self.explicit_target_type {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.inferred_target_type()),
        }
    }

    /// Name of the reference field on the source record.
    pub fn declaration_field_name(&self) -> Cow<'static, str> {
        match (self.kind, self.foreign_key) {
            (AssociationKind::ToOne, Some(field)) => Cow::Borrowed(field),
            (AssociationKind::ToOne, None) => Cow::Owned(format!("{}_id", self.name)),
            (AssociationKind::ToMany, _) => Cow::Owned(format!("{}_ids", self.name)),
        }
    }

    /// Semantic type of the reference field.
    pub const fn declaration_field_type(&self) -> ReferenceFieldType {
        self.kind.reference_field_type()
    }
}

/// A value assigned into an association: a bare identifier or a full record.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierOrRecord {
    /// Identifier of a target record.
    Id(Identifier),
    /// A target record.
    Record(Box<Record>),
}

impl IdentifierOrRecord {
    /// The identifier: unchanged for `Id`, the partition-key value for `Record`.
    pub fn to_id(&self) -> Result<Identifier> {
        match self {
            IdentifierOrRecord::Id(id) => Ok(id.clone()),
            IdentifierOrRecord::Record(record) => record.require_identifier(),
        }
    }

    /// The record, if this already is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            IdentifierOrRecord::Id(_) => None,
            IdentifierOrRecord::Record(record) => Some(record),
        }
    }
}

impl From<Identifier> for IdentifierOrRecord {
    fn from(id: Identifier) -> Self {
        IdentifierOrRecord::Id(id)
    }
}

impl From<&str> for IdentifierOrRecord {
    fn from(id: &str) -> Self {
        IdentifierOrRecord::Id(Identifier::from(id))
    }
}

impl From<Record> for IdentifierOrRecord {
    fn from(record: Record) -> Self {
        IdentifierOrRecord::Record(Box::new(record))
    }
}

impl From<&Record> for IdentifierOrRecord {
    fn from(record: &Record) -> Self {
        IdentifierOrRecord::Record(Box::new(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::KeySchema;

    #[test]
    fn test_declaration_builder_chain() {
        let decl = AssociationDeclaration::to_many("comments")
            .target_type("Remark")
            .inverse_of("post");

        assert_eq!(decl.name, "comments");
        assert_eq!(decl.kind, AssociationKind::ToMany);
        assert_eq!(decl.explicit_target_type, Some("Remark"));
        assert_eq!(decl.inverse_name, Some("post"));
        assert_eq!(decl.foreign_key, None);
        assert_eq!(decl.target_type_name(), "Remark");
    }

    #[test]
    fn test_target_type_inferred_from_name() {
        assert_eq!(AssociationDeclaration::to_many("comments").target_type_name(), "Comment");
        assert_eq!(AssociationDeclaration::to_one("post").target_type_name(), "Post");
    }

    #[test]
    fn test_to_many_reference_field_is_ids_set() {
        let decl = AssociationDeclaration::to_many("comments");
        assert_eq!(decl.declaration_field_name(), "comments_ids");
        assert_eq!(decl.declaration_field_type(), ReferenceFieldType::Set);
    }

    #[test]
    fn test_to_one_foreign_key_override_is_scalar() {
        let decl = AssociationDeclaration::to_one("author").foreign_key("written_by");
        assert_eq!(decl.declaration_field_name(), "written_by");
        assert_eq!(decl.declaration_field_type(), ReferenceFieldType::Scalar);

        let plain = AssociationDeclaration::to_one("post");
        assert_eq!(plain.declaration_field_name(), "post_id");
    }

    #[test]
    fn test_coerce_record_to_partition_key() {
        let rec = Record::new("Post", KeySchema::default()).with("id", "p1");
        assert_eq!(
            IdentifierOrRecord::from(rec).to_id().unwrap(),
            Identifier::from("p1")
        );
        assert_eq!(
            IdentifierOrRecord::from("p2").to_id().unwrap(),
            Identifier::from("p2")
        );
    }

    #[test]
    fn test_coerce_record_with_numeric_key() {
        let rec = Record::new("Post", KeySchema::default()).with("id", 42_i64);
        assert_eq!(
            IdentifierOrRecord::from(rec).to_id().unwrap(),
            Identifier::from("42")
        );
    }
}
