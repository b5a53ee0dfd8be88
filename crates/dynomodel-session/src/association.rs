//! Runtime associations.
//!
//! An `Association` is bound to one source record and one declaration. Its
//! target is resolved lazily through a `Store` on first access and memoized
//! until `reset()`.
//!
//! The relationship shape is a type parameter: `Association<ToOne>` resolves
//! to `Option<Record>`, `Association<ToMany>` to `Vec<Record>`. When the
//! shape is only known at runtime, `AnyAssociation` selects the variant from
//! the declaration's kind tag.
//!
//! # Example
//!
//! ```ignore
//! let mut comments = Association::<ToMany>::new(&registry, &mut post, "comments")?;
//! let loaded = comments.target(&cx, &store).await;   // one store call
//! let again = comments.target(&cx, &store).await;    // cached
//!
//! comments.add(&cx, &store, "c3").await;              // writes post, then comment c3
//! ```

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use asupersync::{Cx, Outcome};
use dynomodel_core::{
    AssociationDeclaration, AssociationKind, ConfigurationError, Error, Identifier,
    IdentifierOrRecord, LookupError, ModelRegistry, ModelSchema, Record, ReferenceFieldType,
    Result, Value,
};

use crate::config::{AssociationConfig, InverseSync};
use crate::state::LoadState;
use crate::store::Store;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ToOne {}
    impl Sealed for super::ToMany {}
}

/// Relationship shape of an `Association`: `ToOne` or `ToMany`.
pub trait Cardinality: sealed::Sealed {
    /// Kind tag a declaration must carry to build this variant.
    const KIND: AssociationKind;

    /// What a resolved target looks like.
    type Target: fmt::Debug;

    /// Resolve the identifiers read off the source into target records.
    fn resolve<S: Store>(
        cx: &Cx,
        store: &S,
        target: &ModelSchema,
        ids: BTreeSet<Identifier>,
    ) -> impl Future<Output = Outcome<Self::Target, Error>>;
}

/// Belongs-to: a scalar reference resolving to at most one record.
#[derive(Debug)]
pub enum ToOne {}

/// Has-many: a reference set resolving to a sequence of records.
#[derive(Debug)]
pub enum ToMany {}

impl Cardinality for ToOne {
    const KIND: AssociationKind = AssociationKind::ToOne;

    type Target = Option<Record>;

    async fn resolve<S: Store>(
        cx: &Cx,
        store: &S,
        target: &ModelSchema,
        ids: BTreeSet<Identifier>,
    ) -> Outcome<Option<Record>, Error> {
        match ids.into_iter().next() {
            Some(id) => store.get_by_id(cx, target, &id).await,
            None => Outcome::Ok(None),
        }
    }
}

impl Cardinality for ToMany {
    const KIND: AssociationKind = AssociationKind::ToMany;

    type Target = Vec<Record>;

    async fn resolve<S: Store>(
        cx: &Cx,
        store: &S,
        target: &ModelSchema,
        ids: BTreeSet<Identifier>,
    ) -> Outcome<Vec<Record>, Error> {
        if ids.is_empty() {
            return Outcome::Ok(Vec::new());
        }
        let ids: Vec<Identifier> = ids.into_iter().collect();
        store.get_many_by_id(cx, target, &ids).await
    }
}

/// Identifiers held in a reference field value.
///
/// Accepts both shapes: a scalar (to-one, or a foreign-key override) and a
/// set. Absent and empty values yield an empty set.
fn identifiers_in(value: Option<&Value>) -> BTreeSet<Identifier> {
    match value {
        Some(Value::StringSet(set)) => set
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| Identifier::new(s.as_str()))
            .collect(),
        Some(Value::List(items)) => items.iter().filter_map(Identifier::from_value).collect(),
        Some(other) => Identifier::from_value(other).into_iter().collect(),
        None => BTreeSet::new(),
    }
}

/// Reference set value for a set of identifiers. Empty sets are stored as absent.
fn id_set_value(ids: &BTreeSet<Identifier>) -> Value {
    if ids.is_empty() {
        Value::Null
    } else {
        Value::StringSet(ids.iter().map(|id| id.as_str().to_string()).collect())
    }
}

/// Add or remove `id` on a target's inverse reference field.
///
/// Returns whether the record changed.
fn apply_link(
    record: &mut Record,
    inverse: &AssociationDeclaration,
    id: &Identifier,
    link: bool,
) -> bool {
    let field = inverse.declaration_field_name();
    match inverse.kind {
        AssociationKind::ToMany => {
            let mut ids = identifiers_in(record.get(&field));
            let changed = if link {
                ids.insert(id.clone())
            } else {
                ids.remove(id)
            };
            if changed {
                record.set(field, id_set_value(&ids));
            }
            changed
        }
        AssociationKind::ToOne => {
            let current = record.get(&field).and_then(Identifier::from_value);
            let holds_id = current.as_ref() == Some(id);
            if link && !holds_id {
                record.set(field, id.clone());
                true
            } else if !link && holds_id {
                record.remove(&field);
                true
            } else {
                false
            }
        }
    }
}

/// One inverse-side update: link or unlink the source on one target.
#[derive(Debug)]
struct InverseChange {
    id: Identifier,
    /// The target as handed in by the caller, used instead of a store lookup.
    record: Option<Record>,
    link: bool,
}

impl InverseChange {
    fn link(value: IdentifierOrRecord, id: Identifier) -> Self {
        let record = match value {
            IdentifierOrRecord::Record(record) => Some(*record),
            IdentifierOrRecord::Id(_) => None,
        };
        Self {
            id,
            record,
            link: true,
        }
    }

    fn unlink(id: Identifier) -> Self {
        Self {
            id,
            record: None,
            link: false,
        }
    }
}

/// What a mutation needs to update the inverse side.
#[derive(Debug, Clone, Copy)]
struct InversePlan<'a> {
    inverse: &'a AssociationDeclaration,
    target: &'a ModelSchema,
}

/// An association bound to one source record.
///
/// The source is borrowed exclusively for the association's lifetime, so the
/// cached target can never go stale behind the association's back.
pub struct Association<'a, K: Cardinality> {
    registry: &'a ModelRegistry,
    source: &'a mut Record,
    declaration: AssociationDeclaration,
    config: AssociationConfig,
    state: LoadState<K::Target>,
    _kind: PhantomData<fn() -> K>,
}

impl<'a, K: Cardinality> Association<'a, K> {
    /// Bind the association named `name` on the source's model.
    pub fn new(registry: &'a ModelRegistry, source: &'a mut Record, name: &str) -> Result<Self> {
        let declaration = *registry.association(source.model(), name)?;
        Self::from_declaration(registry, source, declaration)
    }

    /// Bind an explicit declaration. Its kind must match `K`.
    pub fn from_declaration(
        registry: &'a ModelRegistry,
        source: &'a mut Record,
        declaration: AssociationDeclaration,
    ) -> Result<Self> {
        if declaration.kind != K::KIND {
            return Err(ConfigurationError::KindMismatch {
                model: source.model().to_string(),
                name: declaration.name.to_string(),
                expected: K::KIND,
                found: declaration.kind,
            }
            .into());
        }
        Ok(Self {
            registry,
            source,
            declaration,
            config: AssociationConfig::default(),
            state: LoadState::unloaded(),
            _kind: PhantomData,
        })
    }

    /// Replace the mutation configuration.
    #[must_use]
    pub fn with_config(mut self, config: AssociationConfig) -> Self {
        self.config = config;
        self
    }

    /// The declaration this association was built from.
    pub fn declaration(&self) -> &AssociationDeclaration {
        &self.declaration
    }

    /// The source record.
    pub fn source(&self) -> &Record {
        &*self.source
    }

    /// Mutation configuration.
    pub fn config(&self) -> &AssociationConfig {
        &self.config
    }

    /// True once a resolution pass has completed since the last reset.
    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    /// The cached target without triggering a load.
    pub fn loaded_target(&self) -> Option<&K::Target> {
        self.state.get()
    }

    /// Drop the cached target. The next `target()` call hits the store again.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Name of the reference field on the source record.
    pub fn declaration_field_name(&self) -> Cow<'static, str> {
        self.declaration.declaration_field_name()
    }

    /// Semantic type of the reference field.
    pub fn declaration_field_type(&self) -> ReferenceFieldType {
        self.declaration.declaration_field_type()
    }

    /// The target model. Fails if the target type name is not registered.
    pub fn target_model(&self) -> Result<&'a ModelSchema> {
        self.registry.target_model(&self.declaration)
    }

    /// Attribute on each target that should hold the source's identifier.
    ///
    /// Derived from the inverse declaration on the target model; `None` when
    /// this association names no inverse.
    pub fn target_attribute(&self) -> Result<Option<Cow<'static, str>>> {
        self.registry
            .inverse_field(self.source.model(), &self.declaration)
    }

    /// Identifiers currently held in the source's reference field.
    pub fn source_ids(&self) -> BTreeSet<Identifier> {
        identifiers_in(self.source.get(&self.declaration_field_name()))
    }

    /// Identifiers held in a target record's inverse attribute.
    pub fn target_ids(&self, target: &Record) -> Result<BTreeSet<Identifier>> {
        Ok(self
            .target_attribute()?
            .map(|field| identifiers_in(target.get(&field)))
            .unwrap_or_default())
    }

    /// The identifier of `value`: unchanged for an id, the partition-key value for a record.
    pub fn coerce_to_id(&self, value: &IdentifierOrRecord) -> Result<Identifier> {
        value.to_id()
    }

    /// The record for `value`: unchanged for a record, a target-model lookup for an id.
    pub async fn coerce_to_item<S: Store>(
        &self,
        cx: &Cx,
        store: &S,
        value: IdentifierOrRecord,
    ) -> Outcome<Option<Record>, Error> {
        match value {
            IdentifierOrRecord::Record(record) => Outcome::Ok(Some(*record)),
            IdentifierOrRecord::Id(id) => {
                let target = try_result!(self.target_model());
                store.get_by_id(cx, target, &id).await
            }
        }
    }

    /// A new, unsaved target-model record. It is not associated.
    pub fn build<I, F, V>(&self, attrs: I) -> Result<Record>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<Value>,
    {
        let mut record = self.target_model()?.new_record();
        for (field, value) in attrs {
            record.set(field, value);
        }
        Ok(record)
    }

    /// Resolve the target through the store, bypassing the cache.
    pub async fn find_target<S: Store>(&self, cx: &Cx, store: &S) -> Outcome<K::Target, Error> {
        let target = try_result!(self.target_model());
        let ids = self.source_ids();
        tracing::debug!(
            target: "dynomodel::association",
            model = self.source.model(),
            association = self.declaration.name,
            target_model = target.name(),
            ids = ids.len(),
            "Resolving association target"
        );
        K::resolve(cx, store, target, ids).await
    }

    /// The memoized target, resolving it on first access.
    ///
    /// Repeated calls return the same cached value until `reset()`. A failed
    /// or cancelled resolution leaves the association unloaded.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(model = %self.source.model(), association = self.declaration.name)
    )]
    pub async fn target<S: Store>(&mut self, cx: &Cx, store: &S) -> Outcome<&K::Target, Error> {
        let target = match self.state.take() {
            Some(cached) => {
                tracing::trace!("Association target cache hit");
                cached
            }
            None => try_outcome!(self.find_target(cx, store).await),
        };
        Outcome::Ok(&*self.state.insert(target))
    }

    /// Inverse side to update on mutation, resolved before anything is written.
    fn inverse_plan(&self) -> Result<Option<InversePlan<'a>>> {
        if self.config.sync_inverse == InverseSync::Disabled {
            return Ok(None);
        }
        let Some(inverse) = self
            .registry
            .inverse_declaration(self.source.model(), &self.declaration)?
        else {
            return Ok(None);
        };
        // The source id is written onto targets; fail before any write.
        self.source.require_identifier()?;
        Ok(Some(InversePlan {
            inverse,
            target: self.target_model()?,
        }))
    }

    /// Replace the source with `updated`, writing it through the store first
    /// when configured. On failure the in-memory source is untouched.
    ///
    /// Returns whether the store was written.
    async fn commit_source<S: Store>(
        &mut self,
        cx: &Cx,
        store: &S,
        updated: Record,
    ) -> Outcome<bool, Error> {
        let persisted = if self.config.persist_source {
            tracing::info!(
                target: "dynomodel::association",
                model = updated.model(),
                association = self.declaration.name,
                "Writing association source"
            );
            try_outcome!(store.put(cx, &updated).await);
            true
        } else {
            false
        };
        *self.source = updated;
        self.state.reset();
        Outcome::Ok(persisted)
    }

    /// Link or unlink the source on each target's inverse attribute.
    async fn sync_targets<S: Store>(
        &self,
        cx: &Cx,
        store: &S,
        plan: Option<InversePlan<'a>>,
        changes: Vec<InverseChange>,
        source_written: bool,
    ) -> Outcome<(), Error> {
        let Some(plan) = plan else {
            return Outcome::Ok(());
        };
        let source_id = try_result!(self.source.require_identifier());

        for change in changes {
            let target_id = change.id.clone();
            match self.sync_target(cx, store, plan, &source_id, change).await {
                Outcome::Ok(()) => {}
                Outcome::Err(e) => {
                    tracing::warn!(
                        target: "dynomodel::association",
                        model = self.source.model(),
                        association = self.declaration.name,
                        target_id = %target_id,
                        source_written,
                        error = %e,
                        "Inverse update failed"
                    );
                    return Outcome::Err(Error::InverseSync {
                        source_written,
                        cause: Box::new(e),
                    });
                }
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
        }
        Outcome::Ok(())
    }

    /// Update one target. A record handed in by the caller is linked and
    /// written as given; otherwise the target is fetched by id. Linking a
    /// target that is not stored fails; unlinking one is a no-op.
    async fn sync_target<S: Store>(
        &self,
        cx: &Cx,
        store: &S,
        plan: InversePlan<'a>,
        source_id: &Identifier,
        change: InverseChange,
    ) -> Outcome<(), Error> {
        let InverseChange { id: target_id, record, link } = change;
        let provided = record.is_some();
        let target = match record {
            Some(record) => Some(record),
            None => try_outcome!(store.get_by_id(cx, plan.target, &target_id).await),
        };

        let Some(mut target) = target else {
            if link {
                return Outcome::Err(
                    LookupError::new(
                        plan.target.name(),
                        format!("target '{}' is not stored", target_id),
                    )
                    .into(),
                );
            }
            tracing::debug!(
                target: "dynomodel::association",
                target_model = plan.target.name(),
                target_id = %target_id,
                "Inverse target not stored, nothing to unlink"
            );
            return Outcome::Ok(());
        };

        let link_changed = apply_link(&mut target, plan.inverse, source_id, link);
        if !link_changed && !provided {
            return Outcome::Ok(());
        }

        tracing::info!(
            target: "dynomodel::association",
            target_model = plan.target.name(),
            target_id = %target_id,
            inverse = plan.inverse.name,
            link,
            "Writing inverse target"
        );
        store.put(cx, &target).await
    }
}

impl<'a> Association<'a, ToMany> {
    /// Add a target to the set, and the source to the target's inverse.
    ///
    /// A record passed in is linked and written as given, so an unsaved target
    /// is stored by this call. An identifier must name a stored target, or the
    /// call fails with `Error::InverseSync`. Adding an already-present target
    /// is a no-op.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(model = %self.source.model(), association = self.declaration.name)
    )]
    pub async fn add<S: Store>(
        &mut self,
        cx: &Cx,
        store: &S,
        value: impl Into<IdentifierOrRecord>,
    ) -> Outcome<(), Error> {
        let value = value.into();
        let id = try_result!(self.coerce_to_id(&value));
        let plan = try_result!(self.inverse_plan());

        let mut ids = self.source_ids();
        if !ids.insert(id.clone()) {
            return Outcome::Ok(());
        }

        let mut updated = self.source.clone();
        updated.set(self.declaration_field_name(), id_set_value(&ids));
        let written = try_outcome!(self.commit_source(cx, store, updated).await);

        let change = InverseChange::link(value, id);
        self.sync_targets(cx, store, plan, vec![change], written)
            .await
    }

    /// Remove a target from the set, and the source from the target's inverse.
    ///
    /// Removing an absent target is a no-op.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(model = %self.source.model(), association = self.declaration.name)
    )]
    pub async fn remove<S: Store>(
        &mut self,
        cx: &Cx,
        store: &S,
        value: impl Into<IdentifierOrRecord>,
    ) -> Outcome<(), Error> {
        let id = try_result!(self.coerce_to_id(&value.into()));
        let plan = try_result!(self.inverse_plan());

        let mut ids = self.source_ids();
        if !ids.remove(&id) {
            return Outcome::Ok(());
        }

        let mut updated = self.source.clone();
        updated.set(self.declaration_field_name(), id_set_value(&ids));
        let written = try_outcome!(self.commit_source(cx, store, updated).await);

        self.sync_targets(cx, store, plan, vec![InverseChange::unlink(id)], written)
            .await
    }
}

impl<'a> Association<'a, ToOne> {
    /// Point the association at a target, replacing any previous one.
    ///
    /// The previous target is unlinked from its inverse, the new one linked.
    /// A record passed in is linked and written as given.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(model = %self.source.model(), association = self.declaration.name)
    )]
    pub async fn set<S: Store>(
        &mut self,
        cx: &Cx,
        store: &S,
        value: impl Into<IdentifierOrRecord>,
    ) -> Outcome<(), Error> {
        let value = value.into();
        let id = try_result!(self.coerce_to_id(&value));
        let plan = try_result!(self.inverse_plan());

        let previous = self.source_ids().into_iter().next();
        if previous.as_ref() == Some(&id) {
            return Outcome::Ok(());
        }

        let mut updated = self.source.clone();
        updated.set(self.declaration_field_name(), id.clone());
        let written = try_outcome!(self.commit_source(cx, store, updated).await);

        let mut changes = Vec::with_capacity(2);
        if let Some(previous) = previous {
            changes.push(InverseChange::unlink(previous));
        }
        changes.push(InverseChange::link(value, id));
        self.sync_targets(cx, store, plan, changes, written).await
    }

    /// Clear the reference, unlinking the previous target's inverse.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(model = %self.source.model(), association = self.declaration.name)
    )]
    pub async fn clear<S: Store>(&mut self, cx: &Cx, store: &S) -> Outcome<(), Error> {
        let plan = try_result!(self.inverse_plan());

        let Some(previous) = self.source_ids().into_iter().next() else {
            return Outcome::Ok(());
        };

        let mut updated = self.source.clone();
        updated.remove(&self.declaration_field_name());
        let written = try_outcome!(self.commit_source(cx, store, updated).await);

        self.sync_targets(cx, store, plan, vec![InverseChange::unlink(previous)], written)
            .await
    }
}

impl<K: Cardinality> fmt::Debug for Association<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.state.is_loaded() {
            "loaded"
        } else {
            "unloaded"
        };

        f.debug_struct("Association")
            .field("model", &self.source.model())
            .field("name", &self.declaration.name)
            .field("kind", &K::KIND)
            .field("state", &state)
            .field("target", &self.state.get())
            .finish()
    }
}

/// A resolved target borrowed from an `AnyAssociation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetRef<'t> {
    /// To-one target: at most one record.
    One(Option<&'t Record>),
    /// To-many target: zero or more records.
    Many(&'t [Record]),
}

impl<'t> TargetRef<'t> {
    /// All target records, in resolution order.
    pub fn records(self) -> Vec<&'t Record> {
        match self {
            TargetRef::One(record) => record.into_iter().collect(),
            TargetRef::Many(records) => records.iter().collect(),
        }
    }
}

/// An association whose variant is chosen at runtime from the declaration.
#[derive(Debug)]
pub enum AnyAssociation<'a> {
    /// Belongs-to variant.
    ToOne(Association<'a, ToOne>),
    /// Has-many variant.
    ToMany(Association<'a, ToMany>),
}

impl<'a> AnyAssociation<'a> {
    /// Bind the association named `name` on the source's model, choosing the
    /// variant from the declaration's kind.
    pub fn new(registry: &'a ModelRegistry, source: &'a mut Record, name: &str) -> Result<Self> {
        let declaration = *registry.association(source.model(), name)?;
        Ok(match declaration.kind {
            AssociationKind::ToOne => AnyAssociation::ToOne(Association::from_declaration(
                registry,
                source,
                declaration,
            )?),
            AssociationKind::ToMany => AnyAssociation::ToMany(Association::from_declaration(
                registry,
                source,
                declaration,
            )?),
        })
    }

    /// The declaration this association was built from.
    pub fn declaration(&self) -> &AssociationDeclaration {
        match self {
            AnyAssociation::ToOne(a) => a.declaration(),
            AnyAssociation::ToMany(a) => a.declaration(),
        }
    }

    /// Relationship shape.
    pub fn kind(&self) -> AssociationKind {
        self.declaration().kind
    }

    /// True once a resolution pass has completed since the last reset.
    pub fn is_loaded(&self) -> bool {
        match self {
            AnyAssociation::ToOne(a) => a.is_loaded(),
            AnyAssociation::ToMany(a) => a.is_loaded(),
        }
    }

    /// Drop the cached target.
    pub fn reset(&mut self) {
        match self {
            AnyAssociation::ToOne(a) => a.reset(),
            AnyAssociation::ToMany(a) => a.reset(),
        }
    }

    /// Name of the reference field on the source record.
    pub fn declaration_field_name(&self) -> Cow<'static, str> {
        self.declaration().declaration_field_name()
    }

    /// Semantic type of the reference field.
    pub fn declaration_field_type(&self) -> ReferenceFieldType {
        self.declaration().declaration_field_type()
    }

    /// The memoized target, resolving it on first access.
    pub async fn target<S: Store>(&mut self, cx: &Cx, store: &S) -> Outcome<TargetRef<'_>, Error> {
        match self {
            AnyAssociation::ToOne(a) => match a.target(cx, store).await {
                Outcome::Ok(record) => Outcome::Ok(TargetRef::One(record.as_ref())),
                Outcome::Err(e) => Outcome::Err(e),
                Outcome::Cancelled(r) => Outcome::Cancelled(r),
                Outcome::Panicked(p) => Outcome::Panicked(p),
            },
            AnyAssociation::ToMany(a) => match a.target(cx, store).await {
                Outcome::Ok(records) => Outcome::Ok(TargetRef::Many(records.as_slice())),
                Outcome::Err(e) => Outcome::Err(e),
                Outcome::Cancelled(r) => Outcome::Cancelled(r),
                Outcome::Panicked(p) => Outcome::Panicked(p),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynomodel_core::KeySchema;

    fn post_record() -> Record {
        Record::new("Post", KeySchema::default()).with("id", "p1")
    }

    #[test]
    fn test_identifiers_in_accepts_scalar_and_set() {
        let set: BTreeSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        assert_eq!(identifiers_in(Some(&Value::StringSet(set))).len(), 2);
        assert_eq!(
            identifiers_in(Some(&Value::from("a"))),
            [Identifier::from("a")].into_iter().collect()
        );
        assert!(identifiers_in(None).is_empty());
        assert!(identifiers_in(Some(&Value::from(""))).is_empty());
    }

    #[test]
    fn test_empty_id_set_is_stored_as_absent() {
        assert!(id_set_value(&BTreeSet::new()).is_null());
    }

    #[test]
    fn test_apply_link_to_many_inverse() {
        let inverse = AssociationDeclaration::to_many("posts");
        let mut tag = Record::new("Tag", KeySchema::default()).with("id", "t1");
        let id = Identifier::from("p1");

        assert!(apply_link(&mut tag, &inverse, &id, true));
        assert!(!apply_link(&mut tag, &inverse, &id, true));
        assert_eq!(identifiers_in(tag.get("posts_ids")).len(), 1);

        assert!(apply_link(&mut tag, &inverse, &id, false));
        assert!(!tag.has("posts_ids"));
    }

    #[test]
    fn test_apply_link_to_one_inverse_only_unlinks_own_id() {
        let inverse = AssociationDeclaration::to_one("post").foreign_key("post_id");
        let mut comment = Record::new("Comment", KeySchema::new("id"))
            .with("id", "c1")
            .with("post_id", "p2");
        let id = Identifier::from("p1");

        assert!(!apply_link(&mut comment, &inverse, &id, false));
        assert_eq!(comment.get("post_id"), Some(&Value::from("p2")));

        assert!(apply_link(&mut comment, &inverse, &id, true));
        assert_eq!(comment.get("post_id"), Some(&Value::from("p1")));
    }

    #[test]
    fn test_kind_mismatch_is_configuration_error() {
        let registry = ModelRegistry::new()
            .with(ModelSchema::new("Post").association(AssociationDeclaration::to_many("comments")))
            .unwrap();
        let mut post = post_record();
        let err = Association::<ToOne>::new(&registry, &mut post, "comments").unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::KindMismatch {
                expected: AssociationKind::ToOne,
                found: AssociationKind::ToMany,
                ..
            })
        ));
    }

    #[test]
    fn test_any_association_picks_variant_from_declaration() {
        let registry = ModelRegistry::new()
            .with(
                ModelSchema::new("Post")
                    .association(AssociationDeclaration::to_many("comments"))
                    .association(AssociationDeclaration::to_one("author").foreign_key("written_by")),
            )
            .unwrap();
        let mut post = post_record();
        let any = AnyAssociation::new(&registry, &mut post, "author").unwrap();
        assert!(matches!(any, AnyAssociation::ToOne(_)));
        assert_eq!(any.declaration_field_name(), "written_by");
        assert_eq!(any.declaration_field_type(), ReferenceFieldType::Scalar);
        drop(any);

        let any = AnyAssociation::new(&registry, &mut post, "comments").unwrap();
        assert_eq!(any.kind(), AssociationKind::ToMany);
        assert_eq!(any.declaration_field_name(), "comments_ids");
        assert!(!any.is_loaded());
    }

    #[test]
    fn test_source_ids_honor_foreign_key_scalar() {
        let registry = ModelRegistry::new()
            .with(
                ModelSchema::new("Comment")
                    .association(AssociationDeclaration::to_one("post").foreign_key("post_id")),
            )
            .unwrap();
        let mut comment = Record::new("Comment", KeySchema::default())
            .with("id", "c1")
            .with("post_id", "p1");
        let assoc = Association::<ToOne>::new(&registry, &mut comment, "post").unwrap();
        assert_eq!(
            assoc.source_ids(),
            [Identifier::from("p1")].into_iter().collect()
        );
    }
}
