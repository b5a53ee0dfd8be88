//! The model registry.
//!
//! Maps model names to their schemas and resolves association declarations
//! across models: target type lookup and one-hop inverse field derivation.
//! Target and inverse names are resolved lazily, on first use, so models may
//! reference each other regardless of registration order.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::association::{AssociationDeclaration, AssociationKind};
use crate::error::{ConfigurationError, Result};
use crate::schema::ModelSchema;

const NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

fn name_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| match Regex::new(NAME_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(
                    pattern = NAME_PATTERN,
                    error = %e,
                    "Invalid name pattern, name validation disabled"
                );
                None
            }
        })
        .as_ref()
}

fn is_valid_name(name: &str) -> bool {
    name_regex().is_none_or(|regex| regex.is_match(name))
}

/// Registered model schemas, keyed by model name.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<&'static str, ModelSchema>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `register`.
    pub fn with(mut self, schema: ModelSchema) -> Result<Self> {
        self.register(schema)?;
        Ok(self)
    }

    /// Register a model schema.
    ///
    /// Validates names and per-model declaration rules. Cross-model references
    /// (target types, inverses) are not checked here.
    #[tracing::instrument(level = "debug", skip(self, schema), fields(model = schema.name()))]
    pub fn register(&mut self, schema: ModelSchema) -> Result<()> {
        let model = schema.name();

        if self.models.contains_key(model) {
            return Err(ConfigurationError::DuplicateModel {
                name: model.to_string(),
            }
            .into());
        }

        let invalid = |name: &str| ConfigurationError::InvalidName {
            model: model.to_string(),
            name: name.to_string(),
        };

        if !is_valid_name(model) {
            return Err(invalid(model).into());
        }
        if !is_valid_name(&schema.key().partition_key) {
            return Err(invalid(&schema.key().partition_key).into());
        }
        if let Some(sort_key) = schema.key().sort_key.as_deref() {
            if !is_valid_name(sort_key) {
                return Err(invalid(sort_key).into());
            }
        }

        for index in schema.indexes().secondary() {
            if index.fields().is_empty() {
                return Err(ConfigurationError::InvalidIndex {
                    model: model.to_string(),
                    reason: format!(
                        "secondary index {} has no fields",
                        index.name().unwrap_or("<unnamed>")
                    ),
                }
                .into());
            }
            if let Some(field) = index.fields().iter().find(|f| !is_valid_name(f)) {
                return Err(invalid(field).into());
            }
        }

        for (pos, decl) in schema.associations().iter().enumerate() {
            if !is_valid_name(decl.name) {
                return Err(invalid(decl.name).into());
            }
            if schema.associations()[..pos].iter().any(|a| a.name == decl.name) {
                return Err(invalid(decl.name).into());
            }
            if let Some(fk) = decl.foreign_key {
                if decl.kind == AssociationKind::ToMany {
                    return Err(ConfigurationError::UnsupportedOption {
                        model: model.to_string(),
                        association: decl.name.to_string(),
                        option: "foreign_key",
                    }
                    .into());
                }
                if !is_valid_name(fk) {
                    return Err(invalid(fk).into());
                }
            }
        }

        tracing::debug!(
            model,
            associations = schema.associations().len(),
            secondary_indexes = schema.indexes().secondary().len(),
            "Registered model"
        );
        self.models.insert(model, schema);
        Ok(())
    }

    /// Check whether a model is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True if no models are registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Get a model schema by name.
    pub fn model(&self, name: &str) -> Result<&ModelSchema> {
        self.models.get(name).ok_or_else(|| {
            ConfigurationError::UnknownModel {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Get an association declaration of a model.
    pub fn association(&self, model: &str, name: &str) -> Result<&AssociationDeclaration> {
        self.model(model)?.association_named(name).ok_or_else(|| {
            ConfigurationError::UnknownAssociation {
                model: model.to_string(),
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Resolve the target model of a declaration.
    ///
    /// Uses the explicit target type if set, else the name inferred from the
    /// association name. Never falls back to another model.
    pub fn target_model(&self, declaration: &AssociationDeclaration) -> Result<&ModelSchema> {
        self.model(&declaration.target_type_name())
    }

    /// The inverse declaration on the target model, if the declaration names one.
    pub fn inverse_declaration(
        &self,
        model: &str,
        declaration: &AssociationDeclaration,
    ) -> Result<Option<&AssociationDeclaration>> {
        let Some(inverse) = declaration.inverse_name else {
            return Ok(None);
        };
        let target = self.target_model(declaration)?;
        match target.association_named(inverse) {
            Some(found) => Ok(Some(found)),
            None => Err(ConfigurationError::UnknownInverse {
                model: model.to_string(),
                association: declaration.name.to_string(),
                target: target.name().to_string(),
                inverse: inverse.to_string(),
            }
            .into()),
        }
    }

    /// The attribute on each target record that holds the source's identifier.
    ///
    /// One hop only: the inverse declaration's own inverse is never followed.
    /// Returns `None` when the declaration names no inverse.
    pub fn inverse_field(
        &self,
        model: &str,
        declaration: &AssociationDeclaration,
    ) -> Result<Option<Cow<'static, str>>> {
        Ok(self
            .inverse_declaration(model, declaration)?
            .map(AssociationDeclaration::declaration_field_name))
    }

    /// Iterate over registered models (unordered).
    pub fn models(&self) -> impl Iterator<Item = &ModelSchema> {
        self.models.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::index::IndexDescriptor;

    fn blog() -> ModelRegistry {
        ModelRegistry::new()
            .with(
                ModelSchema::new("Post")
                    .association(AssociationDeclaration::to_many("comments").inverse_of("post")),
            )
            .and_then(|r| {
                r.with(
                    ModelSchema::new("Comment")
                        .partition_key("post_id")
                        .sort_key("timestamp")
                        .association(AssociationDeclaration::to_one("post")),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_inverse_field_is_target_reference_field() {
        let registry = blog();
        let decl = registry.association("Post", "comments").unwrap();
        let field = registry.inverse_field("Post", decl).unwrap();
        assert_eq!(field.as_deref(), Some("post_id"));
    }

    #[test]
    fn test_inverse_field_absent_without_inverse_name() {
        let registry = blog();
        let decl = registry.association("Comment", "post").unwrap();
        assert_eq!(registry.inverse_field("Comment", decl).unwrap(), None);
    }

    #[test]
    fn test_unknown_inverse_is_configuration_error() {
        let registry = ModelRegistry::new()
            .with(
                ModelSchema::new("Post")
                    .association(AssociationDeclaration::to_many("comments").inverse_of("article")),
            )
            .and_then(|r| r.with(ModelSchema::new("Comment")))
            .unwrap();
        let decl = registry.association("Post", "comments").unwrap();
        let err = registry.inverse_field("Post", decl).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnknownInverse { ref inverse, .. }) if inverse == "article"
        ));
    }

    #[test]
    fn test_unresolvable_target_does_not_default() {
        let registry = ModelRegistry::new()
            .with(ModelSchema::new("Post").association(AssociationDeclaration::to_many("tags")))
            .unwrap();
        let decl = registry.association("Post", "tags").unwrap();
        let err = registry.target_model(decl).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnknownModel { ref name }) if name == "Tag"
        ));
    }

    #[test]
    fn test_forward_reference_resolves_after_registration() {
        let mut registry = ModelRegistry::new();
        registry
            .register(
                ModelSchema::new("Post")
                    .association(AssociationDeclaration::to_many("comments").inverse_of("post")),
            )
            .unwrap();
        let decl = *registry.association("Post", "comments").unwrap();
        assert!(registry.inverse_field("Post", &decl).is_err());

        registry
            .register(ModelSchema::new("Comment").association(AssociationDeclaration::to_one("post")))
            .unwrap();
        assert_eq!(
            registry.inverse_field("Post", &decl).unwrap().as_deref(),
            Some("post_id")
        );
    }

    #[test]
    fn test_register_rejects_bad_declarations() {
        let mut registry = ModelRegistry::new();
        registry.register(ModelSchema::new("Post")).unwrap();
        assert!(matches!(
            registry.register(ModelSchema::new("Post")),
            Err(Error::Configuration(ConfigurationError::DuplicateModel { .. }))
        ));
        assert!(matches!(
            registry.register(
                ModelSchema::new("Tag")
                    .association(AssociationDeclaration::to_many("posts").foreign_key("post_id"))
            ),
            Err(Error::Configuration(ConfigurationError::UnsupportedOption { .. }))
        ));
        assert!(matches!(
            registry.register(
                ModelSchema::new("Bad").index(IndexDescriptor::secondary(Vec::<String>::new()))
            ),
            Err(Error::Configuration(ConfigurationError::InvalidIndex { .. }))
        ));
        assert!(matches!(
            registry.register(ModelSchema::new("Odd").partition_key("has space")),
            Err(Error::Configuration(ConfigurationError::InvalidName { .. }))
        ));
    }
}
