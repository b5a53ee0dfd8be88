//! Error types for Dynomodel.
//!
//! Errors fall into three groups:
//!
//! - **Configuration errors** are declaration defects (unknown target model,
//!   missing inverse association). They are never retried.
//! - **Lookup errors** come from the backing store and are carried to the
//!   caller unchanged. A failed lookup leaves association state untouched.
//! - **Inverse sync errors** report a bidirectional write where the source
//!   side landed and a target side did not.
//!
//! "No index matches this query" is not an error; the index finder returns
//! `None` for it.

use std::error::Error as StdError;
use std::fmt;

use crate::association::AssociationKind;

/// Result alias used across the Dynomodel crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The primary error type.
#[derive(Debug)]
pub enum Error {
    /// A model or association declaration cannot be resolved.
    Configuration(ConfigurationError),
    /// The backing store failed to answer a by-identifier call.
    Lookup(LookupError),
    /// A record has no partition-key value where one is required.
    MissingKey {
        /// Model of the record.
        model: String,
        /// Partition-key field that was empty.
        field: String,
    },
    /// The source record was written, but updating an inverse target failed.
    InverseSync {
        /// Whether the source write completed before the failure.
        source_written: bool,
        /// The underlying failure.
        cause: Box<Error>,
    },
}

impl Error {
    /// True for declaration defects that must not be retried.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// True for failures reported by the backing store.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::Lookup(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(err) => write!(f, "configuration error: {}", err),
            Error::Lookup(err) => write!(f, "lookup failed: {}", err),
            Error::MissingKey { model, field } => {
                write!(f, "{} record has no value for partition key '{}'", model, field)
            }
            Error::InverseSync {
                source_written,
                cause,
            } => {
                if *source_written {
                    write!(f, "source written but inverse update failed: {}", cause)
                } else {
                    write!(f, "inverse update failed: {}", cause)
                }
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Configuration(err) => Some(err),
            Error::Lookup(err) => Some(err),
            Error::InverseSync { cause, .. } => Some(cause.as_ref()),
            Error::MissingKey { .. } => None,
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Error::Configuration(err)
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        Error::Lookup(err)
    }
}

/// A declaration defect detected at registration or first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No model with this name is registered.
    UnknownModel { name: String },
    /// A model with this name was registered twice.
    DuplicateModel { name: String },
    /// The model declares no association with this name.
    UnknownAssociation { model: String, name: String },
    /// The inverse named by an association does not exist on the target model.
    UnknownInverse {
        model: String,
        association: String,
        target: String,
        inverse: String,
    },
    /// The association exists but has a different kind than requested.
    KindMismatch {
        model: String,
        name: String,
        expected: AssociationKind,
        found: AssociationKind,
    },
    /// A model, field or association name is not a valid attribute name.
    InvalidName { model: String, name: String },
    /// An option was set that the association kind does not support.
    UnsupportedOption {
        model: String,
        association: String,
        option: &'static str,
    },
    /// A secondary index was declared without fields.
    InvalidIndex { model: String, reason: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownModel { name } => {
                write!(f, "unknown model '{}'", name)
            }
            ConfigurationError::DuplicateModel { name } => {
                write!(f, "model '{}' is already registered", name)
            }
            ConfigurationError::UnknownAssociation { model, name } => {
                write!(f, "model '{}' has no association '{}'", model, name)
            }
            ConfigurationError::UnknownInverse {
                model,
                association,
                target,
                inverse,
            } => write!(
                f,
                "{}.{} names inverse '{}', but '{}' declares no such association",
                model, association, inverse, target
            ),
            ConfigurationError::KindMismatch {
                model,
                name,
                expected,
                found,
            } => write!(
                f,
                "{}.{} is a {} association, not {}",
                model, name, found, expected
            ),
            ConfigurationError::InvalidName { model, name } => {
                write!(f, "invalid name '{}' on model '{}'", name, model)
            }
            ConfigurationError::UnsupportedOption {
                model,
                association,
                option,
            } => write!(
                f,
                "option '{}' is not supported on {}.{}",
                option, model, association
            ),
            ConfigurationError::InvalidIndex { model, reason } => {
                write!(f, "invalid index on '{}': {}", model, reason)
            }
        }
    }
}

impl StdError for ConfigurationError {}

/// A failure reported by the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    /// Model that was being read or written.
    pub model: String,
    /// Store-provided description.
    pub message: String,
}

impl LookupError {
    /// Create a new lookup error.
    pub fn new(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.model, self.message)
    }
}

impl StdError for LookupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = Error::from(ConfigurationError::UnknownInverse {
            model: "Post".to_string(),
            association: "comments".to_string(),
            target: "Comment".to_string(),
            inverse: "article".to_string(),
        });
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "configuration error: Post.comments names inverse 'article', but 'Comment' declares no such association"
        );
    }

    #[test]
    fn test_inverse_sync_exposes_cause() {
        let err = Error::InverseSync {
            source_written: true,
            cause: Box::new(Error::Lookup(LookupError::new("Comment", "timeout"))),
        };
        assert!(err.to_string().starts_with("source written"));
        let cause = err.source().map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("lookup failed: Comment: timeout"));
    }
}
