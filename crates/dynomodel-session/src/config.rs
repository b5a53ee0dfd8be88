//! Association behavior configuration.

/// How mutations propagate to the inverse side of an association.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InverseSync {
    /// Write the source first, then update and write each affected target.
    /// A failed target write is reported, but the source write stands.
    #[default]
    BestEffort,
    /// Only the source side is updated.
    Disabled,
}

/// Configuration for association mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationConfig {
    /// Inverse propagation mode.
    pub sync_inverse: InverseSync,
    /// Whether mutations write the source record through the store. When
    /// false, the source is only updated in memory and the caller saves it.
    pub persist_source: bool,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            sync_inverse: InverseSync::BestEffort,
            persist_source: true,
        }
    }
}

impl AssociationConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inverse propagation mode.
    #[must_use]
    pub fn sync_inverse(mut self, mode: InverseSync) -> Self {
        self.sync_inverse = mode;
        self
    }

    /// Set whether the source record is written through the store.
    #[must_use]
    pub fn persist_source(mut self, persist: bool) -> Self {
        self.persist_source = persist;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_association_config_defaults() {
        let config = AssociationConfig::default();
        assert_eq!(config.sync_inverse, InverseSync::BestEffort);
        assert!(config.persist_source);
    }

    #[test]
    fn test_association_config_builder() {
        let config = AssociationConfig::new()
            .sync_inverse(InverseSync::Disabled)
            .persist_source(false);
        assert_eq!(config.sync_inverse, InverseSync::Disabled);
        assert!(!config.persist_source);
    }
}
