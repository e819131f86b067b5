//! Activation of mutation tracking per column type.

use std::collections::HashMap;
use std::sync::Arc;

use oxide_json_core::types::ARRAY_VISIT_NAME;
use oxide_json_core::{DataType, JsonType};
use tracing::debug;

use crate::attribute::{InstanceState, MutableColumn};
use crate::error::{OrmError, Result};
use crate::tracking::MutableKind;

/// Maps column types to the tracking container used for their values.
///
/// Built once at startup, then shared read-only by the managers.
///
/// ```rust
/// use oxide_json_core::DataType;
/// use oxide_json_orm::{MutableKind, MutableRegistry};
///
/// let registry = MutableRegistry::new().with_json().with_array();
/// assert_eq!(registry.kind_for(&DataType::Json), Some(MutableKind::Dict));
/// assert_eq!(
///     registry.kind_for(&DataType::array_of(DataType::Text)),
///     Some(MutableKind::List)
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MutableRegistry {
    kinds: HashMap<&'static str, MutableKind>,
}

impl MutableRegistry {
    /// Creates a registry with nothing activated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a tracking kind with a column visit name.
    ///
    /// Returns `false` if the association already existed.
    pub fn associate(&mut self, visit_name: &'static str, kind: MutableKind) -> bool {
        if self.kinds.get(visit_name) == Some(&kind) {
            debug!(type_name = visit_name, ?kind, "Mutation tracking already active");
            return false;
        }
        debug!(type_name = visit_name, ?kind, "Activating mutation tracking");
        self.kinds.insert(visit_name, kind);
        true
    }

    /// Tracks ARRAY columns as lists.
    pub fn associate_array(&mut self) -> bool {
        self.associate(ARRAY_VISIT_NAME, MutableKind::List)
    }

    /// Tracks JSON columns as dicts.
    pub fn associate_json(&mut self) -> bool {
        self.associate(JsonType::VISIT_NAME, MutableKind::Dict)
    }

    /// Builder form of [`MutableRegistry::associate_json`].
    #[must_use]
    pub fn with_json(mut self) -> Self {
        self.associate_json();
        self
    }

    /// Builder form of [`MutableRegistry::associate_array`].
    #[must_use]
    pub fn with_array(mut self) -> Self {
        self.associate_array();
        self
    }

    /// Returns the tracking kind for a column type.
    #[must_use]
    pub fn kind_for(&self, data_type: &DataType) -> Option<MutableKind> {
        self.kinds.get(data_type.visit_name()).copied()
    }

    /// Builds the tracked attribute holder for a column.
    pub fn instrument(
        &self,
        state: &Arc<InstanceState>,
        key: &'static str,
        data_type: &DataType,
    ) -> Result<MutableColumn> {
        let kind = self.kind_for(data_type).ok_or_else(|| OrmError::NotMutable {
            column: key.to_string(),
            data_type: data_type.to_sql(),
        })?;
        Ok(MutableColumn::new(state, key, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_is_idempotent() {
        let mut registry = MutableRegistry::new();
        assert!(registry.associate_json());
        assert!(!registry.associate_json());
        assert!(registry.associate_array());
        assert!(!registry.associate_array());
        assert_eq!(registry.kind_for(&DataType::Json), Some(MutableKind::Dict));
    }

    #[test]
    fn test_every_array_type_is_tracked() {
        let registry = MutableRegistry::new().with_array();
        for element in [DataType::Integer, DataType::Text, DataType::Json] {
            assert_eq!(
                registry.kind_for(&DataType::array_of(element)),
                Some(MutableKind::List)
            );
        }
        assert_eq!(registry.kind_for(&DataType::Json), None);
    }

    #[test]
    fn test_instrument_unassociated_type() {
        let registry = MutableRegistry::new().with_json();
        let state = InstanceState::new();
        let err = registry
            .instrument(&state, "title", &DataType::Text)
            .unwrap_err();
        assert!(matches!(err, OrmError::NotMutable { ref column, .. } if column == "title"));
        assert!(registry.instrument(&state, "data", &DataType::Json).is_ok());
    }
}
