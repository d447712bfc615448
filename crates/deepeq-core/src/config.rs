//! Comparison configuration.
//!
//! A [`ComparisonConfig`] is an immutable snapshot for one comparison. It is
//! plain data: the engine never reads ambient or global settings.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::comparers::TypeComparer;
use crate::errors::{DeepEqError, Result};

/// Options controlling one comparison
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Recording stops once this many differences are held. At least 1.
    pub max_differences: usize,
    /// Descend into members whose declared shape can own nested values.
    pub compare_children: bool,
    /// Compare members by name even when the two runtime types differ.
    pub ignore_object_types: bool,
    /// Include members without a setter.
    pub compare_read_only: bool,
    /// Interface names; an object implementing one is compared through that
    /// interface's members only.
    pub interface_members: Vec<String>,
    /// Skip indexers that cannot be walked instead of failing.
    pub skip_invalid_indexers: bool,
    /// Judge disposed objects equal instead of failing.
    pub ignore_object_disposed: bool,
    /// Member names (`Name`) or qualified names (`Type.Name`) never compared.
    pub members_to_ignore: BTreeSet<String>,
    /// Members carrying any of these attributes are never compared.
    pub attributes_to_ignore: BTreeSet<String>,
    /// Label for the left side in reports.
    pub expected_name: String,
    /// Label for the right side in reports.
    pub actual_name: String,
    /// Strategies consulted before the built-in ones, in order.
    #[serde(skip)]
    pub custom_comparers: Vec<Arc<dyn TypeComparer>>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_differences: 1,
            compare_children: true,
            ignore_object_types: false,
            compare_read_only: true,
            interface_members: Vec::new(),
            skip_invalid_indexers: false,
            ignore_object_disposed: false,
            members_to_ignore: BTreeSet::new(),
            attributes_to_ignore: BTreeSet::new(),
            expected_name: "Expected".to_string(),
            actual_name: "Actual".to_string(),
            custom_comparers: Vec::new(),
        }
    }
}

impl ComparisonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for malformed JSON, unknown fields or values that fail
    /// [`validate`](ComparisonConfig::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DeepEqError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `InvalidConfig` when `max_differences` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.max_differences == 0 {
            return Err(DeepEqError::InvalidConfig {
                reason: "max_differences must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_max_differences(mut self, max: usize) -> Self {
        self.max_differences = max;
        self
    }

    pub fn with_compare_children(mut self, yes: bool) -> Self {
        self.compare_children = yes;
        self
    }

    pub fn with_ignore_object_types(mut self, yes: bool) -> Self {
        self.ignore_object_types = yes;
        self
    }

    pub fn with_compare_read_only(mut self, yes: bool) -> Self {
        self.compare_read_only = yes;
        self
    }

    pub fn with_interface_member(mut self, interface: impl Into<String>) -> Self {
        self.interface_members.push(interface.into());
        self
    }

    pub fn with_skip_invalid_indexers(mut self, yes: bool) -> Self {
        self.skip_invalid_indexers = yes;
        self
    }

    pub fn with_ignore_object_disposed(mut self, yes: bool) -> Self {
        self.ignore_object_disposed = yes;
        self
    }

    pub fn with_member_to_ignore(mut self, member: impl Into<String>) -> Self {
        self.members_to_ignore.insert(member.into());
        self
    }

    pub fn with_attribute_to_ignore(mut self, attribute: impl Into<String>) -> Self {
        self.attributes_to_ignore.insert(attribute.into());
        self
    }

    pub fn with_names(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected_name = expected.into();
        self.actual_name = actual.into();
        self
    }

    pub fn with_custom_comparer(mut self, comparer: Arc<dyn TypeComparer>) -> Self {
        self.custom_comparers.push(comparer);
        self
    }
}

impl fmt::Debug for ComparisonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let custom: Vec<&str> = self.custom_comparers.iter().map(|c| c.name()).collect();
        f.debug_struct("ComparisonConfig")
            .field("max_differences", &self.max_differences)
            .field("compare_children", &self.compare_children)
            .field("ignore_object_types", &self.ignore_object_types)
            .field("compare_read_only", &self.compare_read_only)
            .field("interface_members", &self.interface_members)
            .field("skip_invalid_indexers", &self.skip_invalid_indexers)
            .field("ignore_object_disposed", &self.ignore_object_disposed)
            .field("members_to_ignore", &self.members_to_ignore)
            .field("attributes_to_ignore", &self.attributes_to_ignore)
            .field("expected_name", &self.expected_name)
            .field("actual_name", &self.actual_name)
            .field("custom_comparers", &custom)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComparisonConfig::default();
        assert_eq!(config.max_differences, 1);
        assert!(config.compare_children);
        assert!(config.compare_read_only);
        assert!(!config.ignore_object_types);
        assert_eq!(config.expected_name, "Expected");
        assert_eq!(config.actual_name, "Actual");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ComparisonConfig::from_json_str(r#"{"max_differences": 10, "members_to_ignore": ["Person.Id"]}"#)
                .unwrap();
        assert_eq!(config.max_differences, 10);
        assert!(config.members_to_ignore.contains("Person.Id"));
        assert!(config.compare_children);
    }

    #[test]
    fn test_zero_max_rejected() {
        let err = ComparisonConfig::from_json_str(r#"{"max_differences": 0}"#).unwrap_err();
        assert!(matches!(err, DeepEqError::InvalidConfig { .. }));
    }

    #[test]
    fn test_malformed_json_is_invalid_config() {
        let err = ComparisonConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, DeepEqError::InvalidConfig { .. }));
        let err = ComparisonConfig::from_json_str(r#"{"no_such_option": true}"#).unwrap_err();
        assert!(matches!(err, DeepEqError::InvalidConfig { .. }));
    }
}
