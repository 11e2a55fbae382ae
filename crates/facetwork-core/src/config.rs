//! # Metamodel Configuration
//!
//! Every key has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! introspection_policy = "annotation-optional"
//! filter_visibility = true
//! auto_complete_min_length = 1
//!
//! [validation]
//! enabled = true
//! strict = false
//! orphaned_methods = true
//! unique_logical_type_names = true
//! ```
//!
//! The configuration is shared as an immutable snapshot once a
//! [`MetaModelContext`](crate::MetaModelContext) is built.

use crate::MetamodelError;
use serde::{Deserialize, Serialize};

/// Which public methods become actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntrospectionPolicy {
    /// Every public method not otherwise claimed is an action.
    #[default]
    AnnotationOptional,
    /// Only methods annotated `Action` are actions.
    AnnotationRequired,
}

/// Settings of the validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run validation when the context is primed.
    pub enabled: bool,
    /// Turn any failure into an error from `prime`.
    pub strict: bool,
    /// Report supporting methods and setters no member claimed.
    pub orphaned_methods: bool,
    /// Report two concrete types sharing a logical type name.
    pub unique_logical_type_names: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strict: false,
            orphaned_methods: true,
            unique_logical_type_names: true,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetamodelConfig {
    pub introspection_policy: IntrospectionPolicy,
    /// Filter choices and other adapted results through the visibility policy.
    pub filter_visibility: bool,
    /// Shortest search term passed to `autoCompleteX` methods.
    pub auto_complete_min_length: usize,
    pub validation: ValidationConfig,
}

impl Default for MetamodelConfig {
    fn default() -> Self {
        Self {
            introspection_policy: IntrospectionPolicy::default(),
            filter_visibility: true,
            auto_complete_min_length: 1,
            validation: ValidationConfig::default(),
        }
    }
}

impl MetamodelConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, MetamodelError> {
        toml::from_str(source).map_err(|e| MetamodelError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = MetamodelConfig::from_toml_str("").expect("parse");
        assert_eq!(config, MetamodelConfig::default());
        assert!(config.filter_visibility);
        assert!(config.validation.enabled);
        assert!(!config.validation.strict);
    }

    #[test]
    fn partial_document_overrides_keys() {
        let config = MetamodelConfig::from_toml_str(
            r#"
            introspection_policy = "annotation-required"

            [validation]
            strict = true
            "#,
        )
        .expect("parse");

        assert_eq!(
            config.introspection_policy,
            IntrospectionPolicy::AnnotationRequired
        );
        assert!(config.validation.strict);
        assert!(config.validation.orphaned_methods);
    }

    #[test]
    fn malformed_document_is_config_error() {
        let result = MetamodelConfig::from_toml_str("filter_visibility = \"yes\"");
        assert!(matches!(result, Err(MetamodelError::Config(_))));
    }
}
