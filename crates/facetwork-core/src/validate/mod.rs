//! # Metamodel Validation
//!
//! Runs once over every loaded specification after priming and collects
//! every convention violation it finds. Validators never stop at the first
//! failure; the caller decides whether a non-empty report is fatal.
//!
//! | Validator                    | Reports                                     |
//! |------------------------------|---------------------------------------------|
//! | `OrphanedMethodsValidator`   | supporting methods no member claimed        |
//! | `ConflictingFacetsValidator` | choices and auto-complete on one property   |
//! | `OverloadedActionsValidator` | two actions sharing a name                  |
//! | `MemberTypesValidator`       | members typed by unintrospectable types     |
//! | `ActionChoicesShapeValidator`| choices methods that cannot hold slots      |
//! | `LogicalTypeNameValidator`   | concrete types sharing a logical type name  |

mod members;
mod naming;
mod orphans;

pub use members::{
    ActionChoicesShapeValidator, ConflictingFacetsValidator, MemberTypesValidator,
    OverloadedActionsValidator,
};
pub use naming::LogicalTypeNameValidator;
pub use orphans::OrphanedMethodsValidator;

use crate::Identifier;
use crate::config::ValidationConfig;
use crate::loader::SpecificationLoader;
use crate::spec::ObjectSpecification;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// FAILURES
// =============================================================================

/// One convention violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub origin: Identifier,
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.message)
    }
}

/// Every violation found by one pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationFailures(pub(crate) Vec<ValidationFailure>);

impl ValidationFailures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, origin: Identifier, message: impl Into<String>) {
        self.0.push(ValidationFailure {
            origin,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.0.iter()
    }

    /// Failure messages, rendered with their origin.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

// =============================================================================
// VALIDATORS
// =============================================================================

/// Everything a validator may inspect.
pub struct ValidationContext<'a> {
    loader: &'a SpecificationLoader,
    specifications: Vec<Arc<ObjectSpecification>>,
}

impl<'a> ValidationContext<'a> {
    /// Snapshot the loader's published specifications.
    #[must_use]
    pub fn new(loader: &'a SpecificationLoader) -> Self {
        Self {
            loader,
            specifications: loader.all_specifications(),
        }
    }

    #[must_use]
    pub fn loader(&self) -> &'a SpecificationLoader {
        self.loader
    }

    /// Published specifications, ordered by type name.
    #[must_use]
    pub fn specifications(&self) -> &[Arc<ObjectSpecification>] {
        &self.specifications
    }

    /// Introspected specifications only.
    pub fn introspected(&self) -> impl Iterator<Item = &Arc<ObjectSpecification>> {
        self.specifications.iter().filter(|s| s.is_introspectable())
    }
}

/// A check over the whole metamodel.
pub trait MetaModelValidator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Append every violation found to `failures`.
    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures);
}

/// The validators enabled by `config`, in reporting order.
#[must_use]
pub fn default_validators(config: &ValidationConfig) -> Vec<Box<dyn MetaModelValidator>> {
    let mut validators: Vec<Box<dyn MetaModelValidator>> = Vec::new();
    if config.orphaned_methods {
        validators.push(Box::new(OrphanedMethodsValidator));
    }
    validators.push(Box::new(ConflictingFacetsValidator));
    validators.push(Box::new(OverloadedActionsValidator));
    validators.push(Box::new(MemberTypesValidator));
    validators.push(Box::new(ActionChoicesShapeValidator));
    if config.unique_logical_type_names {
        validators.push(Box::new(LogicalTypeNameValidator));
    }
    validators
}

/// Run `validators` over everything `loader` has published.
pub fn validate_all(
    loader: &SpecificationLoader,
    validators: &[Box<dyn MetaModelValidator>],
) -> ValidationFailures {
    let ctx = ValidationContext::new(loader);
    let mut failures = ValidationFailures::new();
    for validator in validators {
        let before = failures.len();
        validator.validate(&ctx, &mut failures);
        tracing::debug!(
            validator = validator.name(),
            failures = failures.len() - before,
            "validator finished"
        );
    }
    tracing::info!(
        specifications = ctx.specifications().len(),
        failures = failures.len(),
        "metamodel validated"
    );
    failures
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeName;

    #[test]
    fn failures_render_with_origin() {
        let mut failures = ValidationFailures::new();
        failures.push(
            Identifier::member(TypeName::new("demo.Customer"), "hideNickname"),
            "orphaned",
        );
        assert_eq!(failures.len(), 1);
        assert!(failures.messages()[0].starts_with("demo.Customer#hideNickname"));
    }

    #[test]
    fn config_toggles_validators() {
        let all = default_validators(&ValidationConfig::default());
        assert_eq!(all.len(), 6);

        let config = ValidationConfig {
            orphaned_methods: false,
            unique_logical_type_names: false,
            ..ValidationConfig::default()
        };
        let names: Vec<_> = default_validators(&config).iter().map(|v| v.name()).collect();
        assert!(!names.contains(&"OrphanedMethods"));
        assert!(!names.contains(&"LogicalTypeName"));
    }
}
