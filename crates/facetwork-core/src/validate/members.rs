//! Member-level validators.

use super::{MetaModelValidator, ValidationContext, ValidationFailures};
use crate::facet::{
    ActionChoicesFacetViaMethod, HasFacets, PropertyAutoCompleteFacetViaMethod,
    PropertyChoicesFacetViaMethod,
};
use crate::spec::ObjectSpecification;
use crate::{Identifier, IntrospectionOutcome, TypeRef};
use std::collections::BTreeMap;

/// Reports properties with both a choices and an auto-complete method.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictingFacetsValidator;

impl MetaModelValidator for ConflictingFacetsValidator {
    fn name(&self) -> &'static str {
        "ConflictingFacets"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures) {
        for spec in ctx.introspected() {
            for association in spec.properties() {
                if association.contains_facet::<PropertyChoicesFacetViaMethod>()
                    && association.contains_facet::<PropertyAutoCompleteFacetViaMethod>()
                {
                    failures.push(
                        association.identifier().clone(),
                        "has both choices and auto-complete; use one or the other",
                    );
                }
            }
        }
    }
}

/// Reports actions that share a name within one type.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverloadedActionsValidator;

impl MetaModelValidator for OverloadedActionsValidator {
    fn name(&self) -> &'static str {
        "OverloadedActions"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures) {
        for spec in ctx.introspected() {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for action in spec.actions() {
                *counts.entry(action.id()).or_default() += 1;
            }
            for (id, count) in counts.into_iter().filter(|(_, n)| *n > 1) {
                failures.push(
                    Identifier::member(spec.type_name().clone(), id),
                    format!("action name is overloaded {count} times; action names must be unique"),
                );
            }
        }
    }
}

/// Reports members whose declared types could not be introspected, and
/// registered domain types that failed introspection themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberTypesValidator;

impl MemberTypesValidator {
    fn check(
        ctx: &ValidationContext<'_>,
        origin: &Identifier,
        ty: &TypeRef,
        failures: &mut ValidationFailures,
    ) {
        let Some(name) = ty.leaf_type_name() else {
            return;
        };
        let spec = ctx.loader().load_specification(name);
        if let IntrospectionOutcome::Unintrospectable(reason) = spec.outcome() {
            failures.push(
                origin.clone(),
                format!("type '{name}' is not introspectable: {reason}"),
            );
        }
    }

    fn check_spec(
        ctx: &ValidationContext<'_>,
        spec: &ObjectSpecification,
        failures: &mut ValidationFailures,
    ) {
        for association in spec.associations() {
            Self::check(ctx, association.identifier(), association.declared_type(), failures);
        }
        for action in spec.actions() {
            Self::check(ctx, action.identifier(), action.return_type(), failures);
            for param in action.parameters() {
                Self::check(ctx, param.identifier(), param.param_type(), failures);
            }
        }
    }
}

impl MetaModelValidator for MemberTypesValidator {
    fn name(&self) -> &'static str {
        "MemberTypes"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures) {
        let registry = ctx.loader().registry();
        for spec in ctx.specifications() {
            match spec.outcome() {
                IntrospectionOutcome::Complete => Self::check_spec(ctx, spec, failures),
                IntrospectionOutcome::Unintrospectable(reason)
                    if registry.contains(spec.type_name()) =>
                {
                    failures.push(
                        Identifier::class(spec.type_name().clone()),
                        format!("type could not be introspected: {reason}"),
                    );
                }
                IntrospectionOutcome::Unintrospectable(_) => {}
            }
        }
    }
}

/// Reports action choices methods whose declared return type cannot hold
/// one slot per parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionChoicesShapeValidator;

impl MetaModelValidator for ActionChoicesShapeValidator {
    fn name(&self) -> &'static str {
        "ActionChoicesShape"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures) {
        for spec in ctx.introspected() {
            for action in spec.actions() {
                let Some(facet) = action.get_facet::<ActionChoicesFacetViaMethod>() else {
                    continue;
                };
                let returns = facet.method().descriptor().return_type();
                if !returns.is_collection() && *returns != TypeRef::object() {
                    failures.push(
                        action.identifier().clone(),
                        format!(
                            "'{}' returns {returns}, which cannot hold one slot per parameter",
                            facet.method().name()
                        ),
                    );
                }
            }
        }
    }
}
