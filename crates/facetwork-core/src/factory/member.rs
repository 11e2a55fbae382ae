//! Property, collection and member-level supporting-method factories.
//!
//! Supporting methods pair with their member by the capitalized member id:
//! `getName` pairs with `setName`, `choicesName`, `autoCompleteName`,
//! `defaultName`, `hideName`, `disableName` and `validateName`. A method that
//! does not pair stays in the pool.

use super::{FacetFactory, ProcessMethodContext};
use crate::FeatureType;
use crate::facet::{
    AccessorFacetViaMethod, ActionValidateFacetViaMethod, DisableForContextFacetViaMethod,
    HideForContextFacetViaMethod, PropertyAutoCompleteFacetViaMethod,
    PropertyChoicesFacetViaMethod, PropertyDefaultFacetViaMethod, PropertySetterFacetViaMethod,
    PropertyValidateFacetViaMethod,
};
use crate::introspect::naming::supporting_method_name;
use crate::primitives::{
    AUTO_COMPLETE_PREFIX, CHOICES_PREFIX, DEFAULT_PREFIX, DISABLE_PREFIX, HIDE_PREFIX, SET_PREFIX,
    VALIDATE_PREFIX,
};

// =============================================================================
// ACCESSOR / SETTER
// =============================================================================

/// Wraps the accessor of a property or collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAccessorFactory;

impl FacetFactory for PropertyAccessorFactory {
    fn name(&self) -> &'static str {
        "PropertyAccessor"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::ASSOCIATIONS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let core = ctx.core().backed_by(ctx.method.id());
        ctx.holder
            .add(AccessorFacetViaMethod::new(core, ctx.method.clone()));
    }
}

/// Claims `setX(value)` for property or collection `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertySetterFactory;

impl FacetFactory for PropertySetterFactory {
    fn name(&self) -> &'static str {
        "PropertySetter"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property, FeatureType::Collection]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(SET_PREFIX, ctx.member_id);
        let property_type = ctx.method.descriptor().return_type().clone();
        let registry = ctx.registry;
        let setter = ctx.remover.claim_method(&name, &|d| {
            d.return_type().is_void()
                && d.params().len() == 1
                && d.params()
                    .first()
                    .is_some_and(|p| registry.is_assignable(&property_type, &p.ty))
        });
        // A collection setter is claimed but not exposed; collections are
        // filled through their collection facet.
        if let Some(setter) = setter.filter(|_| ctx.feature_type == FeatureType::Property) {
            let core = ctx.core().backed_by(setter.id());
            ctx.holder.add(PropertySetterFacetViaMethod::new(core, setter));
        }
    }
}

// =============================================================================
// CHOICES / AUTO COMPLETE / DEFAULT
// =============================================================================

/// Claims `choicesX()` returning a collection, for property `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberChoicesFactory;

impl FacetFactory for MemberChoicesFactory {
    fn name(&self) -> &'static str {
        "MemberChoicesViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[CHOICES_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(CHOICES_PREFIX, ctx.member_id);
        let choices = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && d.return_type().is_collection()
        });
        if let Some(choices) = choices {
            let core = ctx.core().backed_by(choices.id());
            ctx.holder
                .add(PropertyChoicesFacetViaMethod::new(core, choices));
        }
    }
}

/// Claims `autoCompleteX(String)` returning a collection, for property `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberAutoCompleteFactory;

impl FacetFactory for MemberAutoCompleteFactory {
    fn name(&self) -> &'static str {
        "MemberAutoCompleteViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[AUTO_COMPLETE_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(AUTO_COMPLETE_PREFIX, ctx.member_id);
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().len() == 1
                && d.params().first().is_some_and(|p| p.ty.is_text())
                && d.return_type().is_collection()
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            let min_length = ctx.config.auto_complete_min_length;
            ctx.holder.add(PropertyAutoCompleteFacetViaMethod::new(
                core, method, min_length,
            ));
        }
    }
}

/// Claims `defaultX()` returning the property type, for property `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberDefaultFactory;

impl FacetFactory for MemberDefaultFactory {
    fn name(&self) -> &'static str {
        "MemberDefaultViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[DEFAULT_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(DEFAULT_PREFIX, ctx.member_id);
        let property_type = ctx.method.descriptor().return_type().clone();
        let registry = ctx.registry;
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && registry.is_assignable(d.return_type(), &property_type)
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder
                .add(PropertyDefaultFacetViaMethod::new(core, method));
        }
    }
}

// =============================================================================
// HIDE / DISABLE
// =============================================================================

/// Claims `hideX()` returning `bool`, for any member `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HideForContextFactory;

impl FacetFactory for HideForContextFactory {
    fn name(&self) -> &'static str {
        "HideForContextViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::MEMBERS
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[HIDE_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(HIDE_PREFIX, ctx.member_id);
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && d.return_type().is_boolean()
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder
                .add(HideForContextFacetViaMethod::new(core, method));
        }
    }
}

/// Claims `disableX()` returning a reason, for any member `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisableForContextFactory;

impl FacetFactory for DisableForContextFactory {
    fn name(&self) -> &'static str {
        "DisableForContextViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::MEMBERS
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[DISABLE_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(DISABLE_PREFIX, ctx.member_id);
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && d.return_type().is_text()
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder
                .add(DisableForContextFacetViaMethod::new(core, method));
        }
    }
}

// =============================================================================
// VALIDATE
// =============================================================================

/// Claims `validateX(..)` returning a reason.
///
/// For a property the single parameter must accept the property type; for
/// an action the parameters must match the action's parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateFactory;

impl FacetFactory for ValidateFactory {
    fn name(&self) -> &'static str {
        "ValidateViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property, FeatureType::Action]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[VALIDATE_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let name = supporting_method_name(VALIDATE_PREFIX, ctx.member_id);
        let expected = match ctx.feature_type {
            FeatureType::Property => vec![ctx.method.descriptor().return_type().clone()],
            _ => ctx.method.descriptor().param_types(),
        };
        let registry = ctx.registry;
        let method = ctx.remover.claim_method(&name, &|d| {
            d.return_type().is_text()
                && d.params().len() == expected.len()
                && d.params()
                    .iter()
                    .zip(&expected)
                    .all(|(p, e)| registry.is_assignable(e, &p.ty))
        });
        let Some(method) = method else {
            return;
        };
        let core = ctx.core().backed_by(method.id());
        if ctx.feature_type == FeatureType::Property {
            ctx.holder
                .add(PropertyValidateFacetViaMethod::new(core, method));
        } else {
            ctx.holder
                .add(ActionValidateFacetViaMethod::new(core, method));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
