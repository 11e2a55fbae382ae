//! Action and action-parameter factories.
//!
//! Action-level supporting methods are parameterless and return one slot per
//! parameter (`choicesPlaceOrder()`, `defaultPlaceOrder()`). Parameter-level
//! supporting methods carry the parameter index after the prefix
//! (`choices0PlaceOrder()`, `default1PlaceOrder()`, `validate0PlaceOrder(p)`).

use super::{FacetFactory, ProcessMethodContext, ProcessParameterContext};
use crate::FeatureType;
use crate::class::{Annotation, Semantics};
use crate::facet::{
    ActionChoicesFacetViaMethod, ActionDefaultsFacetViaMethod, ActionInvocationFacetViaMethod,
    ActionParameterChoicesFacetViaMethod, ActionParameterDefaultFacetViaMethod,
    ActionParameterValidateFacetViaMethod, ActionSemanticsFacet,
};
use crate::introspect::naming::{parameter_method_name, supporting_method_name};
use crate::primitives::{CHOICES_PREFIX, DEFAULT_PREFIX, VALIDATE_PREFIX};

// =============================================================================
// INVOCATION
// =============================================================================

/// Wraps the action method and records its semantics.
///
/// Without an `ActionSemantics` annotation the action is treated as
/// non-idempotent, recorded as a derived facet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionInvocationFactory;

impl FacetFactory for ActionInvocationFactory {
    fn name(&self) -> &'static str {
        "ActionInvocation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Action]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let core = ctx.core().backed_by(ctx.method.id());
        ctx.holder
            .add(ActionInvocationFacetViaMethod::new(core, ctx.method.clone()));

        let declared = ctx
            .method
            .descriptor()
            .annotations()
            .iter()
            .find_map(|a| match a {
                Annotation::ActionSemantics(semantics) => Some(*semantics),
                _ => None,
            });
        let facet = match declared {
            Some(semantics) => ActionSemanticsFacet::new(ctx.core(), semantics),
            None => ActionSemanticsFacet::new(ctx.core().derived(), Semantics::NonIdempotent),
        };
        ctx.holder.add(facet);
    }
}

// =============================================================================
// ACTION-LEVEL SUPPORTING METHODS
// =============================================================================

/// Claims `choicesX()` returning per-parameter slots, for action `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionChoicesFactory;

impl FacetFactory for ActionChoicesFactory {
    fn name(&self) -> &'static str {
        "ActionChoicesViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Action]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[CHOICES_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let param_count = ctx.method.descriptor().params().len();
        if param_count == 0 {
            return;
        }
        let name = supporting_method_name(CHOICES_PREFIX, ctx.member_id);
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && !d.return_type().is_void()
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder.add(ActionChoicesFacetViaMethod::new(
                core,
                method,
                ctx.member_id,
                param_count,
            ));
        }
    }
}

/// Claims `defaultX()` returning per-parameter slots, for action `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDefaultsFactory;

impl FacetFactory for ActionDefaultsFactory {
    fn name(&self) -> &'static str {
        "ActionDefaultsViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Action]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[DEFAULT_PREFIX]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let param_count = ctx.method.descriptor().params().len();
        if param_count == 0 {
            return;
        }
        let name = supporting_method_name(DEFAULT_PREFIX, ctx.member_id);
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && !d.return_type().is_void()
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder.add(ActionDefaultsFacetViaMethod::new(
                core,
                method,
                ctx.member_id,
                param_count,
            ));
        }
    }
}

// =============================================================================
// PARAMETER-LEVEL SUPPORTING METHODS
// =============================================================================

/// Claims `choicesNX()` returning a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterChoicesFactory;

impl FacetFactory for ParameterChoicesFactory {
    fn name(&self) -> &'static str {
        "ParameterChoicesViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Parameter]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[CHOICES_PREFIX]
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        let name = parameter_method_name(CHOICES_PREFIX, ctx.index, ctx.action_id);
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && d.return_type().is_collection()
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder
                .add(ActionParameterChoicesFacetViaMethod::new(core, method));
        }
    }
}

/// Claims `defaultNX()` returning the parameter type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterDefaultFactory;

impl FacetFactory for ParameterDefaultFactory {
    fn name(&self) -> &'static str {
        "ParameterDefaultViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Parameter]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[DEFAULT_PREFIX]
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        let name = parameter_method_name(DEFAULT_PREFIX, ctx.index, ctx.action_id);
        let param_type = ctx.param.ty.clone();
        let registry = ctx.registry;
        let method = ctx.remover.claim_method(&name, &|d| {
            d.params().is_empty() && registry.is_assignable(d.return_type(), &param_type)
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder
                .add(ActionParameterDefaultFacetViaMethod::new(core, method));
        }
    }
}

/// Claims `validateNX(value)` returning a reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterValidateFactory;

impl FacetFactory for ParameterValidateFactory {
    fn name(&self) -> &'static str {
        "ParameterValidateViaMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Parameter]
    }

    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[VALIDATE_PREFIX]
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        let name = parameter_method_name(VALIDATE_PREFIX, ctx.index, ctx.action_id);
        let param_type = ctx.param.ty.clone();
        let registry = ctx.registry;
        let method = ctx.remover.claim_method(&name, &|d| {
            d.return_type().is_text()
                && d.params().len() == 1
                && d.params()
                    .first()
                    .is_some_and(|p| registry.is_assignable(&param_type, &p.ty))
        });
        if let Some(method) = method {
            let core = ctx.core().backed_by(method.id());
            ctx.holder
                .add(ActionParameterValidateFacetViaMethod::new(core, method));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassRegistry, MethodDescriptor};
    use crate::facet::{Facet, FacetHolder};
    use crate::introspect::{ClassMethod, MethodPool, MethodRemover};
    use crate::{Identifier, MetamodelConfig, TypeRef};

    fn customer() -> ClassDescriptor {
        ClassDescriptor::new("demo.Customer")
            .method(
                MethodDescriptor::new("placeOrder")
                    .param(TypeRef::text())
                    .param(TypeRef::int())
                    .annotate(Annotation::ActionSemantics(Semantics::Idempotent)),
            )
            .method(
                MethodDescriptor::new("choicesPlaceOrder")
                    .returns(TypeRef::list(TypeRef::list(TypeRef::object()))),
            )
            .method(MethodDescriptor::new("choices0PlaceOrder").returns(TypeRef::list(TypeRef::text())))
            .method(MethodDescriptor::new("default1PlaceOrder").returns(TypeRef::int()))
            .method(
                MethodDescriptor::new("validate1PlaceOrder")
                    .param(TypeRef::int())
                    .returns(TypeRef::text()),
            )
    }

    struct Fixture {
        class: ClassDescriptor,
        pool: MethodPool,
        action: ClassMethod,
        config: MetamodelConfig,
    }

    fn fixture() -> Fixture {
        let class = customer();
        let mut pool = MethodPool::for_class(&class, &ClassRegistry::new());
        let action = pool.claim_method("placeOrder", &|_| true).expect("action");
        Fixture {
            class,
            pool,
            action,
            config: MetamodelConfig::default(),
        }
    }

    fn process_action(fixture: &mut Fixture, factory: &dyn FacetFactory) -> FacetHolder {
        let holder = FacetHolder::new(Identifier::member(
            fixture.class.name().clone(),
            "placeOrder",
        ));
        let registry = ClassRegistry::new();
        let mut ctx = ProcessMethodContext {
            class: &fixture.class,
            feature_type: FeatureType::Action,
            member_id: "placeOrder",
            method: &fixture.action,
            holder: &holder,
            remover: &mut fixture.pool,
            registry: &registry,
            config: &fixture.config,
        };
        factory.process_method(&mut ctx);
        holder
    }

    fn process_param(fixture: &mut Fixture, factory: &dyn FacetFactory, index: usize) -> FacetHolder {
        let holder = FacetHolder::new(Identifier::parameter(
            fixture.class.name().clone(),
            "placeOrder",
            index,
        ));
        let param = fixture
            .action
            .descriptor()
            .params()
            .get(index)
            .expect("param")
            .clone();
        let registry = ClassRegistry::new();
        let mut ctx = ProcessParameterContext {
            class: &fixture.class,
            action_id: "placeOrder",
            action: &fixture.action,
            index,
            param: &param,
            holder: &holder,
            remover: &mut fixture.pool,
            registry: &registry,
            config: &fixture.config,
        };
        factory.process_param(&mut ctx);
        holder
    }

    #[test]
    fn invocation_records_declared_semantics() {
        let mut fixture = fixture();
        let holder = process_action(&mut fixture, &ActionInvocationFactory);
        assert!(holder.contains::<ActionInvocationFacetViaMethod>());
        let semantics = holder.get::<ActionSemanticsFacet>().expect("semantics");
        assert_eq!(semantics.semantics(), Semantics::Idempotent);
        assert!(!semantics.is_derived());
    }

    #[test]
    fn action_choices_are_claimed() {
        let mut fixture = fixture();
        let holder = process_action(&mut fixture, &ActionChoicesFactory);
        assert!(holder.contains::<ActionChoicesFacetViaMethod>());
        assert!(fixture.pool.find_method("choicesPlaceOrder", &|_| true).is_none());
    }

    #[test]
    fn parameter_methods_pair_by_index() {
        let mut fixture = fixture();

        let first = process_param(&mut fixture, &ParameterChoicesFactory, 0);
        assert!(first.contains::<ActionParameterChoicesFacetViaMethod>());
        let first_default = process_param(&mut fixture, &ParameterDefaultFactory, 0);
        assert!(!first_default.contains::<ActionParameterDefaultFacetViaMethod>());

        let second = process_param(&mut fixture, &ParameterDefaultFactory, 1);
        assert!(second.contains::<ActionParameterDefaultFacetViaMethod>());
        let second_validate = process_param(&mut fixture, &ParameterValidateFactory, 1);
        assert!(second_validate.contains::<ActionParameterValidateFacetViaMethod>());
    }
}
