//! Type-level factories.

use super::{FacetFactory, ProcessClassContext};
use crate::FeatureType;
use crate::class::{Annotation, ClassKind, Nature};
use crate::facet::{
    CssClassFacetViaMethod, DisabledObjectFacetViaMethod, DomainObjectFacet, EntityFacet,
    HiddenObjectFacetViaMethod, IconFacetViaMethod, LogicalTypeFacet, TitleFacetViaMethod,
    ValueFacet,
};
use crate::introspect::ClassMethod;
use crate::primitives::{
    CSS_CLASS_METHOD, DISABLED_METHOD, HIDDEN_METHOD, ICON_NAME_METHOD, IGNORED_METHOD_NAMES,
    TITLE_METHOD,
};
use crate::{BeanSort, MethodId};

// =============================================================================
// REMOVE IGNORED METHODS
// =============================================================================

/// Drops methods that can never be part of the metamodel: `Programmatic`,
/// static, non-public, and the universal object methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveIgnoredMethodsFactory;

impl FacetFactory for RemoveIgnoredMethodsFactory {
    fn name(&self) -> &'static str {
        "RemoveIgnoredMethods"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let removed = ctx.remover.remove_methods(&|m: &ClassMethod| {
            let d = m.descriptor();
            d.has_annotation(&Annotation::Programmatic)
                || d.is_static()
                || !d.is_public()
                || IGNORED_METHOD_NAMES.contains(&d.name())
        });
        if !removed.is_empty() {
            tracing::trace!(
                class = %ctx.class.name(),
                removed = removed.len(),
                "ignored methods removed"
            );
        }
    }
}

// =============================================================================
// DOMAIN OBJECT ANNOTATION
// =============================================================================

/// Nature, logical type name, value marker and entity facets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainObjectAnnotationFactory;

impl FacetFactory for DomainObjectAnnotationFactory {
    fn name(&self) -> &'static str {
        "DomainObjectAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let class = ctx.class;

        let nature = class.find_annotation(|a| match a {
            Annotation::DomainObject(nature) => Some(*nature),
            _ => None,
        });
        if let Some(nature) = nature {
            ctx.holder.add(DomainObjectFacet::new(ctx.core(), nature));
        }

        let logical = class.find_annotation(|a| match a {
            Annotation::LogicalTypeName(name) => Some(name.clone()),
            _ => None,
        });
        if let Some(logical) = logical {
            ctx.holder.add(LogicalTypeFacet::new(ctx.core(), logical));
        }

        if class.kind() == ClassKind::Value || class.has_annotation(&Annotation::Value) {
            ctx.holder.add(ValueFacet::new(ctx.core()));
        }

        let entity = nature == Some(Nature::Entity)
            || ctx.persistence.classify(class) == Some(BeanSort::Entity);
        if entity {
            ctx.holder
                .add(EntityFacet::new(ctx.core(), ctx.persistence.clone()));
        }
    }
}

// =============================================================================
// OBJECT SUPPORT METHODS
// =============================================================================

/// Claims `title()`, `iconName()`, `cssClass()`, `hidden()` and `disabled()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSupportMethodsFactory;

impl ObjectSupportMethodsFactory {
    fn claim_text(ctx: &mut ProcessClassContext<'_>, name: &str) -> Option<(ClassMethod, MethodId)> {
        let method = ctx
            .remover
            .claim_method(name, &|d| d.params().is_empty() && d.return_type().is_text())?;
        let id = method.id();
        Some((method, id))
    }
}

impl FacetFactory for ObjectSupportMethodsFactory {
    fn name(&self) -> &'static str {
        "ObjectSupportMethods"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        if let Some((method, id)) = Self::claim_text(ctx, TITLE_METHOD) {
            let facet = TitleFacetViaMethod::new(ctx.core().backed_by(id), method);
            ctx.holder.add(facet);
        }
        if let Some((method, id)) = Self::claim_text(ctx, ICON_NAME_METHOD) {
            let facet = IconFacetViaMethod::new(ctx.core().backed_by(id), method);
            ctx.holder.add(facet);
        }
        if let Some((method, id)) = Self::claim_text(ctx, CSS_CLASS_METHOD) {
            let facet = CssClassFacetViaMethod::new(ctx.core().backed_by(id), method);
            ctx.holder.add(facet);
        }
        if let Some((method, id)) = Self::claim_text(ctx, DISABLED_METHOD) {
            let facet = DisabledObjectFacetViaMethod::new(ctx.core().backed_by(id), method);
            ctx.holder.add(facet);
        }

        let hidden = ctx.remover.claim_method(HIDDEN_METHOD, &|d| {
            d.params().is_empty() && d.return_type().is_boolean()
        });
        if let Some(method) = hidden {
            let core = ctx.core().backed_by(method.id());
            ctx.holder.add(HiddenObjectFacetViaMethod::new(core, method));
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
    use crate::facet::{Facet, FacetHolder, HasFacets};
    use crate::introspect::{MethodPool, MethodRemover};
    use crate::persistence::{NoPersistence, PersistenceProvider};
    use crate::{Identifier, MetamodelConfig, TypeRef};
    use std::sync::Arc;

    fn run(factory: &dyn FacetFactory, class: &ClassDescriptor) -> (FacetHolder, MethodPool) {
        let registry = ClassRegistry::new();
        let mut pool = MethodPool::for_class(class, &registry);
        let holder = FacetHolder::new(Identifier::class(class.name().clone()));
        let config = MetamodelConfig::default();
        let persistence: Arc<dyn PersistenceProvider> = Arc::new(NoPersistence);
        let mut ctx = ProcessClassContext {
            class,
            holder: &holder,
            remover: &mut pool,
            config: &config,
            persistence: &persistence,
        };
        factory.process_class(&mut ctx);
        (holder, pool)
    }

    #[test]
    fn ignored_methods_are_removed() {
        let class = ClassDescriptor::new("demo.Customer")
            .method(MethodDescriptor::new("toString").returns(TypeRef::text()))
            .method(MethodDescriptor::new("helper").private())
            .method(MethodDescriptor::new("create").static_method())
            .method(MethodDescriptor::new("audit").annotate(Annotation::Programmatic))
            .method(MethodDescriptor::new("placeOrder"));

        let (_, pool) = run(&RemoveIgnoredMethodsFactory, &class);
        let names: Vec<_> = pool.iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["placeOrder"]);
    }

    #[test]
    fn domain_object_annotation_yields_nature_and_entity() {
        let class = ClassDescriptor::new("demo.Customer")
            .annotate(Annotation::DomainObject(Nature::Entity))
            .annotate(Annotation::LogicalTypeName("sales.Customer".into()));

        let (holder, _) = run(&DomainObjectAnnotationFactory, &class);
        let nature = holder.get::<DomainObjectFacet>().expect("nature");
        assert_eq!(nature.nature(), Nature::Entity);
        assert!(holder.contains::<EntityFacet>());
        let logical = holder.get::<LogicalTypeFacet>().expect("logical");
        assert_eq!(logical.logical_type_name(), "sales.Customer");
    }

    #[test]
    fn object_support_methods_are_claimed() {
        let class = ClassDescriptor::new("demo.Customer")
            .method(MethodDescriptor::new("title").returns(TypeRef::text()))
            .method(MethodDescriptor::new("hidden").returns(TypeRef::boolean()))
            .method(MethodDescriptor::new("iconName").returns(TypeRef::int()));

        let (holder, pool) = run(&ObjectSupportMethodsFactory, &class);
        assert!(holder.contains::<TitleFacetViaMethod>());
        assert!(holder.contains::<HiddenObjectFacetViaMethod>());
        assert!(!holder.contains::<IconFacetViaMethod>());
        assert!(pool.find_method("iconName", &|_| true).is_some());
        assert!(pool.find_method("title", &|_| true).is_none());

        struct Holder(FacetHolder);
        impl HasFacets for Holder {
            fn facet_holder(&self) -> &FacetHolder {
                &self.0
            }
        }
        let title = Holder(holder).get_facet::<TitleFacetViaMethod>().expect("title");
        assert_eq!(title.backing_methods().len(), 1);
    }
}
