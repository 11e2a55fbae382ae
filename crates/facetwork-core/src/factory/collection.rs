//! Collection type inspection.

use super::{FacetFactory, ProcessClassContext, ProcessMethodContext};
use crate::FeatureType;
use crate::class::ClassKind;
use crate::facet::{CollectionFacet, TypeOfFacet};
use crate::{TypeName, TypeRef};

/// Selects the collection strategy for collection types, collection members
/// and actions returning a collection, and records the element type.
///
/// Built-in collection types have `Object` elements; declared collections
/// use their declared element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionTypeInspectionFactory;

fn element_type_of(ty: &TypeRef) -> TypeName {
    ty.element()
        .and_then(TypeRef::raw_type_name)
        .unwrap_or_else(TypeName::object)
}

impl FacetFactory for CollectionTypeInspectionFactory {
    fn name(&self) -> &'static str {
        "CollectionTypeInspection"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Object, FeatureType::Collection, FeatureType::Action]
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        if let ClassKind::Collection(semantics) = ctx.class.kind() {
            ctx.holder.add(CollectionFacet::new(ctx.core(), semantics));
            ctx.holder
                .add(TypeOfFacet::new(ctx.core().derived(), TypeName::object()));
        }
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let returns = ctx.method.descriptor().return_type();
        let Some(kind) = returns.collection_kind() else {
            return;
        };
        let element = element_type_of(returns);
        ctx.holder
            .add(CollectionFacet::new(ctx.core(), kind.semantics()));
        ctx.holder.add(TypeOfFacet::new(ctx.core(), element));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassRegistry, MethodDescriptor};
    use crate::facet::{Facet, FacetHolder};
    use crate::introspect::{ClassMethod, MethodPool};
    use crate::persistence::{NoPersistence, PersistenceProvider};
    use crate::{CollectionSemantics, Identifier, MetamodelConfig};
    use std::sync::Arc;

    #[test]
    fn builtin_collection_type_gets_object_elements() {
        let registry = ClassRegistry::new();
        let class = registry
            .get(&TypeName::new(crate::primitives::LIST_TYPE))
            .expect("builtin list");
        let mut pool = MethodPool::for_class(&class, &registry);
        let holder = FacetHolder::new(Identifier::class(class.name().clone()));
        let config = MetamodelConfig::default();
        let persistence: Arc<dyn PersistenceProvider> = Arc::new(NoPersistence);
        let mut ctx = ProcessClassContext {
            class: &class,
            holder: &holder,
            remover: &mut pool,
            config: &config,
            persistence: &persistence,
        };
        CollectionTypeInspectionFactory.process_class(&mut ctx);

        let facet = holder.get::<CollectionFacet>().expect("collection");
        assert_eq!(facet.semantics(), CollectionSemantics::List);
        let type_of = holder.get::<TypeOfFacet>().expect("type of");
        assert!(type_of.element_type().is_object());
        assert!(type_of.is_derived());
    }

    #[test]
    fn collection_member_records_element_type() {
        let class = ClassDescriptor::new("demo.Customer");
        let mut pool = MethodPool::for_class(&class, &ClassRegistry::new());
        let accessor = ClassMethod::new(
            class.name().clone(),
            Arc::new(
                MethodDescriptor::new("getOrders")
                    .returns(TypeRef::set(TypeRef::class("demo.Order"))),
            ),
        );
        let holder = FacetHolder::new(Identifier::member(class.name().clone(), "orders"));
        let config = MetamodelConfig::default();
        let registry = ClassRegistry::new();
        let mut ctx = ProcessMethodContext {
            class: &class,
            feature_type: FeatureType::Collection,
            member_id: "orders",
            method: &accessor,
            holder: &holder,
            remover: &mut pool,
            registry: &registry,
            config: &config,
        };
        CollectionTypeInspectionFactory.process_method(&mut ctx);

        let facet = holder.get::<CollectionFacet>().expect("collection");
        assert_eq!(facet.semantics(), CollectionSemantics::Set);
        let type_of = holder.get::<TypeOfFacet>().expect("type of");
        assert_eq!(type_of.element_type().as_str(), "demo.Order");
    }
}
