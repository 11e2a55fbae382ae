//! Two-phase introspection of a single type.
//!
//! Phase one resolves the type hierarchy and the type-level facets, which
//! fixes the bean sort. Phase two runs only for sorts that carry members:
//! associations first, then actions and their parameters, then whatever
//! supporting methods are left over.

use crate::class::{Annotation, ClassDescriptor, ClassKind, ClassRegistry, Nature};
use crate::config::IntrospectionPolicy;
use crate::facet::{
    DomainObjectFacet, FacetHolder, HasFacets, LogicalTypeFacet, MemberOrderFacet, TypeOfFacet,
};
use crate::factory::{ProcessClassContext, ProcessMethodContext, ProcessParameterContext};
use crate::introspect::{ClassMethod, MethodKind, MethodPool, MethodRemover, classify};
use crate::loader::{LoadSession, SpecificationLoader};
use crate::spec::{
    AssociationKind, ObjectAction, ObjectActionParameter, ObjectAssociation, ObjectSpecification,
    SpecParts,
};
use crate::{BeanSort, FeatureType, Identifier, MethodId, TypeName, TypeRef};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Build the specification of `type_name`.
///
/// Never fails: anything that prevents introspection is recorded on the
/// returned spec as an unintrospectable outcome.
pub(crate) fn introspect(
    loader: &SpecificationLoader,
    type_name: &TypeName,
    session: &mut LoadSession,
) -> ObjectSpecification {
    let Some(class) = loader.registry().get(type_name) else {
        tracing::warn!(type_name = %type_name, "type is not registered");
        return ObjectSpecification::unintrospectable(
            type_name.clone(),
            BeanSort::Unknown,
            "type is not registered",
        );
    };

    // Phase one: hierarchy and type-level facets.
    let parent = match resolve_supertype(loader, &class, session) {
        Ok(parent) => parent,
        Err(reason) => {
            tracing::warn!(type_name = %type_name, reason = %reason, "type is not introspectable");
            return ObjectSpecification::unintrospectable(
                type_name.clone(),
                BeanSort::Unknown,
                reason,
            );
        }
    };

    let processor = loader.processor();
    let mut pool = MethodPool::for_class(&class, loader.registry());
    let holder = FacetHolder::new(Identifier::class(type_name.clone()));
    let mut class_ctx = ProcessClassContext {
        class: &class,
        holder: &holder,
        remover: &mut pool,
        config: loader.config(),
        persistence: loader.persistence(),
    };
    processor.process_class(&mut class_ctx);

    let bean_sort = classify_bean_sort(loader, &class, &holder);
    let logical_type_name = holder
        .get::<LogicalTypeFacet>()
        .map(|f| f.logical_type_name().to_string())
        .unwrap_or_else(|| type_name.to_string());
    let element_type = match class.kind() {
        ClassKind::Collection(_) => Some(
            holder
                .get::<TypeOfFacet>()
                .map(|f| f.element_type().clone())
                .unwrap_or_else(TypeName::object),
        ),
        _ => None,
    };
    tracing::debug!(
        type_name = %type_name,
        bean_sort = %bean_sort,
        facets = holder.len(),
        "type hierarchy introspected"
    );

    // Phase two: members.
    let mut members = Members::default();
    if bean_sort.has_members() {
        members = introspect_members(loader, &class, &mut pool, session);
        tracing::debug!(
            type_name = %type_name,
            associations = members.associations.len(),
            actions = members.actions.len(),
            unclaimed = members.unclaimed.len(),
            "members introspected"
        );
    }

    let (supertype, ancestors) = match &parent {
        Some(parent) => {
            parent.register_subtype(type_name.clone());
            let mut ancestors = vec![parent.type_name().clone()];
            ancestors.extend(parent.ancestors().iter().cloned());
            (Some(parent.type_name().clone()), ancestors)
        }
        None => (None, Vec::new()),
    };

    ObjectSpecification::complete(SpecParts {
        type_name: type_name.clone(),
        logical_type_name,
        bean_sort,
        supertype,
        ancestors,
        element_type,
        associations: members.associations,
        actions: members.actions,
        unclaimed_methods: members.unclaimed,
        holder,
    })
}

// =============================================================================
// PHASE ONE
// =============================================================================

fn has_supertype_cycle(class: &ClassDescriptor, registry: &ClassRegistry) -> bool {
    let mut seen = BTreeSet::from([class.name().clone()]);
    let mut next = class.supertype().cloned();
    while let Some(name) = next {
        if !seen.insert(name.clone()) {
            return true;
        }
        next = registry.get(&name).and_then(|c| c.supertype().cloned());
    }
    false
}

fn resolve_supertype(
    loader: &SpecificationLoader,
    class: &ClassDescriptor,
    session: &mut LoadSession,
) -> Result<Option<Arc<ObjectSpecification>>, String> {
    let Some(supertype) = class.supertype() else {
        return Ok(None);
    };
    if has_supertype_cycle(class, loader.registry()) {
        return Err(format!("supertype cycle through '{supertype}'"));
    }
    if !loader.registry().contains(supertype) {
        return Err(format!("supertype '{supertype}' is not registered"));
    }
    let parent = loader.load_in(supertype, session);
    if !parent.is_introspectable() {
        return Err(format!("supertype '{supertype}' is not introspectable"));
    }
    Ok(Some(parent))
}

fn classify_bean_sort(
    loader: &SpecificationLoader,
    class: &ClassDescriptor,
    holder: &FacetHolder,
) -> BeanSort {
    match class.kind() {
        ClassKind::Value => return BeanSort::Value,
        ClassKind::Collection(_) => return BeanSort::Collection,
        ClassKind::Abstract | ClassKind::Interface => return BeanSort::Abstract,
        ClassKind::Concrete => {}
    }
    if class.has_annotation(&Annotation::Value) {
        return BeanSort::Value;
    }
    if let Some(sort) = loader.persistence().classify(class) {
        return sort;
    }
    match holder.get::<DomainObjectFacet>().map(|f| f.nature()) {
        Some(Nature::Entity) => BeanSort::Entity,
        Some(Nature::ViewModel) => BeanSort::ViewModel,
        Some(Nature::Bean) => BeanSort::ManagedBean,
        None => BeanSort::Unknown,
    }
}

// =============================================================================
// PHASE TWO
// =============================================================================

#[derive(Default)]
struct Members {
    associations: Vec<ObjectAssociation>,
    actions: Vec<ObjectAction>,
    unclaimed: Vec<MethodId>,
}

fn enqueue_referenced(session: &mut LoadSession, ty: &TypeRef) {
    if let Some(name) = ty.leaf_type_name() {
        session.enqueue(name);
    }
}

fn introspect_members(
    loader: &SpecificationLoader,
    class: &ClassDescriptor,
    pool: &mut MethodPool,
    session: &mut LoadSession,
) -> Members {
    let processor = loader.processor();
    let config = loader.config();
    let prefixes = processor.supporting_prefixes();
    let type_name = class.name();

    // Associations, in declaration order.
    let accessors: Vec<(String, ClassMethod)> = pool
        .iter()
        .filter_map(|m| match classify(m.descriptor(), prefixes) {
            MethodKind::Accessor(id) => Some((id, m.clone())),
            _ => None,
        })
        .collect();

    let mut associations = Vec::new();
    let mut seen_ids = BTreeSet::new();
    for (id, accessor) in accessors {
        if !seen_ids.insert(id.clone()) {
            continue;
        }
        let Some(accessor) = pool.remove_method(&accessor.id()) else {
            continue;
        };
        let declared_type = accessor.descriptor().return_type().clone();
        let (kind, feature_type) = if declared_type.is_collection() {
            (AssociationKind::Collection, FeatureType::Collection)
        } else {
            (AssociationKind::Property, FeatureType::Property)
        };
        let holder = FacetHolder::new(Identifier::member(type_name.clone(), id.as_str()));
        let mut ctx = ProcessMethodContext {
            class,
            feature_type,
            member_id: &id,
            method: &accessor,
            holder: &holder,
            remover: &mut *pool,
            registry: loader.registry(),
            config,
        };
        processor.process_method(&mut ctx);
        enqueue_referenced(session, &declared_type);
        associations.push(ObjectAssociation::new(
            id,
            kind,
            declared_type,
            accessor.id(),
            holder,
        ));
    }

    // Actions, from what the associations left behind.
    let candidates: Vec<ClassMethod> = pool
        .iter()
        .filter(|m| {
            let kind = classify(m.descriptor(), prefixes);
            let annotated = m.descriptor().has_annotation(&Annotation::Action);
            match config.introspection_policy {
                IntrospectionPolicy::AnnotationOptional => {
                    kind == MethodKind::ActionCandidate
                        || (annotated && kind != MethodKind::Ignored)
                }
                IntrospectionPolicy::AnnotationRequired => {
                    annotated && kind != MethodKind::Ignored
                }
            }
        })
        .cloned()
        .collect();

    let mut actions = Vec::new();
    for candidate in candidates {
        let Some(method) = pool.remove_method(&candidate.id()) else {
            continue;
        };
        let action_id = method.name().to_string();
        let holder = FacetHolder::new(Identifier::member(type_name.clone(), action_id.as_str()));
        let mut ctx = ProcessMethodContext {
            class,
            feature_type: FeatureType::Action,
            member_id: &action_id,
            method: &method,
            holder: &holder,
            remover: &mut *pool,
            registry: loader.registry(),
            config,
        };
        processor.process_method(&mut ctx);

        let mut parameters = Vec::new();
        for (index, param) in method.descriptor().params().iter().enumerate() {
            let param_holder = FacetHolder::new(Identifier::parameter(
                type_name.clone(),
                action_id.as_str(),
                index,
            ));
            let mut ctx = ProcessParameterContext {
                class,
                action_id: &action_id,
                action: &method,
                index,
                param,
                holder: &param_holder,
                remover: &mut *pool,
                registry: loader.registry(),
                config,
            };
            processor.process_param(&mut ctx);
            enqueue_referenced(session, &param.ty);
            parameters.push(ObjectActionParameter::new(
                index,
                param.name.clone(),
                param.ty.clone(),
                param_holder,
            ));
        }

        let return_type = method.descriptor().return_type().clone();
        enqueue_referenced(session, &return_type);
        actions.push(ObjectAction::new(
            action_id,
            method.id(),
            return_type,
            parameters,
            holder,
        ));
    }

    // Supporting methods and mutators only exist to serve a member; left
    // over, they point at a misspelt member name.
    let unclaimed = pool
        .iter()
        .filter(|m| {
            matches!(
                classify(m.descriptor(), prefixes),
                MethodKind::Supporting(_) | MethodKind::Mutator(_)
            )
        })
        .map(ClassMethod::id)
        .collect();

    sort_by_member_order(&mut associations);
    sort_by_member_order(&mut actions);

    Members {
        associations,
        actions,
        unclaimed,
    }
}

/// Stable sort: members with a `MemberOrder` sequence first, by sequence,
/// then the rest in declaration order.
fn sort_by_member_order<M: HasFacets>(members: &mut [M]) {
    members.sort_by_cached_key(|m| match m.get_facet::<MemberOrderFacet>() {
        Some(order) => (false, order.sequence_key()),
        None => (true, Vec::new()),
    });
}

// =============================================================================
// TESTS
// =============================================================================
