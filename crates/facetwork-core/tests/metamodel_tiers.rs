//! # Metamodel Tier Tests (M0-M4)
//!
//! If ANY tier fails, the metamodel cannot be trusted.
//!
//! ## Tiers
//! - M0: Cache Identity
//! - M1: Facet Holder Semantics
//! - M2: Collection Strategies
//! - M3: Inherited Facet Lookup
//! - M4: Supporting Method Invocation

#![allow(clippy::unwrap_used, clippy::panic)]

use facetwork_core::facet::{
    ActionChoicesFacetViaMethod, CollectionFacet, DescribedAsFacet, FacetCore, NamedFacet,
    PropertyChoicesFacetViaMethod,
};
use facetwork_core::{
    Annotation, ClassDescriptor, ClassRegistry, FacetHolder, HasFacets, Identifier,
    InteractionContext, ManagedObject, MetaModelContext, MetamodelConfig, MetamodelError,
    MethodDescriptor, Pojo, StandaloneList, TypeName, TypeRef, Value,
};
use std::sync::Arc;

#[derive(Debug)]
struct Customer;

#[derive(Debug)]
struct Order;

fn sales_registry() -> ClassRegistry {
    ClassRegistry::new()
        .with(
            ClassDescriptor::new("sales.Party")
                .abstract_class()
                .annotate(Annotation::DescribedAs("Someone we trade with".into()))
                .annotate(Annotation::Named("Trading Party".into())),
        )
        .and_then(|r| {
            r.with(
                ClassDescriptor::new("sales.Customer")
                    .extends("sales.Party")
                    .annotate(Annotation::Named("Customer".into()))
                    .method(MethodDescriptor::getter::<Customer, _>(
                        "name",
                        TypeRef::text(),
                        |_| Value::text("Ada"),
                    ))
                    .method(
                        MethodDescriptor::new("choicesName")
                            .returns(TypeRef::list(TypeRef::text()))
                            .invoke_on(|_: &Customer, _| Ok(Value::list(["Ada", "Grace", "Alan"]))),
                    )
                    .method(
                        MethodDescriptor::new("getOrders")
                            .returns(TypeRef::list(TypeRef::class("sales.Order"))),
                    )
                    .method(
                        MethodDescriptor::new("placeOrder")
                            .param(TypeRef::text())
                            .param(TypeRef::int())
                            .returns(TypeRef::class("sales.Order")),
                    )
                    .method(
                        MethodDescriptor::new("choicesPlaceOrder")
                            .returns(TypeRef::list(TypeRef::object()))
                            .invoke_on(|_: &Customer, _| {
                                Ok(Value::list([
                                    Value::list(["tea"]),
                                    Value::list([1_i64, 2]),
                                    Value::list(["extra"]),
                                ]))
                            }),
                    ),
            )
        })
        .and_then(|r| {
            r.with(
                ClassDescriptor::new("sales.Order").method(
                    MethodDescriptor::new("getCustomer").returns(TypeRef::class("sales.Customer")),
                ),
            )
        })
        .expect("registry")
}

fn context() -> MetaModelContext {
    MetaModelContext::builder(sales_registry()).build()
}

fn customer() -> Pojo {
    Pojo::new("sales.Customer", Customer)
}

// =============================================================================
// TIER M0: CACHE IDENTITY
// =============================================================================

mod m0_cache_identity {
    use super::*;

    /// M0.1: Loading a type twice returns the identical instance.
    #[test]
    fn repeated_load_returns_same_instance() {
        let ctx = context();
        let name = TypeName::new("sales.Customer");

        let first = ctx.specification(&name);
        let second = ctx.specification(&name);

        assert!(Arc::ptr_eq(&first, &second));
    }

    /// M0.2: Mutually referencing types both end up complete.
    #[test]
    fn cyclic_member_types_resolve() {
        let ctx = context();
        let customer = ctx.specification(&TypeName::new("sales.Customer"));
        let order = ctx.specification(&TypeName::new("sales.Order"));

        assert!(customer.is_introspectable());
        assert!(order.is_introspectable());
        assert!(order.association("customer").is_some());
        assert!(Arc::ptr_eq(
            &customer,
            &ctx.specification(&TypeName::new("sales.Customer"))
        ));
    }

    /// M0.3: Two threads loading concurrently cause one introspection.
    #[test]
    fn concurrent_first_load_introspects_once() {
        let ctx = context();
        let name = TypeName::new("sales.Customer");
        let barrier = std::sync::Barrier::new(2);

        let (a, b) = std::thread::scope(|s| {
            let load = || {
                barrier.wait();
                ctx.specification(&name)
            };
            let a = s.spawn(load);
            let b = s.spawn(load);
            (a.join().expect("thread a"), b.join().expect("thread b"))
        });

        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_introspectable());
        // Every introspection publishes exactly one cache entry.
        assert_eq!(
            ctx.loader().introspection_count(),
            ctx.loader().all_specifications().len()
        );
    }

    /// M0.4: Invalidation yields a fresh instance on the next load.
    #[test]
    fn invalidation_forces_reintrospection() {
        let ctx = context();
        let name = TypeName::new("sales.Party");
        let party = ctx.specification(&name);
        ctx.specification(&TypeName::new("sales.Customer"));

        assert_eq!(ctx.invalidate(&name), 2);
        assert!(!Arc::ptr_eq(&party, &ctx.specification(&name)));
    }
}

// =============================================================================
// TIER M1: FACET HOLDER SEMANTICS
// =============================================================================

mod m1_facet_holder {
    use super::*;

    /// M1.1: Adding a facet type twice keeps only the latest.
    #[test]
    fn facet_replaced_not_accumulated() {
        let id = Identifier::class(TypeName::new("sales.Customer"));
        let holder = FacetHolder::new(id.clone());

        holder.add(NamedFacet::new(FacetCore::new(id.clone()), "First"));
        holder.add(NamedFacet::new(FacetCore::new(id), "Second"));

        assert_eq!(holder.len(), 1);
        assert_eq!(holder.get::<NamedFacet>().expect("named").name(), "Second");
    }

    /// M1.2: A non-replaceable facet survives later additions.
    #[test]
    fn non_replaceable_facet_kept() {
        let id = Identifier::class(TypeName::new("sales.Customer"));
        let holder = FacetHolder::new(id.clone());

        holder.add(NamedFacet::new(
            FacetCore::new(id.clone()).non_replaceable(),
            "Fixed",
        ));
        assert!(!holder.add(NamedFacet::new(FacetCore::new(id), "Other")));
        assert_eq!(holder.get::<NamedFacet>().expect("named").name(), "Fixed");
    }

    /// M1.3: An absent facet is `None`, never an error.
    #[test]
    fn absent_facet_is_none() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Order"));
        assert!(spec.get_facet::<CollectionFacet>().is_none());
    }
}

// =============================================================================
// TIER M2: COLLECTION STRATEGIES
// =============================================================================

mod m2_collection_strategies {
    use super::*;

    fn facet_of(ctx: &MetaModelContext, type_name: &str) -> Arc<CollectionFacet> {
        ctx.specification(&TypeName::new(type_name))
            .get_facet::<CollectionFacet>()
            .expect("collection facet")
    }

    fn managed(ctx: &MetaModelContext, value: Value) -> ManagedObject {
        ctx.interaction().adapt(value).unwrap().unwrap()
    }

    /// M2.1: Populating a list and an array preserves size and order, and
    /// streams wrapped elements of the element type.
    #[test]
    fn populate_then_stream_preserves_elements() {
        let ctx = context();
        let element_spec = ctx.specification(&TypeName::new("sales.Order"));
        let orders: Vec<Value> = (0..5)
            .map(|_| Value::Object(Pojo::new("sales.Order", Order)))
            .collect();

        for type_name in ["List", "Array"] {
            let facet = facet_of(&ctx, type_name);
            let mut collection = Value::Null;
            facet
                .populate_pojo(&mut collection, &element_spec, orders.clone(), orders.len())
                .expect("populate");

            let owner = managed(&ctx, collection);
            assert_eq!(facet.size(&owner).unwrap(), orders.len());

            let interaction = ctx.interaction();
            let streamed: Vec<ManagedObject> = facet
                .stream(&owner, &interaction)
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(streamed.len(), orders.len());
            assert!(streamed.iter().all(|o| Arc::ptr_eq(o.spec(), &element_spec)));
            let values: Vec<Value> = streamed.into_iter().map(ManagedObject::into_value).collect();
            assert_eq!(values, orders);
        }
    }

    /// M2.2: An array whose stream disagrees with its declared count is a
    /// domain-model error.
    #[test]
    fn array_count_mismatch_rejected() {
        let ctx = context();
        let facet = facet_of(&ctx, "Array");
        let element_spec = ctx.specification(&TypeName::new("String"));
        let mut collection = Value::Null;

        let result =
            facet.populate_pojo(&mut collection, &element_spec, vec![Value::text("a")], 2);

        assert!(matches!(result, Err(MetamodelError::DomainModel { .. })));
        assert!(collection.is_null());
    }

    /// M2.3: Standalone lists are read-only.
    #[test]
    fn standalone_populate_fails_fast() {
        let ctx = context();
        let facet = facet_of(&ctx, "StandaloneList");
        let element_spec = ctx.specification(&TypeName::new("sales.Order"));
        let mut collection =
            Value::Standalone(StandaloneList::new("sales.Order", vec![Value::Null]));

        let result = facet.populate_pojo(&mut collection, &element_spec, vec![Value::Int(1)], 1);

        assert!(matches!(result, Err(MetamodelError::ReadOnlyCollection(_))));
        assert_eq!(facet.size(&managed(&ctx, collection)).unwrap(), 1);
    }

    /// M2.4: Collection members carry the strategy of their declared type.
    #[test]
    fn collection_member_has_collection_facet() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));
        let orders = spec.association("orders").expect("orders");

        assert!(orders.is_collection());
        assert!(orders.contains_facet::<CollectionFacet>());
    }
}

// =============================================================================
// TIER M3: INHERITED FACET LOOKUP
// =============================================================================

mod m3_inherited_facets {
    use super::*;

    /// M3.1: A facet declared only on the supertype is visible from the subtype.
    #[test]
    fn supertype_facet_visible() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));

        assert!(spec.get_facet::<DescribedAsFacet>().is_none());
        let described = ctx
            .loader()
            .lookup_facet::<DescribedAsFacet>(&spec)
            .expect("inherited");
        assert_eq!(described.description(), "Someone we trade with");
    }

    /// M3.2: A facet re-declared on the subtype takes precedence.
    #[test]
    fn local_facet_wins() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));

        let named = ctx.loader().lookup_facet::<NamedFacet>(&spec).expect("named");
        assert_eq!(named.name(), "Customer");
    }

    /// M3.3: The subtype is registered with its supertype.
    #[test]
    fn subtype_registered() {
        let ctx = context();
        ctx.specification(&TypeName::new("sales.Customer"));
        let party = ctx.specification(&TypeName::new("sales.Party"));

        assert_eq!(party.subtypes(), vec![TypeName::new("sales.Customer")]);
    }
}

// =============================================================================
// TIER M4: SUPPORTING METHOD INVOCATION
// =============================================================================

mod m4_supporting_methods {
    use super::*;

    /// M4.1: `choicesName` returns its three strings.
    #[test]
    fn property_choices_return_three_strings() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));
        let name = spec.association("name").expect("name");
        let facet = name
            .get_facet::<PropertyChoicesFacetViaMethod>()
            .expect("choices");

        let choices = facet.choices(&customer(), &ctx.interaction()).expect("choices");

        let texts: Vec<_> = choices
            .iter()
            .map(|c| c.value().as_text().expect("text").to_string())
            .collect();
        assert_eq!(texts, vec!["Ada", "Grace", "Alan"]);
    }

    /// M4.2: Choices are filtered by the visibility policy.
    #[test]
    fn property_choices_are_visibility_filtered() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));
        let facet = spec
            .association("name")
            .and_then(|a| a.get_facet::<PropertyChoicesFacetViaMethod>())
            .expect("choices");
        let hide_grace = |o: &ManagedObject| o.value().as_text() != Some("Grace");
        let interaction = InteractionContext::new(ctx.loader()).with_policy(&hide_grace);

        let choices = facet.choices(&customer(), &interaction).expect("choices");

        assert_eq!(choices.len(), 2);
        assert!(choices.iter().all(|c| c.value().as_text() != Some("Grace")));
    }

    /// M4.3: Two parameters with three returned slots is a domain-model error.
    #[test]
    fn action_choices_slot_mismatch_is_domain_model_error() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));
        let action = spec.action("placeOrder").expect("placeOrder");
        assert_eq!(action.parameter_count(), 2);
        let facet = action
            .get_facet::<ActionChoicesFacetViaMethod>()
            .expect("action choices");

        let err = facet
            .choices(&customer(), &ctx.interaction())
            .expect_err("mismatch");

        match err {
            MetamodelError::DomainModel { message, .. } => {
                assert!(message.contains("2 parameter(s)"));
                assert!(message.contains("3 slot(s)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// M4.4: Supporting methods are claimed, not left as actions.
    #[test]
    fn supporting_methods_are_not_actions() {
        let ctx = context();
        let spec = ctx.specification(&TypeName::new("sales.Customer"));

        assert!(spec.action("choicesName").is_none());
        assert!(spec.action("choicesPlaceOrder").is_none());
        assert!(spec.unclaimed_methods().is_empty());
    }

    /// M4.5: Priming a clean model yields no validation failures.
    #[test]
    fn clean_model_validates() {
        let ctx = MetaModelContext::builder(sales_registry())
            .config(MetamodelConfig::default())
            .build();
        let report = ctx.prime().expect("prime");
        assert!(report.is_empty(), "{:?}", report.messages());
    }
}
