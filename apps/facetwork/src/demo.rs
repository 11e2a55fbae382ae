//! # Demo Domain
//!
//! A small sales domain registered through explicit class descriptors:
//!
//! ```text
//! Object
//!  └── demo.Party (abstract)
//!       └── demo.Customer (entity) ──orders──> demo.Order (entity)
//!                         <──customer──
//! demo.Product (view model)     demo.OrderRepository (managed bean)
//! ```
//!
//! `Customer` and `Order` reference each other, so loading either one
//! exercises cyclic resolution.

use facetwork_core::class::{Nature, Semantics};
use facetwork_core::persistence::PersistenceProvider;
use facetwork_core::{
    Annotation, BeanSort, ClassDescriptor, ClassRegistry, MetamodelError, MethodDescriptor,
    ParamDescriptor, Pojo, TypeRef, Value,
};

pub const PARTY: &str = "demo.Party";
pub const CUSTOMER: &str = "demo.Customer";
pub const ORDER: &str = "demo.Order";
pub const PRODUCT: &str = "demo.Product";
pub const ORDER_REPOSITORY: &str = "demo.OrderRepository";

// =============================================================================
// INSTANCES
// =============================================================================

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub number: u32,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub code: &'static str,
    pub retired: bool,
}

const CATALOG: [Product; 3] = [
    Product {
        code: "TEA",
        retired: false,
    },
    Product {
        code: "GIN",
        retired: true,
    },
    Product {
        code: "RUM",
        retired: false,
    },
];

fn catalog() -> Value {
    Value::list(
        CATALOG
            .iter()
            .cloned()
            .map(|p| Value::Object(Pojo::new(PRODUCT, p))),
    )
}

// =============================================================================
// CLASS DESCRIPTORS
// =============================================================================

fn party() -> ClassDescriptor {
    ClassDescriptor::new(PARTY)
        .abstract_class()
        .annotate(Annotation::DescribedAs(
            "Anyone the business trades with".into(),
        ))
}

fn customer() -> ClassDescriptor {
    ClassDescriptor::new(CUSTOMER)
        .extends(PARTY)
        .annotate(Annotation::DomainObject(Nature::Entity))
        .annotate(Annotation::LogicalTypeName("sales.Customer".into()))
        .method(
            MethodDescriptor::new("title")
                .returns(TypeRef::text())
                .invoke_on(|c: &Customer, _| Ok(Value::text(format!("{} (#{})", c.name, c.id)))),
        )
        .method(
            MethodDescriptor::getter::<Customer, _>("name", TypeRef::text(), |c| {
                Value::text(c.name.clone())
            })
            .annotate(Annotation::MemberOrder("1".into()))
            .annotate(Annotation::MaxLength(40)),
        )
        .method(
            MethodDescriptor::new("choicesName")
                .returns(TypeRef::list(TypeRef::text()))
                .invoke_on(|_: &Customer, _| Ok(Value::list(["Ada", "Grace", "Alan"]))),
        )
        .method(
            MethodDescriptor::new("validateName")
                .param(TypeRef::text())
                .returns(TypeRef::text())
                .invoke_on(|_: &Customer, args| {
                    let blank = args
                        .first()
                        .and_then(Value::as_text)
                        .is_none_or(|name| name.trim().is_empty());
                    Ok(if blank {
                        Value::text("name must not be blank")
                    } else {
                        Value::Null
                    })
                }),
        )
        .method(
            MethodDescriptor::new("getOrders")
                .returns(TypeRef::list(TypeRef::class(ORDER)))
                .annotate(Annotation::MemberOrder("2".into()))
                .invoke_on(|_: &Customer, _| Ok(Value::List(Vec::new()))),
        )
        .method(
            MethodDescriptor::new("placeOrder")
                .param_with(ParamDescriptor::new(TypeRef::class(PRODUCT)).named("product"))
                .param_with(ParamDescriptor::new(TypeRef::int()).named("quantity"))
                .returns(TypeRef::class(ORDER))
                .annotate(Annotation::ActionSemantics(Semantics::NonIdempotent))
                .invoke_on(|_: &Customer, args| {
                    let quantity = args.get(1).and_then(Value::as_int).unwrap_or(1);
                    Ok(Value::Object(Pojo::new(
                        ORDER,
                        Order {
                            number: 1,
                            quantity,
                        },
                    )))
                }),
        )
        .method(
            MethodDescriptor::new("choices0PlaceOrder")
                .returns(TypeRef::list(TypeRef::class(PRODUCT)))
                .invoke_on(|_: &Customer, _| Ok(catalog())),
        )
        .method(
            MethodDescriptor::new("default1PlaceOrder")
                .returns(TypeRef::int())
                .invoke_on(|_: &Customer, _| Ok(Value::Int(1))),
        )
        .method(
            MethodDescriptor::new("validate1PlaceOrder")
                .param(TypeRef::int())
                .returns(TypeRef::text())
                .invoke_on(|_: &Customer, args| {
                    let positive = args.first().and_then(Value::as_int).is_some_and(|q| q > 0);
                    Ok(if positive {
                        Value::Null
                    } else {
                        Value::text("quantity must be positive")
                    })
                }),
        )
}

fn order() -> ClassDescriptor {
    ClassDescriptor::new(ORDER)
        .annotate(Annotation::DomainObject(Nature::Entity))
        .annotate(Annotation::LogicalTypeName("sales.Order".into()))
        .method(
            MethodDescriptor::new("title")
                .returns(TypeRef::text())
                .invoke_on(|o: &Order, _| Ok(Value::text(format!("Order #{}", o.number)))),
        )
        .method(MethodDescriptor::getter::<Order, _>(
            "quantity",
            TypeRef::int(),
            |o| Value::Int(o.quantity),
        ))
        .method(
            MethodDescriptor::new("getCustomer")
                .returns(TypeRef::class(CUSTOMER))
                .annotate(Annotation::Optional),
        )
}

fn product() -> ClassDescriptor {
    ClassDescriptor::new(PRODUCT)
        .annotate(Annotation::DomainObject(Nature::ViewModel))
        .annotate(Annotation::LogicalTypeName("catalog.Product".into()))
        .method(
            MethodDescriptor::new("title")
                .returns(TypeRef::text())
                .invoke_on(|p: &Product, _| Ok(Value::text(p.code))),
        )
        .method(
            MethodDescriptor::new("hidden")
                .returns(TypeRef::boolean())
                .invoke_on(|p: &Product, _| Ok(Value::Bool(p.retired))),
        )
        .method(MethodDescriptor::getter::<Product, _>(
            "code",
            TypeRef::text(),
            |p| Value::text(p.code),
        ))
}

fn order_repository() -> ClassDescriptor {
    ClassDescriptor::new(ORDER_REPOSITORY)
        .annotate(Annotation::DomainObject(Nature::Bean))
        .method(
            MethodDescriptor::new("findByCustomer")
                .param(TypeRef::class(CUSTOMER))
                .returns(TypeRef::list(TypeRef::class(ORDER)))
                .annotate(Annotation::ActionSemantics(Semantics::Safe)),
        )
}

/// Registry holding the demo domain next to the built-in types.
pub fn registry() -> Result<ClassRegistry, MetamodelError> {
    ClassRegistry::new()
        .with(party())?
        .with(customer())?
        .with(order())?
        .with(product())?
        .with(order_repository())
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// In-memory stand-in for a persistence layer: knows the identifiers of
/// customers and orders, and leaves classification to annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoPersistence;

impl PersistenceProvider for DemoPersistence {
    fn name(&self) -> &str {
        "demo-memory"
    }

    fn classify(&self, _class: &ClassDescriptor) -> Option<BeanSort> {
        None
    }

    fn identifier_of(&self, pojo: &Pojo) -> Option<String> {
        if let Some(customer) = pojo.downcast_ref::<Customer>() {
            return Some(format!("C-{}", customer.id));
        }
        pojo.downcast_ref::<Order>().map(|o| format!("O-{}", o.number))
    }
}

// =============================================================================
// TESTS
// =============================================================================
