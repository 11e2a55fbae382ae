//! # Collection Facets
//!
//! Uniform access to "many" values whatever their concrete shape. The
//! strategy is chosen once, when the specification is built, from the
//! declared type:
//!
//! | Semantics    | populate                                   |
//! |--------------|--------------------------------------------|
//! | `List`       | clear, then append                         |
//! | `Set`        | clear, then append skipping duplicates     |
//! | `Array`      | allocate `count` slots up front, then fill |
//! | `Standalone` | read-only: `ReadOnlyCollection`            |
//!
//! Streaming works on the owner's [`ManagedObject`] and yields each element
//! paired with its own specification, so callers never see raw values.

use super::{Facet, FacetCore};
use crate::interaction::{InteractionContext, ManagedObject};
use crate::spec::ObjectSpecification;
use crate::{CollectionSemantics, IntrospectionOutcome, MetamodelError, TypeName, Value};

/// Streams, sizes and populates a collection-shaped value.
#[derive(Debug)]
pub struct CollectionFacet {
    core: FacetCore,
    semantics: CollectionSemantics,
}

impl CollectionFacet {
    #[must_use]
    pub fn new(core: FacetCore, semantics: CollectionSemantics) -> Self {
        Self { core, semantics }
    }

    /// The selected strategy.
    #[must_use]
    pub fn semantics(&self) -> CollectionSemantics {
        self.semantics
    }

    /// Elements of the owner's collection, in order, each adapted through
    /// `ctx`. Null elements are skipped; a `Null` collection streams as empty.
    ///
    /// The sequence is lazy and can be restarted by calling `stream` again.
    pub fn stream<'a>(
        &'a self,
        owner: &'a ManagedObject,
        ctx: &'a InteractionContext<'a>,
    ) -> Result<impl Iterator<Item = Result<ManagedObject, MetamodelError>> + 'a, MetamodelError>
    {
        let elements = self.elements(owner.value())?;
        Ok(elements
            .iter()
            .filter_map(move |element| ctx.adapt(element.clone()).transpose()))
    }

    /// Number of elements in the owner's collection, nulls included.
    pub fn size(&self, owner: &ManagedObject) -> Result<usize, MetamodelError> {
        Ok(self.elements(owner.value())?.len())
    }

    /// Fill a freshly created `collection` with `elements` of `element_spec`.
    ///
    /// `count` is the declared number of elements. Arrays allocate exactly
    /// that many slots and fail with `DomainModel` when the stream is longer
    /// or shorter; lists and sets only use it as a capacity hint. On failure
    /// `collection` is left untouched.
    pub fn populate_pojo(
        &self,
        collection: &mut Value,
        element_spec: &ObjectSpecification,
        elements: impl IntoIterator<Item = Value>,
        count: usize,
    ) -> Result<(), MetamodelError> {
        if self.semantics == CollectionSemantics::Standalone {
            return Err(MetamodelError::ReadOnlyCollection(self.semantics.type_name()));
        }
        if let IntrospectionOutcome::Unintrospectable(reason) = element_spec.outcome() {
            return Err(MetamodelError::Unintrospectable {
                type_name: element_spec.type_name().clone(),
                reason: reason.clone(),
            });
        }

        match self.semantics {
            CollectionSemantics::Array => {
                let mut elements = elements.into_iter();
                let mut slots = vec![Value::Null; count];
                for (filled, slot) in slots.iter_mut().enumerate() {
                    let Some(element) = elements.next() else {
                        return Err(self.count_mismatch(element_spec, count, filled));
                    };
                    *slot = element;
                }
                let surplus = elements.count();
                if surplus > 0 {
                    return Err(self.count_mismatch(element_spec, count, count + surplus));
                }
                *collection = Value::Array(slots);
            }
            CollectionSemantics::List => {
                let mut items = match std::mem::take(collection) {
                    Value::List(items) => items,
                    _ => Vec::with_capacity(count),
                };
                items.clear();
                items.extend(elements);
                *collection = Value::List(items);
            }
            CollectionSemantics::Set => {
                let mut items = match std::mem::take(collection) {
                    Value::Set(items) => items,
                    _ => Vec::with_capacity(count),
                };
                items.clear();
                for element in elements {
                    if !items.contains(&element) {
                        items.push(element);
                    }
                }
                *collection = Value::Set(items);
            }
            CollectionSemantics::Standalone => {}
        }
        Ok(())
    }

    fn count_mismatch(
        &self,
        element_spec: &ObjectSpecification,
        declared: usize,
        streamed: usize,
    ) -> MetamodelError {
        MetamodelError::domain_model(
            self.holder(),
            format!(
                "array of {} declared {declared} element(s) but {streamed} were supplied",
                element_spec.type_name()
            ),
        )
    }

    fn elements<'a>(&self, collection: &'a Value) -> Result<&'a [Value], MetamodelError> {
        let accepted = match (self.semantics, collection) {
            (_, Value::Null) => return Ok(&[]),
            (CollectionSemantics::List, Value::List(items))
            | (CollectionSemantics::Set, Value::Set(items))
            | (CollectionSemantics::Array, Value::Array(items)) => Some(items.as_slice()),
            (CollectionSemantics::Standalone, Value::Standalone(list)) => Some(list.elements()),
            _ => None,
        };
        accepted.ok_or_else(|| {
            MetamodelError::domain_model(
                self.holder(),
                format!(
                    "expected a {} value, got {collection:?}",
                    self.semantics.type_name()
                ),
            )
        })
    }
}

/// Element type of a collection.
#[derive(Debug)]
pub struct TypeOfFacet {
    core: FacetCore,
    element_type: TypeName,
}

impl TypeOfFacet {
    #[must_use]
    pub fn new(core: FacetCore, element_type: TypeName) -> Self {
        Self { core, element_type }
    }

    #[must_use]
    pub fn element_type(&self) -> &TypeName {
        &self.element_type
    }
}

crate::facet!(CollectionFacet, TypeOfFacet);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::primitives::INT_TYPE;
    use crate::{ClassRegistry, Identifier, MetaModelContext, StandaloneList};
    use std::sync::Arc;

    fn facet(semantics: CollectionSemantics) -> CollectionFacet {
        CollectionFacet::new(
            FacetCore::new(Identifier::class(semantics.type_name())),
            semantics,
        )
    }

    fn context() -> MetaModelContext {
        MetaModelContext::builder(ClassRegistry::new()).build()
    }

    fn int_spec(ctx: &MetaModelContext) -> Arc<ObjectSpecification> {
        ctx.specification(&TypeName::new(INT_TYPE))
    }

    fn owner(ctx: &MetaModelContext, value: Value) -> ManagedObject {
        ctx.interaction().adapt(value).expect("adapt").expect("non-null")
    }

    fn ints(n: i64) -> Vec<Value> {
        (1..=n).map(Value::Int).collect()
    }

    #[test]
    fn array_populate_allocates_declared_slots() {
        let ctx = context();
        let facet = facet(CollectionSemantics::Array);
        let mut value = Value::Null;
        facet
            .populate_pojo(&mut value, &int_spec(&ctx), ints(3), 3)
            .expect("populate");

        assert_eq!(value, Value::array([1_i64, 2, 3]));
        assert_eq!(facet.size(&owner(&ctx, value)).expect("size"), 3);
    }

    #[test]
    fn array_count_mismatch_is_domain_model_error() {
        let ctx = context();
        let facet = facet(CollectionSemantics::Array);
        let spec = int_spec(&ctx);

        let mut short = Value::Null;
        let result = facet.populate_pojo(&mut short, &spec, ints(2), 3);
        match result {
            Err(MetamodelError::DomainModel { message, .. }) => {
                assert!(message.contains("declared 3 element(s) but 2 were supplied"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(short, Value::Null);

        let mut long = Value::Null;
        let result = facet.populate_pojo(&mut long, &spec, ints(5), 3);
        assert!(matches!(result, Err(MetamodelError::DomainModel { .. })));
        assert_eq!(long, Value::Null);
    }

    #[test]
    fn stream_yields_adapted_elements() {
        let ctx = context();
        let facet = facet(CollectionSemantics::List);
        let owner = owner(&ctx, Value::list([Value::Int(1), Value::Null, Value::Int(2)]));
        let interaction = ctx.interaction();

        let streamed: Vec<ManagedObject> = facet
            .stream(&owner, &interaction)
            .expect("stream")
            .collect::<Result<_, _>>()
            .expect("adapt");

        assert_eq!(streamed.len(), 2);
        assert!(streamed.iter().all(|e| e.spec().type_name().as_str() == INT_TYPE));
        assert_eq!(streamed[1].value(), &Value::Int(2));
        assert_eq!(facet.size(&owner).expect("size"), 3);

        let again = facet.stream(&owner, &interaction).expect("restart").count();
        assert_eq!(again, 2);
    }

    #[test]
    fn list_populate_clears_previous_contents() {
        let ctx = context();
        let facet = facet(CollectionSemantics::List);
        let mut value = Value::list([7_i64, 8]);
        facet
            .populate_pojo(&mut value, &int_spec(&ctx), ints(1), 1)
            .expect("populate");
        assert_eq!(value, Value::list([1_i64]));
    }

    #[test]
    fn set_populate_skips_duplicates() {
        let ctx = context();
        let facet = facet(CollectionSemantics::Set);
        let mut value = Value::Null;
        facet
            .populate_pojo(
                &mut value,
                &int_spec(&ctx),
                vec![Value::Int(1), Value::Int(1), Value::Int(2)],
                3,
            )
            .expect("populate");
        assert_eq!(value, Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn standalone_is_read_only() {
        let ctx = context();
        let facet = facet(CollectionSemantics::Standalone);
        let original = Value::Standalone(StandaloneList::new(INT_TYPE, ints(1)));
        let mut value = original.clone();

        let result = facet.populate_pojo(&mut value, &int_spec(&ctx), ints(2), 2);

        assert!(matches!(result, Err(MetamodelError::ReadOnlyCollection(_))));
        assert_eq!(value, original);
        assert_eq!(facet.size(&owner(&ctx, value)).expect("size"), 1);
    }

    #[test]
    fn unintrospectable_element_spec_rejected() {
        let ctx = context();
        let ghost = ctx.specification(&TypeName::new("demo.Ghost"));
        let mut value = Value::Null;

        let result = facet(CollectionSemantics::List).populate_pojo(&mut value, &ghost, ints(1), 1);

        assert!(matches!(result, Err(MetamodelError::Unintrospectable { .. })));
    }

    #[test]
    fn null_collection_streams_as_empty() {
        let ctx = context();
        let list = ctx.specification(&CollectionSemantics::List.type_name());
        let owner = ManagedObject::new(list, Value::Null).expect("managed");
        let interaction = ctx.interaction();

        let facet = facet(CollectionSemantics::List);
        assert_eq!(facet.size(&owner).expect("size"), 0);
        assert_eq!(facet.stream(&owner, &interaction).expect("stream").count(), 0);
    }

    #[test]
    fn mismatched_shape_is_rejected() {
        let ctx = context();
        let result = facet(CollectionSemantics::Array).size(&owner(&ctx, Value::list([1_i64])));
        assert!(matches!(result, Err(MetamodelError::DomainModel { .. })));
    }
}
