//! # Interaction
//!
//! Runtime side of the metamodel: pairing raw values with their
//! specifications and deciding what the current user may see.
//!
//! An [`InteractionContext`] is passed explicitly to every method-backed
//! facet that returns domain objects. It bundles the loader used to resolve
//! specifications and the [`VisibilityPolicy`] standing in for the
//! authorization layer.

use crate::facet::{EntityFacet, HiddenObjectFacetViaMethod, NamedFacet, TitleFacetViaMethod};
use crate::loader::SpecificationLoader;
use crate::spec::ObjectSpecification;
use crate::{IntrospectionOutcome, MetamodelError, Value};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// MANAGED OBJECT
// =============================================================================

/// A value paired with the specification describing it.
#[derive(Clone)]
pub struct ManagedObject {
    spec: Arc<ObjectSpecification>,
    value: Value,
}

impl ManagedObject {
    /// Pair `value` with `spec`.
    ///
    /// Fails with `MetamodelError::Unintrospectable` if the spec could not be
    /// introspected.
    pub fn new(spec: Arc<ObjectSpecification>, value: Value) -> Result<Self, MetamodelError> {
        if let IntrospectionOutcome::Unintrospectable(reason) = spec.outcome() {
            return Err(MetamodelError::Unintrospectable {
                type_name: spec.type_name().clone(),
                reason: reason.clone(),
            });
        }
        Ok(Self { spec, value })
    }

    #[must_use]
    pub fn spec(&self) -> &Arc<ObjectSpecification> {
        &self.spec
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Debug for ManagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedObject")
            .field("spec", self.spec.type_name())
            .field("value", &self.value)
            .finish()
    }
}

impl PartialEq for ManagedObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.spec, &other.spec) && self.value == other.value
    }
}

// =============================================================================
// VISIBILITY
// =============================================================================

/// Authorization capability: may the current user see this object?
pub trait VisibilityPolicy: Send + Sync {
    fn is_visible(&self, object: &ManagedObject) -> bool;
}

/// Everything is visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl VisibilityPolicy for AllowAll {
    fn is_visible(&self, _object: &ManagedObject) -> bool {
        true
    }
}

impl<F> VisibilityPolicy for F
where
    F: Fn(&ManagedObject) -> bool + Send + Sync,
{
    fn is_visible(&self, object: &ManagedObject) -> bool {
        self(object)
    }
}

static ALLOW_ALL: AllowAll = AllowAll;

// =============================================================================
// INTERACTION CONTEXT
// =============================================================================

/// Per-call collaborators of method-backed facets.
#[derive(Clone, Copy)]
pub struct InteractionContext<'a> {
    loader: &'a SpecificationLoader,
    policy: &'a dyn VisibilityPolicy,
}

impl<'a> InteractionContext<'a> {
    /// A context in which every object is visible.
    #[must_use]
    pub fn new(loader: &'a SpecificationLoader) -> Self {
        Self {
            loader,
            policy: &ALLOW_ALL,
        }
    }

    /// Replace the visibility policy.
    #[must_use]
    pub fn with_policy(mut self, policy: &'a dyn VisibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn loader(&self) -> &'a SpecificationLoader {
        self.loader
    }

    /// Pair a raw value with its specification. `Null` adapts to `None`.
    pub fn adapt(&self, value: Value) -> Result<Option<ManagedObject>, MetamodelError> {
        let Some(type_name) = value.type_name() else {
            return Ok(None);
        };
        let spec = self.loader.load_specification(&type_name);
        ManagedObject::new(spec, value).map(Some)
    }

    /// Adapt every element, dropping nulls and, when visibility filtering is
    /// configured, objects the policy hides.
    pub fn adapt_all(&self, values: Vec<Value>) -> Result<Vec<ManagedObject>, MetamodelError> {
        let filter = self.loader.config().filter_visibility;
        let mut adapted = Vec::with_capacity(values.len());
        for value in values {
            let Some(object) = self.adapt(value)? else {
                continue;
            };
            if filter && !self.is_visible(&object)? {
                continue;
            }
            adapted.push(object);
        }
        Ok(adapted)
    }

    /// The policy's verdict, vetoed by the object's own `hidden()` method.
    pub fn is_visible(&self, object: &ManagedObject) -> Result<bool, MetamodelError> {
        if !self.policy.is_visible(object) {
            return Ok(false);
        }
        let Some(pojo) = object.value().as_pojo() else {
            return Ok(true);
        };
        match self
            .loader
            .lookup_facet::<HiddenObjectFacetViaMethod>(object.spec())
        {
            Some(facet) => Ok(!facet.hidden(pojo)?),
            None => Ok(true),
        }
    }

    /// Display title: `title()` if declared, the value itself for scalars,
    /// otherwise the type's name.
    pub fn title_of(&self, object: &ManagedObject) -> Result<String, MetamodelError> {
        match object.value() {
            Value::Object(pojo) => {
                if let Some(facet) = self.loader.lookup_facet::<TitleFacetViaMethod>(object.spec()) {
                    return facet.title(pojo);
                }
            }
            Value::Text(text) => return Ok(text.clone()),
            Value::Int(n) => return Ok(n.to_string()),
            Value::Bool(flag) => return Ok(flag.to_string()),
            _ => {}
        }
        let name = self
            .loader
            .lookup_facet::<NamedFacet>(object.spec())
            .map(|f| f.name().to_string())
            .unwrap_or_else(|| object.spec().type_name().simple_name().to_string());
        Ok(name)
    }

    /// Persistent identifier of an entity, if its provider knows one.
    #[must_use]
    pub fn identifier_of(&self, object: &ManagedObject) -> Option<String> {
        let pojo = object.value().as_pojo()?;
        self.loader
            .lookup_facet::<EntityFacet>(object.spec())?
            .identifier_of(pojo)
    }
}

impl fmt::Debug for InteractionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionContext")
            .field("loader", self.loader)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassRegistry, MethodDescriptor};
    use crate::config::MetamodelConfig;
    use crate::factory::ProgrammingModel;
    use crate::persistence::NoPersistence;
    use crate::{Pojo, TypeRef};

    #[derive(Debug)]
    struct Product {
        name: &'static str,
        retired: bool,
    }

    fn loader(config: MetamodelConfig) -> SpecificationLoader {
        let registry = ClassRegistry::new()
            .with(
                ClassDescriptor::new("demo.Product")
                    .method(
                        MethodDescriptor::new("title")
                            .returns(TypeRef::text())
                            .invoke_on(|p: &Product, _| Ok(Value::text(p.name))),
                    )
                    .method(
                        MethodDescriptor::new("hidden")
                            .returns(TypeRef::boolean())
                            .invoke_on(|p: &Product, _| Ok(Value::Bool(p.retired))),
                    ),
            )
            .expect("registry");
        SpecificationLoader::new(
            Arc::new(registry),
            ProgrammingModel::standard(),
            Arc::new(config),
            Arc::new(NoPersistence),
        )
    }

    fn product(name: &'static str, retired: bool) -> Value {
        Value::Object(Pojo::new("demo.Product", Product { name, retired }))
    }

    #[test]
    fn null_adapts_to_none() {
        let loader = loader(MetamodelConfig::default());
        let ctx = InteractionContext::new(&loader);
        assert!(ctx.adapt(Value::Null).expect("adapt").is_none());
    }

    #[test]
    fn unregistered_type_cannot_be_adapted() {
        let loader = loader(MetamodelConfig::default());
        let ctx = InteractionContext::new(&loader);
        let ghost = Value::Object(Pojo::new("demo.Ghost", ()));
        assert!(matches!(
            ctx.adapt(ghost),
            Err(MetamodelError::Unintrospectable { .. })
        ));
    }

    #[test]
    fn hidden_objects_are_filtered() {
        let loader = loader(MetamodelConfig::default());
        let ctx = InteractionContext::new(&loader);
        let adapted = ctx
            .adapt_all(vec![product("Tea", false), Value::Null, product("Gin", true)])
            .expect("adapt");
        assert_eq!(adapted.len(), 1);
        assert_eq!(ctx.title_of(&adapted[0]).expect("title"), "Tea");
    }

    #[test]
    fn policy_filters_unless_disabled() {
        let deny_all = |_: &ManagedObject| false;

        let loader = loader(MetamodelConfig::default());
        let ctx = InteractionContext::new(&loader).with_policy(&deny_all);
        assert!(ctx.adapt_all(vec![product("Tea", false)]).expect("adapt").is_empty());

        let unfiltered = self::loader(MetamodelConfig {
            filter_visibility: false,
            ..MetamodelConfig::default()
        });
        let ctx = InteractionContext::new(&unfiltered).with_policy(&deny_all);
        assert_eq!(ctx.adapt_all(vec![product("Tea", false)]).expect("adapt").len(), 1);
    }

    #[test]
    fn scalar_titles_are_their_value() {
        let loader = loader(MetamodelConfig::default());
        let ctx = InteractionContext::new(&loader);
        let object = ctx.adapt(Value::Int(42)).expect("adapt").expect("some");
        assert_eq!(ctx.title_of(&object).expect("title"), "42");
    }
}
