//! Action and action-parameter facets.

use super::{FacetCore, returned_elements, returned_text};
use crate::class::Semantics;
use crate::interaction::{InteractionContext, ManagedObject};
use crate::introspect::ClassMethod;
use crate::{MetamodelError, Pojo, TypeRef, Value};

// =============================================================================
// INVOCATION
// =============================================================================

/// Invokes the action method.
#[derive(Debug)]
pub struct ActionInvocationFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl ActionInvocationFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    /// Declared return type of the action.
    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        self.method.descriptor().return_type()
    }

    pub fn invoke(&self, target: &Pojo, args: &[Value]) -> Result<Value, MetamodelError> {
        self.method.call(target, args)
    }
}

/// Side-effect semantics.
#[derive(Debug)]
pub struct ActionSemanticsFacet {
    core: FacetCore,
    semantics: Semantics,
}

impl ActionSemanticsFacet {
    #[must_use]
    pub fn new(core: FacetCore, semantics: Semantics) -> Self {
        Self { core, semantics }
    }

    #[must_use]
    pub fn semantics(&self) -> Semantics {
        self.semantics
    }
}

// =============================================================================
// ACTION-LEVEL SUPPORTING METHODS
// =============================================================================

/// Split a per-parameter return into exactly `expected` slots.
fn returned_slots(
    method: &ClassMethod,
    action: &str,
    expected: usize,
    value: Value,
) -> Result<Vec<Value>, MetamodelError> {
    let slots = returned_elements(method, value)?;
    if slots.len() != expected {
        return Err(MetamodelError::domain_model(
            method.id(),
            format!(
                "action '{action}' has {expected} parameter(s) but '{}' returned {} slot(s)",
                method.name(),
                slots.len()
            ),
        ));
    }
    Ok(slots)
}

/// `choicesX()` returning one collection of candidates per parameter.
#[derive(Debug)]
pub struct ActionChoicesFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
    action: String,
    param_count: usize,
}

impl ActionChoicesFacetViaMethod {
    #[must_use]
    pub fn new(
        core: FacetCore,
        method: ClassMethod,
        action: impl Into<String>,
        param_count: usize,
    ) -> Self {
        Self {
            core,
            method,
            action: action.into(),
            param_count,
        }
    }

    /// The backing method.
    #[must_use]
    pub fn method(&self) -> &ClassMethod {
        &self.method
    }

    /// Candidates for every parameter, in parameter order.
    ///
    /// The method must return exactly one slot per parameter; each slot is a
    /// collection or `Null` (no choices for that parameter).
    pub fn choices(
        &self,
        target: &Pojo,
        ctx: &InteractionContext<'_>,
    ) -> Result<Vec<Vec<ManagedObject>>, MetamodelError> {
        let raw = self.method.call(target, &[])?;
        let slots = returned_slots(&self.method, &self.action, self.param_count, raw)?;
        slots
            .into_iter()
            .map(|slot| {
                let elements = returned_elements(&self.method, slot)?;
                ctx.adapt_all(elements)
            })
            .collect()
    }
}

/// `defaultX()` returning one default per parameter.
#[derive(Debug)]
pub struct ActionDefaultsFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
    action: String,
    param_count: usize,
}

impl ActionDefaultsFacetViaMethod {
    #[must_use]
    pub fn new(
        core: FacetCore,
        method: ClassMethod,
        action: impl Into<String>,
        param_count: usize,
    ) -> Self {
        Self {
            core,
            method,
            action: action.into(),
            param_count,
        }
    }

    pub fn defaults(&self, target: &Pojo) -> Result<Vec<Value>, MetamodelError> {
        let raw = self.method.call(target, &[])?;
        returned_slots(&self.method, &self.action, self.param_count, raw)
    }
}

/// `validateX(args..)`: reason the argument set is rejected, if it is.
#[derive(Debug)]
pub struct ActionValidateFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl ActionValidateFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn invalid_reason(
        &self,
        target: &Pojo,
        args: &[Value],
    ) -> Result<Option<String>, MetamodelError> {
        let value = self.method.call(target, args)?;
        returned_text(&self.method, value)
    }
}

// =============================================================================
// PARAMETER-LEVEL SUPPORTING METHODS
// =============================================================================

/// `choicesNX()`: candidates for parameter `N` of action `x`.
#[derive(Debug)]
pub struct ActionParameterChoicesFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl ActionParameterChoicesFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn choices(
        &self,
        target: &Pojo,
        ctx: &InteractionContext<'_>,
    ) -> Result<Vec<ManagedObject>, MetamodelError> {
        let raw = self.method.call(target, &[])?;
        let elements = returned_elements(&self.method, raw)?;
        ctx.adapt_all(elements)
    }
}

/// `defaultNX()`: default for parameter `N` of action `x`.
#[derive(Debug)]
pub struct ActionParameterDefaultFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl ActionParameterDefaultFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn default_value(&self, target: &Pojo) -> Result<Value, MetamodelError> {
        self.method.call(target, &[])
    }
}

/// `validateNX(value)`: reason a proposed argument is rejected, if it is.
#[derive(Debug)]
pub struct ActionParameterValidateFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl ActionParameterValidateFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn invalid_reason(
        &self,
        target: &Pojo,
        proposed: &Value,
    ) -> Result<Option<String>, MetamodelError> {
        let value = self.method.call(target, std::slice::from_ref(proposed))?;
        returned_text(&self.method, value)
    }
}

crate::facet!(
    ActionInvocationFacetViaMethod,
    ActionSemanticsFacet,
    ActionChoicesFacetViaMethod,
    ActionDefaultsFacetViaMethod,
    ActionValidateFacetViaMethod,
    ActionParameterChoicesFacetViaMethod,
    ActionParameterDefaultFacetViaMethod,
    ActionParameterValidateFacetViaMethod,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::MethodDescriptor;
    use crate::{Identifier, TypeName};
    use std::sync::Arc;

    struct Customer;

    fn defaults_facet(returned: Value) -> ActionDefaultsFacetViaMethod {
        let method = ClassMethod::new(
            TypeName::new("demo.Customer"),
            Arc::new(
                MethodDescriptor::new("defaultPlaceOrder")
                    .returns(TypeRef::list(TypeRef::object()))
                    .invoke(move |_, _| Ok(returned.clone())),
            ),
        );
        ActionDefaultsFacetViaMethod::new(
            FacetCore::new(Identifier::member(TypeName::new("demo.Customer"), "placeOrder")),
            method,
            "placeOrder",
            2,
        )
    }

    #[test]
    fn defaults_return_one_slot_per_parameter() {
        let facet = defaults_facet(Value::list([Value::text("Widget"), Value::Int(1)]));
        let defaults = facet
            .defaults(&Pojo::new("demo.Customer", Customer))
            .expect("defaults");
        assert_eq!(defaults, vec![Value::text("Widget"), Value::Int(1)]);
    }

    #[test]
    fn slot_count_mismatch_names_both_counts() {
        let facet = defaults_facet(Value::list([1i64, 2, 3]));
        let err = facet
            .defaults(&Pojo::new("demo.Customer", Customer))
            .expect_err("mismatch");
        let message = err.to_string();
        assert!(message.contains("defaultPlaceOrder"));
        assert!(message.contains("placeOrder"));
        assert!(message.contains("2 parameter(s)"));
        assert!(message.contains("3 slot(s)"));
    }
}
