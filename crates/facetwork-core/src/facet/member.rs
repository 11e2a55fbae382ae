//! Property and collection facets, plus the member-level annotation facets
//! shared with actions.

use super::{FacetCore, returned_bool, returned_elements, returned_text};
use crate::interaction::{InteractionContext, ManagedObject};
use crate::introspect::ClassMethod;
use crate::{MetamodelError, Pojo, Value};

// =============================================================================
// ACCESSORS
// =============================================================================

/// Reads a property or collection through its `getX` / `isX` accessor.
#[derive(Debug)]
pub struct AccessorFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl AccessorFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    /// The accessor method.
    #[must_use]
    pub fn method(&self) -> &ClassMethod {
        &self.method
    }

    pub fn get(&self, target: &Pojo) -> Result<Value, MetamodelError> {
        self.method.call(target, &[])
    }
}

/// Writes a property through its `setX` mutator.
#[derive(Debug)]
pub struct PropertySetterFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl PropertySetterFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn set(&self, target: &Pojo, value: Value) -> Result<(), MetamodelError> {
        self.method.call(target, &[value]).map(|_| ())
    }
}

// =============================================================================
// SUPPORTING METHODS
// =============================================================================

/// `choicesX()`: the candidate values of property `x`.
#[derive(Debug)]
pub struct PropertyChoicesFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl PropertyChoicesFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    /// Invoke the choices method and adapt every element.
    ///
    /// Elements are filtered by visibility when the configuration asks for it.
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

/// `autoCompleteX(String)`: candidates matching a search term.
#[derive(Debug)]
pub struct PropertyAutoCompleteFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
    min_length: usize,
}

impl PropertyAutoCompleteFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod, min_length: usize) -> Self {
        Self {
            core,
            method,
            min_length,
        }
    }

    /// Shortest search term that triggers the method.
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn auto_complete(
        &self,
        target: &Pojo,
        search: &str,
        ctx: &InteractionContext<'_>,
    ) -> Result<Vec<ManagedObject>, MetamodelError> {
        if search.chars().count() < self.min_length {
            return Ok(Vec::new());
        }
        let raw = self.method.call(target, &[Value::text(search)])?;
        let elements = returned_elements(&self.method, raw)?;
        ctx.adapt_all(elements)
    }
}

/// `defaultX()`: initial value of property `x`.
#[derive(Debug)]
pub struct PropertyDefaultFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl PropertyDefaultFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn default_value(&self, target: &Pojo) -> Result<Value, MetamodelError> {
        self.method.call(target, &[])
    }
}

/// `hideX()`: whether member `x` is hidden for `target`.
#[derive(Debug)]
pub struct HideForContextFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl HideForContextFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn hidden(&self, target: &Pojo) -> Result<bool, MetamodelError> {
        let value = self.method.call(target, &[])?;
        returned_bool(&self.method, value)
    }
}

/// `disableX()`: reason member `x` is read-only for `target`, if it is.
#[derive(Debug)]
pub struct DisableForContextFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl DisableForContextFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn disabled_reason(&self, target: &Pojo) -> Result<Option<String>, MetamodelError> {
        let value = self.method.call(target, &[])?;
        returned_text(&self.method, value)
    }
}

/// `validateX(value)`: reason a proposed value is rejected, if it is.
#[derive(Debug)]
pub struct PropertyValidateFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl PropertyValidateFacetViaMethod {
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

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// Always hidden.
#[derive(Debug)]
pub struct HiddenFacet {
    core: FacetCore,
}

impl HiddenFacet {
    #[must_use]
    pub fn new(core: FacetCore) -> Self {
        Self { core }
    }
}

/// Always disabled.
#[derive(Debug)]
pub struct DisabledFacet {
    core: FacetCore,
    reason: String,
}

impl DisabledFacet {
    #[must_use]
    pub fn new(core: FacetCore, reason: impl Into<String>) -> Self {
        Self {
            core,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Upper bound on text length.
#[derive(Debug)]
pub struct MaxLengthFacet {
    core: FacetCore,
    max: usize,
}

impl MaxLengthFacet {
    #[must_use]
    pub fn new(core: FacetCore, max: usize) -> Self {
        Self { core, max }
    }

    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Whether a text value is longer than allowed.
    #[must_use]
    pub fn exceeds(&self, value: &Value) -> bool {
        value
            .as_text()
            .is_some_and(|text| text.chars().count() > self.max)
    }
}

/// Whether a value is required.
///
/// Derived (mandatory) unless the member or parameter is annotated optional.
#[derive(Debug)]
pub struct MandatoryFacet {
    core: FacetCore,
    mandatory: bool,
}

impl MandatoryFacet {
    #[must_use]
    pub fn new(core: FacetCore, mandatory: bool) -> Self {
        Self { core, mandatory }
    }

    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Whether `value` is missing although required.
    #[must_use]
    pub fn is_missing(&self, value: &Value) -> bool {
        self.mandatory && (value.is_null() || value.as_text().is_some_and(str::is_empty))
    }
}

/// Dewey-style ordering sequence (`"1.2.10"`).
#[derive(Debug)]
pub struct MemberOrderFacet {
    core: FacetCore,
    sequence: String,
}

impl MemberOrderFacet {
    #[must_use]
    pub fn new(core: FacetCore, sequence: impl Into<String>) -> Self {
        Self {
            core,
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Numeric components, compared lexicographically (`1.10` after `1.9`).
    /// Non-numeric components sort last.
    #[must_use]
    pub fn sequence_key(&self) -> Vec<u64> {
        self.sequence
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(u64::MAX))
            .collect()
    }
}

crate::facet!(
    AccessorFacetViaMethod,
    PropertySetterFacetViaMethod,
    PropertyChoicesFacetViaMethod,
    PropertyAutoCompleteFacetViaMethod,
    PropertyDefaultFacetViaMethod,
    HideForContextFacetViaMethod,
    DisableForContextFacetViaMethod,
    PropertyValidateFacetViaMethod,
    HiddenFacet,
    DisabledFacet,
    MaxLengthFacet,
    MandatoryFacet,
    MemberOrderFacet,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Identifier, TypeName};

    fn core() -> FacetCore {
        FacetCore::new(Identifier::member(TypeName::new("demo.Customer"), "name"))
    }

    #[test]
    fn member_order_compares_numerically() {
        let a = MemberOrderFacet::new(core(), "1.9");
        let b = MemberOrderFacet::new(core(), "1.10");
        assert!(a.sequence_key() < b.sequence_key());
        assert_eq!(MemberOrderFacet::new(core(), "x").sequence_key(), vec![u64::MAX]);
    }

    #[test]
    fn max_length_counts_characters() {
        let facet = MaxLengthFacet::new(core(), 3);
        assert!(!facet.exceeds(&Value::text("abc")));
        assert!(facet.exceeds(&Value::text("abcd")));
        assert!(!facet.exceeds(&Value::Int(12345)));
    }

    #[test]
    fn mandatory_rejects_null_and_empty() {
        let mandatory = MandatoryFacet::new(core().derived(), true);
        assert!(mandatory.is_missing(&Value::Null));
        assert!(mandatory.is_missing(&Value::text("")));
        assert!(!mandatory.is_missing(&Value::text("Ada")));

        let optional = MandatoryFacet::new(core(), false);
        assert!(!optional.is_missing(&Value::Null));
    }
}
