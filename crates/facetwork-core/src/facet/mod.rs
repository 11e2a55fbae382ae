//! # Facets
//!
//! A facet is a small, immutable piece of metadata or behaviour attached to
//! a feature (type, property, collection, action or parameter). Facets are
//! keyed by their concrete Rust type: a holder stores at most one facet per
//! [`FacetType`], and a later facet of the same type replaces the earlier one
//! unless the earlier one is marked non-replaceable.
//!
//! Absent facets are never errors. `FacetHolder::get` answers `None`.

pub mod action;
pub mod collection;
pub mod member;
pub mod object;

pub use action::{
    ActionChoicesFacetViaMethod, ActionDefaultsFacetViaMethod, ActionInvocationFacetViaMethod,
    ActionParameterChoicesFacetViaMethod, ActionParameterDefaultFacetViaMethod,
    ActionParameterValidateFacetViaMethod, ActionSemanticsFacet, ActionValidateFacetViaMethod,
};
pub use collection::{CollectionFacet, TypeOfFacet};
pub use member::{
    AccessorFacetViaMethod, DisableForContextFacetViaMethod, DisabledFacet, HiddenFacet,
    HideForContextFacetViaMethod, MandatoryFacet, MaxLengthFacet, MemberOrderFacet,
    PropertyAutoCompleteFacetViaMethod, PropertyChoicesFacetViaMethod,
    PropertyDefaultFacetViaMethod, PropertySetterFacetViaMethod, PropertyValidateFacetViaMethod,
};
pub use object::{
    CssClassFacetViaMethod, DescribedAsFacet, DisabledObjectFacetViaMethod, DomainObjectFacet,
    EntityFacet, HiddenObjectFacetViaMethod, IconFacetViaMethod, LogicalTypeFacet, NamedFacet,
    TitleFacetViaMethod, ValueFacet,
};

use crate::introspect::ClassMethod;
use crate::{Identifier, MetamodelError, MethodId, Value};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// FACET TYPE
// =============================================================================

/// Key of a facet within a holder: the concrete facet type.
///
/// Ordered by short name first so holders iterate deterministically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacetType {
    name: &'static str,
    id: TypeId,
}

impl FacetType {
    /// The facet type of `F`.
    #[must_use]
    pub fn of<F: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<F>();
        Self {
            name: full.rsplit("::").next().unwrap_or(full),
            id: TypeId::of::<F>(),
        }
    }

    /// Short type name (`NamedFacet`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// FACET CORE
// =============================================================================

/// State shared by every facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCore {
    holder: Identifier,
    derived: bool,
    backing_methods: Vec<MethodId>,
    replaceable: bool,
}

impl FacetCore {
    /// An explicit, replaceable facet on `holder`.
    #[must_use]
    pub fn new(holder: Identifier) -> Self {
        Self {
            holder,
            derived: false,
            backing_methods: Vec::new(),
            replaceable: true,
        }
    }

    /// Mark as derived from a default rather than declared.
    #[must_use]
    pub fn derived(mut self) -> Self {
        self.derived = true;
        self
    }

    /// Record a method this facet was synthesized from.
    #[must_use]
    pub fn backed_by(mut self, method: MethodId) -> Self {
        self.backing_methods.push(method);
        self
    }

    /// Prevent later facets of the same type from replacing this one.
    #[must_use]
    pub fn non_replaceable(mut self) -> Self {
        self.replaceable = false;
        self
    }
}

// =============================================================================
// FACET TRAIT
// =============================================================================

/// Behaviour common to every facet.
///
/// Implement with [`facet!`](crate::facet!), which supplies the downcasting
/// plumbing from a `core: FacetCore` field.
pub trait Facet: Any + Send + Sync + fmt::Debug {
    /// Shared facet state.
    fn core(&self) -> &FacetCore;

    /// Borrow as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert into a shared `Any` for downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Key of this facet within a holder.
    fn facet_type(&self) -> FacetType {
        FacetType::of::<Self>()
    }

    /// Identifier of the feature this facet is attached to.
    fn holder(&self) -> &Identifier {
        &self.core().holder
    }

    /// Whether this facet was derived from a default.
    fn is_derived(&self) -> bool {
        self.core().derived
    }

    /// Methods this facet was synthesized from.
    fn backing_methods(&self) -> &[MethodId] {
        &self.core().backing_methods
    }

    /// Whether a later facet of the same type may replace this one.
    fn can_be_replaced(&self) -> bool {
        self.core().replaceable
    }
}

/// Implement [`Facet`] for a struct holding a `core: FacetCore` field.
#[macro_export]
macro_rules! facet {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::facet::Facet for $ty {
                fn core(&self) -> &$crate::facet::FacetCore {
                    &self.core
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn into_any(
                    self: ::std::sync::Arc<Self>,
                ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                    self
                }
            }
        )+
    };
}

// =============================================================================
// RETURN SHAPES
// =============================================================================

/// Interpret a supporting method's return as an optional reason or label.
/// `Null` and the empty string both mean "none".
pub(crate) fn returned_text(
    method: &ClassMethod,
    value: Value,
) -> Result<Option<String>, MetamodelError> {
    match value {
        Value::Null => Ok(None),
        Value::Text(s) if s.is_empty() => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        other => Err(MetamodelError::domain_model(
            method.id(),
            format!("expected text, got {other:?}"),
        )),
    }
}

/// Interpret a supporting method's return as a flag. `Null` means `false`.
pub(crate) fn returned_bool(method: &ClassMethod, value: Value) -> Result<bool, MetamodelError> {
    match value {
        Value::Bool(flag) => Ok(flag),
        Value::Null => Ok(false),
        other => Err(MetamodelError::domain_model(
            method.id(),
            format!("expected bool, got {other:?}"),
        )),
    }
}

/// Interpret a supporting method's return as a collection of elements.
/// `Null` means empty.
pub(crate) fn returned_elements(
    method: &ClassMethod,
    value: Value,
) -> Result<Vec<Value>, MetamodelError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    value.elements().map(<[Value]>::to_vec).ok_or_else(|| {
        MetamodelError::domain_model(
            method.id(),
            format!("expected a collection, got {value:?}"),
        )
    })
}

// =============================================================================
// FACET HOLDER
// =============================================================================

/// Mapping from facet type to facet for one feature.
pub struct FacetHolder {
    identifier: Identifier,
    facets: RwLock<BTreeMap<FacetType, Arc<dyn Facet>>>,
}

impl FacetHolder {
    /// Create an empty holder.
    #[must_use]
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            facets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Identifier of the feature.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Attach a shared facet.
    ///
    /// Replaces any facet of the same type, unless that one is
    /// non-replaceable. Returns whether the facet was stored.
    pub fn add_facet(&self, facet: Arc<dyn Facet>) -> bool {
        let key = facet.facet_type();
        let mut facets = self.facets.write();
        if facets.get(&key).is_some_and(|previous| !previous.can_be_replaced()) {
            tracing::debug!(holder = %self.identifier, facet = %key, "kept non-replaceable facet");
            return false;
        }
        facets.insert(key, facet);
        true
    }

    /// Attach a facet.
    pub fn add<F: Facet>(&self, facet: F) -> bool {
        self.add_facet(Arc::new(facet))
    }

    /// Look up a facet by its concrete type.
    #[must_use]
    pub fn get<F: Facet>(&self) -> Option<Arc<F>> {
        let facet = self.get_by_type(&FacetType::of::<F>())?;
        facet.into_any().downcast::<F>().ok()
    }

    /// Look up a facet by key.
    #[must_use]
    pub fn get_by_type(&self, facet_type: &FacetType) -> Option<Arc<dyn Facet>> {
        self.facets.read().get(facet_type).cloned()
    }

    /// Check if a facet of type `F` is attached.
    #[must_use]
    pub fn contains<F: Facet>(&self) -> bool {
        self.facets.read().contains_key(&FacetType::of::<F>())
    }

    /// Detach the facet of type `F`.
    pub fn remove<F: Facet>(&self) -> Option<Arc<dyn Facet>> {
        self.facets.write().remove(&FacetType::of::<F>())
    }

    /// Attached facet types, in deterministic order.
    #[must_use]
    pub fn facet_types(&self) -> Vec<FacetType> {
        self.facets.read().keys().copied().collect()
    }

    /// Attached facets, in deterministic order.
    #[must_use]
    pub fn facets(&self) -> Vec<Arc<dyn Facet>> {
        self.facets.read().values().cloned().collect()
    }

    /// Number of attached facets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facets.read().len()
    }

    /// Whether no facet is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.read().is_empty()
    }
}

impl fmt::Debug for FacetHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetHolder")
            .field("identifier", &self.identifier)
            .field("facets", &self.facet_types())
            .finish()
    }
}

/// A feature that carries facets.
pub trait HasFacets {
    /// The underlying holder.
    fn facet_holder(&self) -> &FacetHolder;

    /// Look up a locally attached facet.
    fn get_facet<F: Facet>(&self) -> Option<Arc<F>>
    where
        Self: Sized,
    {
        self.facet_holder().get::<F>()
    }

    /// Check if a facet is locally attached.
    fn contains_facet<F: Facet>(&self) -> bool
    where
        Self: Sized,
    {
        self.facet_holder().contains::<F>()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeName;

    fn holder() -> FacetHolder {
        FacetHolder::new(Identifier::class(TypeName::new("demo.Customer")))
    }

    fn named(holder: &FacetHolder, name: &str) -> NamedFacet {
        NamedFacet::new(FacetCore::new(holder.identifier().clone()), name)
    }

    #[test]
    fn facet_type_uses_short_name() {
        assert_eq!(FacetType::of::<NamedFacet>().name(), "NamedFacet");
        assert_ne!(FacetType::of::<NamedFacet>(), FacetType::of::<DescribedAsFacet>());
    }

    #[test]
    fn absent_facet_is_none() {
        let holder = holder();
        assert!(holder.get::<NamedFacet>().is_none());
        assert!(!holder.contains::<NamedFacet>());
        assert!(holder.is_empty());
    }

    #[test]
    fn second_facet_of_same_type_replaces_first() {
        let holder = holder();
        assert!(holder.add(named(&holder, "First")));
        assert!(holder.add(named(&holder, "Second")));

        assert_eq!(holder.len(), 1);
        let facet = holder.get::<NamedFacet>().expect("named");
        assert_eq!(facet.name(), "Second");
    }

    #[test]
    fn non_replaceable_facet_is_kept() {
        let holder = holder();
        let core = FacetCore::new(holder.identifier().clone()).non_replaceable();
        assert!(holder.add(NamedFacet::new(core, "Pinned")));
        assert!(!holder.add(named(&holder, "Other")));

        let facet = holder.get::<NamedFacet>().expect("named");
        assert_eq!(facet.name(), "Pinned");
    }

    #[test]
    fn facets_iterate_in_name_order() {
        let holder = holder();
        holder.add(named(&holder, "Customer"));
        holder.add(DescribedAsFacet::new(
            FacetCore::new(holder.identifier().clone()),
            "A buyer",
        ));

        let names: Vec<_> = holder.facet_types().iter().map(FacetType::name).collect();
        assert_eq!(names, vec!["DescribedAsFacet", "NamedFacet"]);
    }

    #[test]
    fn remove_detaches_facet() {
        let holder = holder();
        holder.add(named(&holder, "Customer"));
        assert!(holder.remove::<NamedFacet>().is_some());
        assert!(holder.get::<NamedFacet>().is_none());
    }

    #[test]
    fn core_flags_are_exposed() {
        let id = Identifier::class(TypeName::new("demo.Customer"));
        let facet = NamedFacet::new(FacetCore::new(id.clone()).derived(), "Customer");
        assert!(facet.is_derived());
        assert!(facet.can_be_replaced());
        assert_eq!(facet.holder(), &id);
        assert!(facet.backing_methods().is_empty());
    }
}
