//! # Object Specifications
//!
//! The immutable metamodel of one domain type: its classification, ordered
//! members and facets.
//!
//! Specifications never own each other. The supertype, the ancestor chain and
//! the subtypes are stored as [`TypeName`]s and resolved through the
//! [`SpecificationLoader`](crate::loader::SpecificationLoader), which keeps
//! cyclic domain models (A references B references A) free of ownership
//! cycles.

use crate::facet::{FacetHolder, HasFacets};
use crate::{BeanSort, Identifier, MethodId, TypeName, TypeRef};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of introspecting a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntrospectionOutcome {
    /// Both phases ran.
    Complete,
    /// The type could not be introspected. The spec is cached but carries
    /// no members.
    Unintrospectable(String),
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// One parameter of an action.
#[derive(Debug)]
pub struct ObjectActionParameter {
    index: usize,
    name: Option<String>,
    param_type: TypeRef,
    holder: FacetHolder,
}

impl ObjectActionParameter {
    pub(crate) fn new(
        index: usize,
        name: Option<String>,
        param_type: TypeRef,
        holder: FacetHolder,
    ) -> Self {
        Self {
            index,
            name,
            param_type,
            holder,
        }
    }

    /// Zero-based position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared name, if the descriptor carries one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn param_type(&self) -> &TypeRef {
        &self.param_type
    }

    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.holder.identifier()
    }
}

impl HasFacets for ObjectActionParameter {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

// =============================================================================
// MEMBERS
// =============================================================================

/// One-to-one or one-to-many association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssociationKind {
    Property,
    Collection,
}

/// A property or collection of a type.
#[derive(Debug)]
pub struct ObjectAssociation {
    id: String,
    kind: AssociationKind,
    declared_type: TypeRef,
    accessor: MethodId,
    holder: FacetHolder,
}

impl ObjectAssociation {
    pub(crate) fn new(
        id: impl Into<String>,
        kind: AssociationKind,
        declared_type: TypeRef,
        accessor: MethodId,
        holder: FacetHolder,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            declared_type,
            accessor,
            holder,
        }
    }

    /// Member id (`firstName`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    /// Check if this is a one-to-one association.
    #[must_use]
    pub fn is_property(&self) -> bool {
        self.kind == AssociationKind::Property
    }

    /// Check if this is a one-to-many association.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.kind == AssociationKind::Collection
    }

    /// The accessor's return type.
    #[must_use]
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    #[must_use]
    pub fn accessor(&self) -> &MethodId {
        &self.accessor
    }

    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.holder.identifier()
    }
}

impl HasFacets for ObjectAssociation {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

/// An invocable member of a type.
#[derive(Debug)]
pub struct ObjectAction {
    id: String,
    method: MethodId,
    return_type: TypeRef,
    parameters: Vec<ObjectActionParameter>,
    holder: FacetHolder,
}

impl ObjectAction {
    pub(crate) fn new(
        id: impl Into<String>,
        method: MethodId,
        return_type: TypeRef,
        parameters: Vec<ObjectActionParameter>,
        holder: FacetHolder,
    ) -> Self {
        Self {
            id: id.into(),
            method,
            return_type,
            parameters,
            holder,
        }
    }

    /// Member id: the method name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn method(&self) -> &MethodId {
        &self.method
    }

    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ObjectActionParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, index: usize) -> Option<&ObjectActionParameter> {
        self.parameters.get(index)
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.holder.identifier()
    }
}

impl HasFacets for ObjectAction {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

// =============================================================================
// OBJECT SPECIFICATION
// =============================================================================

/// The metamodel of one type.
///
/// Built once by the loader and shared as `Arc<ObjectSpecification>`. The
/// only state that changes after publication is the set of known subtypes,
/// which grows as subtypes are loaded.
pub struct ObjectSpecification {
    type_name: TypeName,
    logical_type_name: String,
    bean_sort: BeanSort,
    supertype: Option<TypeName>,
    ancestors: Vec<TypeName>,
    element_type: Option<TypeName>,
    outcome: IntrospectionOutcome,
    associations: Vec<ObjectAssociation>,
    actions: Vec<ObjectAction>,
    unclaimed_methods: Vec<MethodId>,
    holder: FacetHolder,
    subtypes: RwLock<BTreeSet<TypeName>>,
}

/// The parts of a fully introspected specification.
pub(crate) struct SpecParts {
    pub type_name: TypeName,
    pub logical_type_name: String,
    pub bean_sort: BeanSort,
    pub supertype: Option<TypeName>,
    pub ancestors: Vec<TypeName>,
    pub element_type: Option<TypeName>,
    pub associations: Vec<ObjectAssociation>,
    pub actions: Vec<ObjectAction>,
    pub unclaimed_methods: Vec<MethodId>,
    pub holder: FacetHolder,
}

impl ObjectSpecification {
    pub(crate) fn complete(parts: SpecParts) -> Self {
        Self {
            type_name: parts.type_name,
            logical_type_name: parts.logical_type_name,
            bean_sort: parts.bean_sort,
            supertype: parts.supertype,
            ancestors: parts.ancestors,
            element_type: parts.element_type,
            outcome: IntrospectionOutcome::Complete,
            associations: parts.associations,
            actions: parts.actions,
            unclaimed_methods: parts.unclaimed_methods,
            holder: parts.holder,
            subtypes: RwLock::new(BTreeSet::new()),
        }
    }

    /// A memberless spec recording why introspection failed.
    #[must_use]
    pub fn unintrospectable(
        type_name: TypeName,
        bean_sort: BeanSort,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            logical_type_name: type_name.to_string(),
            holder: FacetHolder::new(Identifier::class(type_name.clone())),
            type_name,
            bean_sort,
            supertype: None,
            ancestors: Vec::new(),
            element_type: None,
            outcome: IntrospectionOutcome::Unintrospectable(reason.into()),
            associations: Vec::new(),
            actions: Vec::new(),
            unclaimed_methods: Vec::new(),
            subtypes: RwLock::new(BTreeSet::new()),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Name used by viewers and serialized references.
    #[must_use]
    pub fn logical_type_name(&self) -> &str {
        &self.logical_type_name
    }

    #[must_use]
    pub fn bean_sort(&self) -> BeanSort {
        self.bean_sort
    }

    #[must_use]
    pub fn supertype(&self) -> Option<&TypeName> {
        self.supertype.as_ref()
    }

    /// Every supertype, nearest first, ending with the root.
    #[must_use]
    pub fn ancestors(&self) -> &[TypeName] {
        &self.ancestors
    }

    /// Element type of a collection type.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeName> {
        self.element_type.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> &IntrospectionOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn is_introspectable(&self) -> bool {
        self.outcome == IntrospectionOutcome::Complete
    }

    /// Check if this type is `other` or a subtype of it.
    #[must_use]
    pub fn is_of_type(&self, other: &TypeName) -> bool {
        &self.type_name == other || self.ancestors.contains(other)
    }

    /// Properties and collections, in member order.
    #[must_use]
    pub fn associations(&self) -> &[ObjectAssociation] {
        &self.associations
    }

    pub fn properties(&self) -> impl Iterator<Item = &ObjectAssociation> {
        self.associations.iter().filter(|a| a.is_property())
    }

    pub fn collections(&self) -> impl Iterator<Item = &ObjectAssociation> {
        self.associations.iter().filter(|a| a.is_collection())
    }

    #[must_use]
    pub fn association(&self, id: &str) -> Option<&ObjectAssociation> {
        self.associations.iter().find(|a| a.id() == id)
    }

    /// Actions, in member order.
    #[must_use]
    pub fn actions(&self) -> &[ObjectAction] {
        &self.actions
    }

    /// First action with this id.
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&ObjectAction> {
        self.actions.iter().find(|a| a.id() == id)
    }

    /// Supporting-prefixed methods no factory claimed.
    #[must_use]
    pub fn unclaimed_methods(&self) -> &[MethodId] {
        &self.unclaimed_methods
    }

    /// Known direct subtypes.
    #[must_use]
    pub fn subtypes(&self) -> Vec<TypeName> {
        self.subtypes.read().iter().cloned().collect()
    }

    pub(crate) fn register_subtype(&self, subtype: TypeName) {
        self.subtypes.write().insert(subtype);
    }

    /// Every facet holder of this type: the type, its members and their
    /// parameters.
    #[must_use]
    pub fn feature_holders(&self) -> Vec<&FacetHolder> {
        let mut holders = vec![&self.holder];
        holders.extend(self.associations.iter().map(HasFacets::facet_holder));
        for action in &self.actions {
            holders.push(action.facet_holder());
            holders.extend(action.parameters.iter().map(HasFacets::facet_holder));
        }
        holders
    }
}

impl HasFacets for ObjectSpecification {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

impl fmt::Debug for ObjectSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSpecification")
            .field("type_name", &self.type_name)
            .field("bean_sort", &self.bean_sort)
            .field("outcome", &self.outcome)
            .field("associations", &self.associations.len())
            .field("actions", &self.actions.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{FacetCore, NamedFacet};

    fn spec() -> ObjectSpecification {
        let type_name = TypeName::new("demo.Customer");
        let name_holder = FacetHolder::new(Identifier::member(type_name.clone(), "name"));
        let orders_holder = FacetHolder::new(Identifier::member(type_name.clone(), "orders"));
        let action_holder = FacetHolder::new(Identifier::member(type_name.clone(), "placeOrder"));
        let param_holder =
            FacetHolder::new(Identifier::parameter(type_name.clone(), "placeOrder", 0));
        param_holder.add(NamedFacet::new(
            FacetCore::new(param_holder.identifier().clone()),
            "Product",
        ));
        let method = |name: &str| MethodId {
            declaring: type_name.clone(),
            name: name.to_string(),
            params: Vec::new(),
        };

        ObjectSpecification::complete(SpecParts {
            type_name: type_name.clone(),
            logical_type_name: "sales.Customer".into(),
            bean_sort: BeanSort::Entity,
            supertype: Some(TypeName::new("demo.Party")),
            ancestors: vec![TypeName::new("demo.Party"), TypeName::object()],
            element_type: None,
            associations: vec![
                ObjectAssociation::new(
                    "name",
                    AssociationKind::Property,
                    TypeRef::text(),
                    method("getName"),
                    name_holder,
                ),
                ObjectAssociation::new(
                    "orders",
                    AssociationKind::Collection,
                    TypeRef::list(TypeRef::class("demo.Order")),
                    method("getOrders"),
                    orders_holder,
                ),
            ],
            actions: vec![ObjectAction::new(
                "placeOrder",
                method("placeOrder"),
                TypeRef::Void,
                vec![ObjectActionParameter::new(
                    0,
                    None,
                    TypeRef::text(),
                    param_holder,
                )],
                action_holder,
            )],
            unclaimed_methods: Vec::new(),
            holder: FacetHolder::new(Identifier::class(type_name)),
        })
    }

    #[test]
    fn members_are_split_by_kind() {
        let spec = spec();
        assert_eq!(spec.properties().count(), 1);
        assert_eq!(spec.collections().count(), 1);
        assert!(spec.association("orders").expect("orders").is_collection());
        assert_eq!(spec.action("placeOrder").expect("action").parameter_count(), 1);
        assert!(spec.action("missing").is_none());
    }

    #[test]
    fn is_of_type_follows_ancestors() {
        let spec = spec();
        assert!(spec.is_of_type(&TypeName::new("demo.Customer")));
        assert!(spec.is_of_type(&TypeName::new("demo.Party")));
        assert!(spec.is_of_type(&TypeName::object()));
        assert!(!spec.is_of_type(&TypeName::new("demo.Order")));
    }

    #[test]
    fn feature_holders_cover_every_feature() {
        let spec = spec();
        assert_eq!(spec.feature_holders().len(), 5);
        let param = spec
            .action("placeOrder")
            .and_then(|a| a.parameter(0))
            .expect("param");
        assert_eq!(
            param.get_facet::<NamedFacet>().expect("named").name(),
            "Product"
        );
    }

    #[test]
    fn subtypes_are_recorded_once() {
        let spec = spec();
        spec.register_subtype(TypeName::new("demo.VipCustomer"));
        spec.register_subtype(TypeName::new("demo.VipCustomer"));
        assert_eq!(spec.subtypes(), vec![TypeName::new("demo.VipCustomer")]);
    }

    #[test]
    fn unintrospectable_spec_has_no_members() {
        let spec = ObjectSpecification::unintrospectable(
            TypeName::new("demo.Ghost"),
            BeanSort::Unknown,
            "type is not registered",
        );
        assert!(!spec.is_introspectable());
        assert!(spec.associations().is_empty());
        assert_eq!(spec.logical_type_name(), "demo.Ghost");
    }
}
