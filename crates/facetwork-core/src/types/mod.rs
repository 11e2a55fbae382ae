//! # Core Type Definitions
//!
//! This module contains the identifiers and value model shared by every
//! layer of the metamodel:
//! - Type and feature identifiers (`TypeName`, `Identifier`, `MethodId`)
//! - Declared types (`TypeRef`, `CollectionKind`, `CollectionSemantics`)
//! - Classification (`BeanSort`, `FeatureType`)
//! - Runtime values (`Value`, `Pojo`, `StandaloneList`)
//! - Error types (`MetamodelError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier types implement `Ord` so that every map in the engine can
//! be a `BTreeMap` with a stable iteration order.

mod error;
mod value;

pub use error::MetamodelError;
pub use value::{Pojo, StandaloneList, Value};

use crate::primitives::{
    ARRAY_TYPE, BOOL_TYPE, INT_TYPE, LIST_TYPE, OBJECT_TYPE, SET_TYPE, STANDALONE_LIST_TYPE,
    TEXT_TYPE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TYPE NAME
// =============================================================================

/// Stable identifier of a domain type.
///
/// This is the key of the specification cache and the only way one
/// specification refers to another.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name from any string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root type.
    #[must_use]
    pub fn object() -> Self {
        Self::new(OBJECT_TYPE)
    }

    /// Get the full name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment (`demo.Customer` → `Customer`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit(['.', ':'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.0)
    }

    /// Whether this is the root type.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.0 == OBJECT_TYPE
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// DECLARED TYPES
// =============================================================================

/// Shape of a declared collection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    /// Ordered, growable.
    List,
    /// Growable, no duplicates.
    Set,
    /// Fixed size.
    Array,
}

impl CollectionKind {
    /// The synthetic type that specifies this collection shape.
    #[must_use]
    pub fn type_name(self) -> TypeName {
        match self {
            Self::List => TypeName::new(LIST_TYPE),
            Self::Set => TypeName::new(SET_TYPE),
            Self::Array => TypeName::new(ARRAY_TYPE),
        }
    }

    /// The strategy used to treat this shape as a sequence of elements.
    #[must_use]
    pub fn semantics(self) -> CollectionSemantics {
        match self {
            Self::List => CollectionSemantics::List,
            Self::Set => CollectionSemantics::Set,
            Self::Array => CollectionSemantics::Array,
        }
    }
}

/// How a "many" value is streamed, sized and populated.
///
/// Selected once, at specification-build time, from the declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollectionSemantics {
    /// Plain growable list.
    List,
    /// Plain growable set (duplicates skipped on populate).
    Set,
    /// Fixed-size array, allocated up front on populate.
    Array,
    /// Read-only wrapper over ad hoc results.
    Standalone,
}

impl CollectionSemantics {
    /// The synthetic type that specifies this strategy.
    #[must_use]
    pub fn type_name(self) -> TypeName {
        match self {
            Self::List => TypeName::new(LIST_TYPE),
            Self::Set => TypeName::new(SET_TYPE),
            Self::Array => TypeName::new(ARRAY_TYPE),
            Self::Standalone => TypeName::new(STANDALONE_LIST_TYPE),
        }
    }
}

/// Declared type of a return value or parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// No value.
    Void,
    /// A single value of the named type.
    Class(TypeName),
    /// Many values of the element type.
    Collection {
        kind: CollectionKind,
        element: Box<TypeRef>,
    },
}

impl TypeRef {
    /// A single value of the named type.
    #[must_use]
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::Class(name.into())
    }

    /// The built-in text type.
    #[must_use]
    pub fn text() -> Self {
        Self::class(TEXT_TYPE)
    }

    /// The built-in integer type.
    #[must_use]
    pub fn int() -> Self {
        Self::class(INT_TYPE)
    }

    /// The built-in boolean type.
    #[must_use]
    pub fn boolean() -> Self {
        Self::class(BOOL_TYPE)
    }

    /// The root type.
    #[must_use]
    pub fn object() -> Self {
        Self::Class(TypeName::object())
    }

    /// A list of `element`.
    #[must_use]
    pub fn list(element: TypeRef) -> Self {
        Self::Collection {
            kind: CollectionKind::List,
            element: Box::new(element),
        }
    }

    /// A set of `element`.
    #[must_use]
    pub fn set(element: TypeRef) -> Self {
        Self::Collection {
            kind: CollectionKind::Set,
            element: Box::new(element),
        }
    }

    /// An array of `element`.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        Self::Collection {
            kind: CollectionKind::Array,
            element: Box::new(element),
        }
    }

    /// Check if this is `Void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Check if this is a collection of any shape.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection { .. })
    }

    /// Check if this is the built-in boolean type.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Class(name) if name.as_str() == BOOL_TYPE)
    }

    /// Check if this is the built-in text type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Class(name) if name.as_str() == TEXT_TYPE)
    }

    /// Collection shape, if any.
    #[must_use]
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match self {
            Self::Collection { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Element type of a collection.
    #[must_use]
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            Self::Collection { element, .. } => Some(element),
            _ => None,
        }
    }

    /// The type whose specification describes values of this declared type.
    ///
    /// Collections resolve to their synthetic collection type; `Void` has none.
    #[must_use]
    pub fn raw_type_name(&self) -> Option<TypeName> {
        match self {
            Self::Void => None,
            Self::Class(name) => Some(name.clone()),
            Self::Collection { kind, .. } => Some(kind.type_name()),
        }
    }

    /// Innermost non-collection type name, if any.
    #[must_use]
    pub fn leaf_type_name(&self) -> Option<&TypeName> {
        match self {
            Self::Void => None,
            Self::Class(name) => Some(name),
            Self::Collection { element, .. } => element.leaf_type_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Class(name) => write!(f, "{name}"),
            Self::Collection { kind, element } => write!(f, "{}<{element}>", kind.type_name()),
        }
    }
}

// =============================================================================
// FEATURE IDENTIFIERS
// =============================================================================

/// Identifies a reflected method: declaring type, name and parameter types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodId {
    pub declaring: TypeName,
    pub name: String,
    pub params: Vec<TypeRef>,
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.declaring, self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str(")")
    }
}

/// Identifies a feature (type, member, or parameter) that can hold facets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub type_name: TypeName,
    pub member: Option<String>,
    pub parameter: Option<usize>,
}

impl Identifier {
    /// Identifier of a type.
    #[must_use]
    pub fn class(type_name: TypeName) -> Self {
        Self {
            type_name,
            member: None,
            parameter: None,
        }
    }

    /// Identifier of a member of a type.
    #[must_use]
    pub fn member(type_name: TypeName, member: impl Into<String>) -> Self {
        Self {
            type_name,
            member: Some(member.into()),
            parameter: None,
        }
    }

    /// Identifier of an action parameter.
    #[must_use]
    pub fn parameter(type_name: TypeName, member: impl Into<String>, index: usize) -> Self {
        Self {
            type_name,
            member: Some(member.into()),
            parameter: Some(index),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if let Some(member) = &self.member {
            write!(f, "#{member}")?;
        }
        if let Some(index) = self.parameter {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// What kind of bean a specification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BeanSort {
    /// Persistent domain entity.
    Entity,
    /// Non-persistent domain object whose state is recreated from a memento.
    ViewModel,
    /// Immutable value (text, numbers, ...).
    Value,
    /// Collection or array.
    Collection,
    /// Container-managed service.
    ManagedBean,
    /// Abstract type or interface.
    Abstract,
    /// Not recognized as any of the above.
    Unknown,
}

impl BeanSort {
    /// Whether instances of this sort carry domain members.
    #[must_use]
    pub fn has_members(self) -> bool {
        !matches!(self, Self::Value | Self::Collection)
    }

    /// Whether this sort describes a concrete domain type.
    #[must_use]
    pub fn is_concrete_domain_type(self) -> bool {
        matches!(self, Self::Entity | Self::ViewModel | Self::ManagedBean)
    }
}

impl fmt::Display for BeanSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entity => "entity",
            Self::ViewModel => "view-model",
            Self::Value => "value",
            Self::Collection => "collection",
            Self::ManagedBean => "managed-bean",
            Self::Abstract => "abstract",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The kind of feature a facet factory is processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureType {
    Object,
    Property,
    Collection,
    Action,
    Parameter,
}

impl FeatureType {
    /// Member-level feature types that are associations.
    pub const ASSOCIATIONS: &'static [FeatureType] = &[Self::Property, Self::Collection];

    /// Every member-level feature type.
    pub const MEMBERS: &'static [FeatureType] = &[Self::Property, Self::Collection, Self::Action];

    /// Check if this is a property or collection.
    #[must_use]
    pub fn is_association(self) -> bool {
        matches!(self, Self::Property | Self::Collection)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_strips_path() {
        assert_eq!(TypeName::new("demo.Customer").simple_name(), "Customer");
        assert_eq!(TypeName::new("demo::orders::Order").simple_name(), "Order");
        assert_eq!(TypeName::new("Plain").simple_name(), "Plain");
    }

    #[test]
    fn raw_type_of_collection_is_synthetic_type() {
        let declared = TypeRef::list(TypeRef::class("demo.Order"));
        assert_eq!(declared.raw_type_name(), Some(TypeName::new(LIST_TYPE)));
        assert_eq!(declared.leaf_type_name(), Some(&TypeName::new("demo.Order")));
        assert_eq!(TypeRef::Void.raw_type_name(), None);
    }

    #[test]
    fn identifier_display() {
        let t = TypeName::new("demo.Customer");
        assert_eq!(Identifier::class(t.clone()).to_string(), "demo.Customer");
        assert_eq!(
            Identifier::member(t.clone(), "name").to_string(),
            "demo.Customer#name"
        );
        assert_eq!(
            Identifier::parameter(t, "placeOrder", 1).to_string(),
            "demo.Customer#placeOrder[1]"
        );
    }

    #[test]
    fn method_id_display() {
        let id = MethodId {
            declaring: TypeName::new("demo.Customer"),
            name: "validateName".to_string(),
            params: vec![TypeRef::text()],
        };
        assert_eq!(id.to_string(), "demo.Customer::validateName(String)");
    }
}
