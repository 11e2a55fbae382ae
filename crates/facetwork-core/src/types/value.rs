use super::TypeName;
use crate::primitives::{
    ARRAY_TYPE, BOOL_TYPE, INT_TYPE, LIST_TYPE, SET_TYPE, STANDALONE_LIST_TYPE, TEXT_TYPE,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// POJO
// =============================================================================

/// A domain instance paired with the name of its class.
///
/// Equality is identity: two `Pojo`s are equal only if they share the same
/// underlying instance.
#[derive(Clone)]
pub struct Pojo {
    class: TypeName,
    instance: Arc<dyn Any + Send + Sync>,
}

impl Pojo {
    /// Wrap a domain instance.
    pub fn new<T: Any + Send + Sync>(class: impl Into<TypeName>, instance: T) -> Self {
        Self {
            class: class.into(),
            instance: Arc::new(instance),
        }
    }

    /// Wrap an already shared domain instance.
    pub fn from_arc(class: impl Into<TypeName>, instance: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            class: class.into(),
            instance,
        }
    }

    /// The class this instance belongs to.
    #[must_use]
    pub fn class(&self) -> &TypeName {
        &self.class
    }

    /// Borrow the instance as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }
}

impl PartialEq for Pojo {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

impl fmt::Debug for Pojo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pojo({}@{:p})", self.class, Arc::as_ptr(&self.instance))
    }
}

// =============================================================================
// STANDALONE LIST
// =============================================================================

/// A read-only wrapper that lets an ad hoc result set of a common element
/// type be treated like a domain collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StandaloneList {
    element_type: TypeName,
    elements: Arc<[Value]>,
}

impl StandaloneList {
    /// Wrap pre-existing results.
    pub fn new(element_type: impl Into<TypeName>, elements: Vec<Value>) -> Self {
        Self {
            element_type: element_type.into(),
            elements: elements.into(),
        }
    }

    /// The common element type.
    #[must_use]
    pub fn element_type(&self) -> &TypeName {
        &self.element_type
    }

    /// The wrapped elements.
    #[must_use]
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// A runtime value flowing through accessors, supporting methods and actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Object(Pojo),
    List(Vec<Value>),
    Set(Vec<Value>),
    Array(Vec<Value>),
    Standalone(StandaloneList),
}

impl Value {
    /// Create a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create a list from anything convertible into values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Create an array from anything convertible into values.
    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Check if this is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The name of the type describing this value; `None` for `Null`.
    #[must_use]
    pub fn type_name(&self) -> Option<TypeName> {
        let name = match self {
            Self::Null => return None,
            Self::Object(pojo) => return Some(pojo.class().clone()),
            Self::Bool(_) => BOOL_TYPE,
            Self::Int(_) => INT_TYPE,
            Self::Text(_) => TEXT_TYPE,
            Self::List(_) => LIST_TYPE,
            Self::Set(_) => SET_TYPE,
            Self::Array(_) => ARRAY_TYPE,
            Self::Standalone(_) => STANDALONE_LIST_TYPE,
        };
        Some(TypeName::new(name))
    }

    /// Elements of any collection-shaped value.
    #[must_use]
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) | Self::Array(items) => Some(items),
            Self::Standalone(list) => Some(list.elements()),
            _ => None,
        }
    }

    /// Borrow as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read as boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Borrow as a domain instance.
    #[must_use]
    pub fn as_pojo(&self) -> Option<&Pojo> {
        match self {
            Self::Object(pojo) => Some(pojo),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Pojo> for Value {
    fn from(value: Pojo) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget;

    #[test]
    fn pojo_equality_is_identity() {
        let a = Pojo::new("demo.Widget", Widget);
        let b = Pojo::new("demo.Widget", Widget);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn pojo_downcasts_to_concrete_type() {
        let pojo = Pojo::new("demo.Widget", Widget);
        assert!(pojo.downcast_ref::<Widget>().is_some());
        assert!(pojo.downcast_ref::<String>().is_none());
    }

    #[test]
    fn value_type_names() {
        assert_eq!(Value::Null.type_name(), None);
        assert_eq!(Value::text("x").type_name(), Some(TypeName::new(TEXT_TYPE)));
        assert_eq!(
            Value::Object(Pojo::new("demo.Widget", Widget)).type_name(),
            Some(TypeName::new("demo.Widget"))
        );
        assert_eq!(
            Value::list(["a", "b"]).type_name(),
            Some(TypeName::new(LIST_TYPE))
        );
    }

    #[test]
    fn elements_of_collection_shapes() {
        assert_eq!(Value::list([1i64, 2]).elements().map(<[Value]>::len), Some(2));
        assert_eq!(Value::array(["x"]).elements().map(<[Value]>::len), Some(1));
        let standalone = Value::Standalone(StandaloneList::new(TEXT_TYPE, vec![Value::Null]));
        assert_eq!(standalone.elements().map(<[Value]>::len), Some(1));
        assert!(Value::Int(3).elements().is_none());
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::text("a"));
    }
}
