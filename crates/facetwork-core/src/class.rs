//! # Class Registry
//!
//! Explicit registration of domain types.
//!
//! There is no runtime reflection: every domain type is described once by a
//! [`ClassDescriptor`] listing its supertype, annotations and methods. Each
//! [`MethodDescriptor`] carries an invoker closure that stands in for a
//! reflective call. The method names follow the same convention a reflective
//! engine would read (`getName`, `choicesName`, `validatePlaceOrder`, ...),
//! so the descriptor is a faithful, static stand-in for the class itself.

use crate::primitives::{
    ARRAY_TYPE, BOOL_TYPE, GET_PREFIX, INT_TYPE, IS_PREFIX, LIST_TYPE, OBJECT_TYPE, SET_PREFIX,
    SET_TYPE, STANDALONE_LIST_TYPE, TEXT_TYPE,
};
use crate::introspect::naming::capitalize;
use crate::{CollectionSemantics, MetamodelError, MethodId, Pojo, TypeName, TypeRef, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// Declared nature of a domain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nature {
    Entity,
    ViewModel,
    Bean,
}

/// Declared side-effect semantics of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Semantics {
    Safe,
    Idempotent,
    NonIdempotent,
}

/// Declarative metadata attached to a class, method or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Class-level nature.
    DomainObject(Nature),
    /// Class-level logical type name overriding the type name.
    LogicalTypeName(String),
    /// Class-level marker for value types.
    Value,
    /// Explicit display name.
    Named(String),
    /// Description.
    DescribedAs(String),
    /// Maximum text length.
    MaxLength(usize),
    /// Member or parameter is optional.
    Optional,
    /// Always hidden.
    Hidden,
    /// Always disabled, with a reason.
    Disabled(String),
    /// Dewey-style ordering sequence (`"1.2"`).
    MemberOrder(String),
    /// Never part of the metamodel.
    Programmatic,
    /// Explicitly an action.
    Action,
    /// Action semantics.
    ActionSemantics(Semantics),
}

// =============================================================================
// METHOD DESCRIPTOR
// =============================================================================

/// Invocation closure standing in for a reflective call.
pub type Invoker = Arc<dyn Fn(&Pojo, &[Value]) -> Result<Value, MetamodelError> + Send + Sync>;

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: Option<String>,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
}

impl ParamDescriptor {
    /// An unnamed parameter of the given type.
    #[must_use]
    pub fn new(ty: TypeRef) -> Self {
        Self {
            name: None,
            ty,
            annotations: Vec::new(),
        }
    }

    /// Give the parameter a name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an annotation.
    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A declared method of a domain type.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<ParamDescriptor>,
    returns: TypeRef,
    is_public: bool,
    is_static: bool,
    annotations: Vec<Annotation>,
    invoker: Option<Invoker>,
}

impl MethodDescriptor {
    /// A public, non-static, parameterless method returning `Void`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: TypeRef::Void,
            is_public: true,
            is_static: false,
            annotations: Vec::new(),
            invoker: None,
        }
    }

    /// `getXxx` (or `isXxx` for booleans) accessor reading a typed instance.
    pub fn getter<T, F>(property: &str, ty: TypeRef, read: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let prefix = if ty.is_boolean() { IS_PREFIX } else { GET_PREFIX };
        Self::new(format!("{prefix}{}", capitalize(property)))
            .returns(ty)
            .invoke_on::<T, _>(move |target, _| Ok(read(target)))
    }

    /// `setXxx` mutator writing a typed instance.
    pub fn setter<T, F>(property: &str, ty: TypeRef, write: F) -> Self
    where
        T: Any,
        F: Fn(&T, Value) + Send + Sync + 'static,
    {
        Self::new(format!("{SET_PREFIX}{}", capitalize(property)))
            .param(ty)
            .invoke_on::<T, _>(move |target, args| {
                write(target, args.first().cloned().unwrap_or_default());
                Ok(Value::Null)
            })
    }

    /// Append an unnamed parameter.
    #[must_use]
    pub fn param(mut self, ty: TypeRef) -> Self {
        self.params.push(ParamDescriptor::new(ty));
        self
    }

    /// Append a fully described parameter.
    #[must_use]
    pub fn param_with(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type.
    #[must_use]
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.returns = ty;
        self
    }

    /// Mark as non-public.
    #[must_use]
    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    /// Mark as static.
    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Attach an annotation.
    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Provide an untyped invoker.
    #[must_use]
    pub fn invoke<F>(mut self, f: F) -> Self
    where
        F: Fn(&Pojo, &[Value]) -> Result<Value, MetamodelError> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(f));
        self
    }

    /// Provide an invoker over a concrete receiver type.
    ///
    /// The receiver is downcast on every call; a receiver of the wrong type is
    /// an invocation error.
    #[must_use]
    pub fn invoke_on<T, F>(self, f: F) -> Self
    where
        T: Any,
        F: Fn(&T, &[Value]) -> Result<Value, MetamodelError> + Send + Sync + 'static,
    {
        let name = self.name.clone();
        self.invoke(move |pojo, args| {
            let target = pojo.downcast_ref::<T>().ok_or_else(|| {
                MetamodelError::invocation(
                    &name,
                    format!("receiver of class '{}' has the wrong type", pojo.class()),
                )
            })?;
            f(target, args)
        })
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters.
    #[must_use]
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// Declared parameter types.
    #[must_use]
    pub fn param_types(&self) -> Vec<TypeRef> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }

    /// Declared return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.returns
    }

    /// Check if public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Check if static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Declared annotations.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Check if an annotation is present.
    #[must_use]
    pub fn has_annotation(&self, annotation: &Annotation) -> bool {
        self.annotations.contains(annotation)
    }

    /// Whether both methods have the same name and parameter types.
    #[must_use]
    pub fn overrides(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self.params.iter().zip(&other.params).all(|(a, b)| a.ty == b.ty)
    }

    /// Identifier of this method as declared by `declaring`.
    #[must_use]
    pub fn id(&self, declaring: &TypeName) -> MethodId {
        MethodId {
            declaring: declaring.clone(),
            name: self.name.clone(),
            params: self.param_types(),
        }
    }

    /// Invoke the method on `target`.
    ///
    /// The argument count must match the declared parameter count.
    pub fn call(&self, target: &Pojo, args: &[Value]) -> Result<Value, MetamodelError> {
        if args.len() != self.params.len() {
            return Err(MetamodelError::invocation(
                &self.name,
                format!(
                    "expected {} argument(s), got {}",
                    self.params.len(),
                    args.len()
                ),
            ));
        }
        let invoker = self
            .invoker
            .as_ref()
            .ok_or_else(|| MetamodelError::invocation(&self.name, "method has no body"))?;
        invoker(target, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("is_public", &self.is_public)
            .field("is_static", &self.is_static)
            .field("annotations", &self.annotations)
            .finish()
    }
}

// =============================================================================
// CLASS DESCRIPTOR
// =============================================================================

/// Structural kind of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
    /// Built-in value type.
    Value,
    /// Built-in collection type.
    Collection(CollectionSemantics),
}

/// The registered description of a domain type.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: TypeName,
    kind: ClassKind,
    supertype: Option<TypeName>,
    annotations: Vec<Annotation>,
    methods: Vec<Arc<MethodDescriptor>>,
}

impl ClassDescriptor {
    /// A concrete class extending `Object`.
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            supertype: Some(TypeName::object()),
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn builtin(name: &str, kind: ClassKind) -> Self {
        let mut class = Self::new(name);
        class.kind = kind;
        if name == OBJECT_TYPE {
            class.supertype = None;
        }
        class
    }

    /// Set the supertype.
    #[must_use]
    pub fn extends(mut self, supertype: impl Into<TypeName>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    /// Mark as abstract.
    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        self.kind = ClassKind::Abstract;
        self
    }

    /// Mark as an interface.
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.kind = ClassKind::Interface;
        self
    }

    /// Attach a class-level annotation.
    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declare a method.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Structural kind.
    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Direct supertype.
    #[must_use]
    pub fn supertype(&self) -> Option<&TypeName> {
        self.supertype.as_ref()
    }

    /// Class-level annotations.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Methods declared directly on this type, in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    /// Find the first annotation the extractor accepts.
    pub fn find_annotation<T>(&self, extract: impl Fn(&Annotation) -> Option<T>) -> Option<T> {
        self.annotations.iter().find_map(extract)
    }

    /// Check if an annotation is present.
    #[must_use]
    pub fn has_annotation(&self, annotation: &Annotation) -> bool {
        self.annotations.contains(annotation)
    }

    /// Whether this is one of the built-in value or collection types.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, ClassKind::Value | ClassKind::Collection(_)) || self.name.is_object()
    }
}

// =============================================================================
// CLASS REGISTRY
// =============================================================================

/// The set of types the engine may introspect.
///
/// Always contains the root `Object`, the built-in value types and the
/// synthetic collection types.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: BTreeMap<TypeName, Arc<ClassDescriptor>>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry holding only the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let builtins = [
            ClassDescriptor::builtin(OBJECT_TYPE, ClassKind::Concrete),
            ClassDescriptor::builtin(BOOL_TYPE, ClassKind::Value),
            ClassDescriptor::builtin(INT_TYPE, ClassKind::Value),
            ClassDescriptor::builtin(TEXT_TYPE, ClassKind::Value),
            ClassDescriptor::builtin(LIST_TYPE, ClassKind::Collection(CollectionSemantics::List)),
            ClassDescriptor::builtin(SET_TYPE, ClassKind::Collection(CollectionSemantics::Set)),
            ClassDescriptor::builtin(ARRAY_TYPE, ClassKind::Collection(CollectionSemantics::Array)),
            ClassDescriptor::builtin(
                STANDALONE_LIST_TYPE,
                ClassKind::Collection(CollectionSemantics::Standalone),
            ),
        ];

        Self {
            classes: builtins
                .into_iter()
                .map(|c| (c.name.clone(), Arc::new(c)))
                .collect(),
        }
    }

    /// Register a domain type.
    ///
    /// Returns `MetamodelError::DuplicateType` if the name is taken.
    pub fn register(&mut self, class: ClassDescriptor) -> Result<(), MetamodelError> {
        if self.classes.contains_key(&class.name) {
            return Err(MetamodelError::DuplicateType(class.name));
        }
        self.classes.insert(class.name.clone(), Arc::new(class));
        Ok(())
    }

    /// Builder-style registration.
    pub fn with(mut self, class: ClassDescriptor) -> Result<Self, MetamodelError> {
        self.register(class)?;
        Ok(self)
    }

    /// Look up a type.
    #[must_use]
    pub fn get(&self, name: &TypeName) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(name).cloned()
    }

    /// Check if a type is registered.
    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        self.classes.contains_key(name)
    }

    /// All registered type names, built-ins included, in deterministic order.
    pub fn type_names(&self) -> impl Iterator<Item = &TypeName> {
        self.classes.keys()
    }

    /// Registered domain (non built-in) type names.
    pub fn domain_types(&self) -> impl Iterator<Item = &TypeName> {
        self.classes
            .values()
            .filter(|c| !c.is_builtin())
            .map(|c| &c.name)
    }

    /// Total number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether only built-ins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain_types().next().is_none()
    }

    /// Whether `sub` is `sup` or inherits from it through registered
    /// supertypes. Every type is a subtype of `Object`.
    #[must_use]
    pub fn is_subtype_of(&self, sub: &TypeName, sup: &TypeName) -> bool {
        if sub == sup || sup.is_object() {
            return true;
        }
        let mut visited = 0;
        let mut next = self.classes.get(sub).and_then(|c| c.supertype.as_ref());
        while let Some(name) = next {
            if name == sup {
                return true;
            }
            // A cyclic chain never reaches `sup`.
            visited += 1;
            if visited > self.classes.len() {
                return false;
            }
            next = self.classes.get(name).and_then(|c| c.supertype.as_ref());
        }
        false
    }

    /// Whether a value declared as `from` may be used where `to` is
    /// expected. Used when pairing supporting methods with their member.
    ///
    /// `Object` is accepted on either side; collections must agree on
    /// their elements, whatever their shape.
    #[must_use]
    pub fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        match (from, to) {
            (TypeRef::Void, TypeRef::Void) => true,
            (TypeRef::Class(a), TypeRef::Class(b)) => a.is_object() || self.is_subtype_of(a, b),
            (TypeRef::Class(a), TypeRef::Collection { .. })
            | (TypeRef::Collection { .. }, TypeRef::Class(a)) => a.is_object(),
            (
                TypeRef::Collection { element: a, .. },
                TypeRef::Collection { element: b, .. },
            ) => self.is_assignable(a, b),
            _ => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
