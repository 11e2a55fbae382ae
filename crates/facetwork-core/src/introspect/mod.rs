//! # Method Introspection
//!
//! Classifies declared methods by naming convention and holds the pool of
//! methods not yet claimed by a facet factory.
//!
//! - Accessors: `getX()` returning a value, `isX()` returning `bool`
//! - Mutators: `setX(value)` returning `Void`
//! - Supporting methods: known supporting prefix (`choicesX`, `hideX`, ...)
//! - Action candidates: every other public, non-static method
//!
//! A method removed from the pool is invisible to every later factory for
//! that class (at-most-one-claim).

pub mod naming;

use crate::class::{ClassDescriptor, ClassRegistry, MethodDescriptor};
use crate::{MetamodelError, MethodId, Pojo, TypeName, Value};
use naming::{member_id_from_accessor, member_id_from_mutator, strip_convention_prefix};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// CLASS METHOD
// =============================================================================

/// A method together with the type that declares it.
#[derive(Clone)]
pub struct ClassMethod {
    declaring: TypeName,
    descriptor: Arc<MethodDescriptor>,
}

impl ClassMethod {
    /// Pair a descriptor with its declaring type.
    #[must_use]
    pub fn new(declaring: TypeName, descriptor: Arc<MethodDescriptor>) -> Self {
        Self {
            declaring,
            descriptor,
        }
    }

    /// The declaring type.
    #[must_use]
    pub fn declaring(&self) -> &TypeName {
        &self.declaring
    }

    /// The method descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Stable method identifier.
    #[must_use]
    pub fn id(&self) -> MethodId {
        self.descriptor.id(&self.declaring)
    }

    /// Invoke on a target.
    pub fn call(&self, target: &Pojo, args: &[Value]) -> Result<Value, MetamodelError> {
        self.descriptor.call(target, args)
    }
}

impl fmt::Debug for ClassMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Role of a method under the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    /// `getX` / `isX` accessor of member `X`.
    Accessor(String),
    /// `setX` mutator of member `X`.
    Mutator(String),
    /// Method starting with a supporting prefix.
    Supporting(&'static str),
    /// Public, non-static, not matching any convention.
    ActionCandidate,
    /// Static or non-public.
    Ignored,
}

/// Classify a method against the accessor convention and the supporting
/// prefixes contributed by the programming model.
///
/// `supporting_prefixes` must be ordered longest first, as
/// [`FacetProcessor::supporting_prefixes`](crate::FacetProcessor::supporting_prefixes)
/// returns them.
#[must_use]
pub fn classify(method: &MethodDescriptor, supporting_prefixes: &[&'static str]) -> MethodKind {
    if method.is_static() || !method.is_public() {
        return MethodKind::Ignored;
    }

    let name = method.name();
    if method.params().is_empty() && !method.return_type().is_void() {
        if let Some(id) = member_id_from_accessor(name) {
            let is_prefixed = name.starts_with(crate::primitives::IS_PREFIX)
                && !name.starts_with(crate::primitives::GET_PREFIX);
            if !is_prefixed || method.return_type().is_boolean() {
                return MethodKind::Accessor(id);
            }
        }
    }

    if method.params().len() == 1 && method.return_type().is_void() {
        if let Some(id) = member_id_from_mutator(name) {
            return MethodKind::Mutator(id);
        }
    }

    if let Some(prefix) = supporting_prefixes
        .iter()
        .copied()
        .find(|p| strip_convention_prefix(name, p).is_some())
    {
        return MethodKind::Supporting(prefix);
    }

    MethodKind::ActionCandidate
}

// =============================================================================
// METHOD REMOVER
// =============================================================================

/// Capability handed to facet factories to claim methods.
pub trait MethodRemover {
    /// Remove a specific method. Returns it if it was still unclaimed.
    fn remove_method(&mut self, id: &MethodId) -> Option<ClassMethod>;

    /// Remove every unclaimed method matching the predicate.
    fn remove_methods(&mut self, predicate: &dyn Fn(&ClassMethod) -> bool) -> Vec<ClassMethod>;

    /// First unclaimed method with this name accepted by the predicate, in
    /// declaration order.
    fn find_method(
        &self,
        name: &str,
        predicate: &dyn Fn(&MethodDescriptor) -> bool,
    ) -> Option<ClassMethod>;

    /// Find and claim in one step.
    fn claim_method(
        &mut self,
        name: &str,
        predicate: &dyn Fn(&MethodDescriptor) -> bool,
    ) -> Option<ClassMethod> {
        let found = self.find_method(name, predicate)?;
        self.remove_method(&found.id())
    }
}

// =============================================================================
// METHOD POOL
// =============================================================================

/// The unclaimed methods of one class, own methods plus inherited ones that
/// are not overridden, in declaration order (supertype methods first).
#[derive(Debug, Clone, Default)]
pub struct MethodPool {
    methods: Vec<ClassMethod>,
}

impl MethodPool {
    /// Build the pool for `class`, walking its supertype chain in `registry`.
    #[must_use]
    pub fn for_class(class: &ClassDescriptor, registry: &ClassRegistry) -> Self {
        let mut chain = vec![Arc::new(class.clone())];
        let mut next = class.supertype().cloned();
        while let Some(name) = next {
            let Some(parent) = registry.get(&name) else {
                break;
            };
            if chain.iter().any(|c| c.name() == parent.name()) {
                break;
            }
            next = parent.supertype().cloned();
            chain.push(parent);
        }

        let mut methods: Vec<ClassMethod> = Vec::new();
        for declaring in chain.iter().rev() {
            for descriptor in declaring.methods() {
                let method = ClassMethod::new(declaring.name().clone(), descriptor.clone());
                match methods
                    .iter_mut()
                    .find(|m| m.descriptor().overrides(descriptor))
                {
                    Some(slot) => *slot = method,
                    None => methods.push(method),
                }
            }
        }

        Self { methods }
    }

    /// Number of unclaimed methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether every method has been claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Unclaimed methods in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassMethod> {
        self.methods.iter()
    }
}

impl MethodRemover for MethodPool {
    fn remove_method(&mut self, id: &MethodId) -> Option<ClassMethod> {
        let index = self.methods.iter().position(|m| &m.id() == id)?;
        Some(self.methods.remove(index))
    }

    fn remove_methods(&mut self, predicate: &dyn Fn(&ClassMethod) -> bool) -> Vec<ClassMethod> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.methods).into_iter().partition(|m| predicate(m));
        self.methods = kept;
        removed
    }

    fn find_method(
        &self,
        name: &str,
        predicate: &dyn Fn(&MethodDescriptor) -> bool,
    ) -> Option<ClassMethod> {
        self.methods
            .iter()
            .find(|m| m.name() == name && predicate(m.descriptor()))
            .cloned()
    }
}

// =============================================================================
// TESTS
// =============================================================================
