//! # Persistence Collaborator
//!
//! The engine never maps objects to storage. It only asks a provider two
//! questions: "is this class an entity (or some other sort)?" and "what is
//! the identifier of this instance?".

use crate::class::ClassDescriptor;
use crate::{BeanSort, Pojo};
use std::fmt;

/// Narrow interface to an external persistence layer.
pub trait PersistenceProvider: Send + Sync + fmt::Debug {
    /// Provider name, for diagnostics.
    fn name(&self) -> &str;

    /// Classify a class the provider manages. `None` defers to annotations.
    fn classify(&self, class: &ClassDescriptor) -> Option<BeanSort>;

    /// Identifier of a persisted instance.
    fn identifier_of(&self, _pojo: &Pojo) -> Option<String> {
        None
    }
}

/// A provider that manages nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl PersistenceProvider for NoPersistence {
    fn name(&self) -> &str {
        "none"
    }

    fn classify(&self, _class: &ClassDescriptor) -> Option<BeanSort> {
        None
    }
}
