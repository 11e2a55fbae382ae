//! # Facet Factories
//!
//! A facet factory inspects one feature at a time and attaches facets to its
//! holder. Factories are applied in the fixed order of the
//! [`ProgrammingModel`]; when two factories attach the same facet type, the
//! later one wins.
//!
//! Factories never abort a pass. Input they cannot use produces no facet.
//!
//! ## Processing contexts
//!
//! | Context                   | Feature                         |
//! |---------------------------|---------------------------------|
//! | `ProcessClassContext`     | the type itself                 |
//! | `ProcessMethodContext`    | a property, collection or action |
//! | `ProcessParameterContext` | one action parameter            |
//!
//! Each context carries the unclaimed-method pool as a [`MethodRemover`].
//! Member and parameter contexts also carry the [`ClassRegistry`], so
//! supporting methods pair with their member by assignability rather than
//! by exact type.
//! Contexts are discarded after each pass.

pub mod action;
pub mod annotation;
pub mod collection;
pub mod member;
pub mod object;
pub mod pipeline;

pub use pipeline::{FacetProcessor, ProgrammingModel};

use crate::MetamodelConfig;
use crate::class::{ClassDescriptor, ClassRegistry, ParamDescriptor};
use crate::facet::{FacetCore, FacetHolder};
use crate::introspect::{ClassMethod, MethodRemover};
use crate::persistence::PersistenceProvider;
use crate::{FeatureType, Identifier};
use std::sync::Arc;

// =============================================================================
// CONTEXTS
// =============================================================================

/// Context of the type-level pass.
pub struct ProcessClassContext<'a> {
    pub class: &'a ClassDescriptor,
    pub holder: &'a FacetHolder,
    pub remover: &'a mut dyn MethodRemover,
    pub config: &'a MetamodelConfig,
    pub persistence: &'a Arc<dyn PersistenceProvider>,
}

impl ProcessClassContext<'_> {
    /// A fresh core for a facet on this type.
    #[must_use]
    pub fn core(&self) -> FacetCore {
        FacetCore::new(self.holder.identifier().clone())
    }
}

/// Context of a member-level pass.
///
/// `method` is the accessor of a property or collection, or the action
/// method itself.
pub struct ProcessMethodContext<'a> {
    pub class: &'a ClassDescriptor,
    pub feature_type: FeatureType,
    pub member_id: &'a str,
    pub method: &'a ClassMethod,
    pub holder: &'a FacetHolder,
    pub remover: &'a mut dyn MethodRemover,
    pub registry: &'a ClassRegistry,
    pub config: &'a MetamodelConfig,
}

impl ProcessMethodContext<'_> {
    /// A fresh core for a facet on this member.
    #[must_use]
    pub fn core(&self) -> FacetCore {
        FacetCore::new(self.holder.identifier().clone())
    }

    /// Identifier of the member being processed.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.holder.identifier()
    }
}

/// Context of an action-parameter pass.
pub struct ProcessParameterContext<'a> {
    pub class: &'a ClassDescriptor,
    pub action_id: &'a str,
    pub action: &'a ClassMethod,
    pub index: usize,
    pub param: &'a ParamDescriptor,
    pub holder: &'a FacetHolder,
    pub remover: &'a mut dyn MethodRemover,
    pub registry: &'a ClassRegistry,
    pub config: &'a MetamodelConfig,
}

impl ProcessParameterContext<'_> {
    /// A fresh core for a facet on this parameter.
    #[must_use]
    pub fn core(&self) -> FacetCore {
        FacetCore::new(self.holder.identifier().clone())
    }
}

// =============================================================================
// FACTORY TRAIT
// =============================================================================

/// A pluggable unit that attaches facets to features.
pub trait FacetFactory: Send + Sync {
    /// Unique name, used to edit the programming model.
    fn name(&self) -> &'static str;

    /// Feature types this factory processes.
    fn feature_types(&self) -> &'static [FeatureType];

    /// Method prefixes this factory claims for supporting methods.
    fn supporting_prefixes(&self) -> &'static [&'static str] {
        &[]
    }

    fn process_class(&self, _ctx: &mut ProcessClassContext<'_>) {}

    fn process_method(&self, _ctx: &mut ProcessMethodContext<'_>) {}

    fn process_param(&self, _ctx: &mut ProcessParameterContext<'_>) {}
}
