//! # facetwork-core
//!
//! The facet-based metamodel engine for Facetwork.
//!
//! Domain types register explicit [`class::ClassDescriptor`]s. The
//! [`SpecificationLoader`] turns each descriptor into an
//! [`spec::ObjectSpecification`]: a graph node carrying its members,
//! parameters and the facets attached to each of them by the ordered
//! factory pipeline of a [`factory::ProgrammingModel`]. Viewers and
//! persistence layers only ever query facets.
//!
//! ## Architectural Constraints
//!
//! - No runtime reflection: descriptors and invocation closures are explicit
//! - No global state: everything hangs off a [`MetaModelContext`]
//! - Deterministic: fixed factory order, BTreeMap for every ordered structure
//! - Pure Rust: NO async, NO network dependencies

// =============================================================================
// MODULES
// =============================================================================

pub mod class;
pub mod config;
pub mod context;
pub mod export;
pub mod facet;
pub mod factory;
pub mod formats;
pub mod interaction;
pub mod introspect;
mod introspector;
pub mod loader;
pub mod persistence;
pub mod primitives;
pub mod spec;
pub mod types;
pub mod validate;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BeanSort, CollectionKind, CollectionSemantics, FeatureType, Identifier, MetamodelError,
    MethodId, Pojo, StandaloneList, TypeName, TypeRef, Value,
};

// =============================================================================
// RE-EXPORTS: Metamodel
// =============================================================================

pub use class::{Annotation, ClassDescriptor, ClassRegistry, MethodDescriptor, ParamDescriptor};
pub use config::{IntrospectionPolicy, MetamodelConfig, ValidationConfig};
pub use context::{MetaModelContext, MetaModelContextBuilder};
pub use facet::{Facet, FacetHolder, HasFacets};
pub use factory::{FacetProcessor, ProgrammingModel};
pub use interaction::{InteractionContext, ManagedObject, VisibilityPolicy};
pub use loader::SpecificationLoader;
pub use persistence::{NoPersistence, PersistenceProvider};
pub use spec::{
    IntrospectionOutcome, ObjectAction, ObjectActionParameter, ObjectAssociation,
    ObjectSpecification,
};
pub use validate::{MetaModelValidator, ValidationFailure, ValidationFailures};

// =============================================================================
// RE-EXPORTS: Export & Formats
// =============================================================================

pub use export::MetamodelSnapshot;
pub use formats::{SnapshotHeader, snapshot_from_bytes, snapshot_to_bytes};
