//! # Programming Model
//!
//! The ordered table of facet factories and the processor that drives it.
//!
//! The standard table is fixed and curated. Later entries override facets
//! attached by earlier ones, so the order is part of the contract: naming
//! and structure first, method-backed behaviour next, annotations that
//! refine member semantics last.

use super::action::{
    ActionChoicesFactory, ActionDefaultsFactory, ActionInvocationFactory, ParameterChoicesFactory,
    ParameterDefaultFactory, ParameterValidateFactory,
};
use super::annotation::{
    DescribedAsFactory, DisabledAnnotationFactory, HiddenAnnotationFactory,
    MandatoryAnnotationFactory, MaxLengthAnnotationFactory, MemberOrderAnnotationFactory,
    NamedFactory,
};
use super::collection::CollectionTypeInspectionFactory;
use super::member::{
    DisableForContextFactory, HideForContextFactory, MemberAutoCompleteFactory,
    MemberChoicesFactory, MemberDefaultFactory, PropertyAccessorFactory, PropertySetterFactory,
    ValidateFactory,
};
use super::object::{
    DomainObjectAnnotationFactory, ObjectSupportMethodsFactory, RemoveIgnoredMethodsFactory,
};
use super::{FacetFactory, ProcessClassContext, ProcessMethodContext, ProcessParameterContext};
use crate::{FeatureType, MetamodelError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// PROGRAMMING MODEL
// =============================================================================

/// An ordered table of facet factories.
#[derive(Clone, Default)]
pub struct ProgrammingModel {
    factories: Vec<Arc<dyn FacetFactory>>,
}

impl ProgrammingModel {
    /// A model with no factories.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard, curated factory order.
    #[must_use]
    pub fn standard() -> Self {
        let factories: Vec<Arc<dyn FacetFactory>> = vec![
            Arc::new(RemoveIgnoredMethodsFactory),
            Arc::new(DomainObjectAnnotationFactory),
            Arc::new(NamedFactory),
            Arc::new(DescribedAsFactory),
            Arc::new(ObjectSupportMethodsFactory),
            Arc::new(CollectionTypeInspectionFactory),
            Arc::new(PropertyAccessorFactory),
            Arc::new(PropertySetterFactory),
            Arc::new(MemberChoicesFactory),
            Arc::new(MemberAutoCompleteFactory),
            Arc::new(MemberDefaultFactory),
            Arc::new(HideForContextFactory),
            Arc::new(DisableForContextFactory),
            Arc::new(ValidateFactory),
            Arc::new(ActionInvocationFactory),
            Arc::new(ActionChoicesFactory),
            Arc::new(ActionDefaultsFactory),
            Arc::new(ParameterChoicesFactory),
            Arc::new(ParameterDefaultFactory),
            Arc::new(ParameterValidateFactory),
            Arc::new(HiddenAnnotationFactory),
            Arc::new(DisabledAnnotationFactory),
            Arc::new(MaxLengthAnnotationFactory),
            Arc::new(MandatoryAnnotationFactory),
            Arc::new(MemberOrderAnnotationFactory),
        ];
        Self { factories }
    }

    /// Append a factory at the end of the table.
    pub fn add(&mut self, factory: Arc<dyn FacetFactory>) {
        self.factories.push(factory);
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, factory: Arc<dyn FacetFactory>) -> Self {
        self.add(factory);
        self
    }

    /// Insert a factory immediately before the named one.
    pub fn insert_before(
        &mut self,
        name: &str,
        factory: Arc<dyn FacetFactory>,
    ) -> Result<(), MetamodelError> {
        let index = self.position(name)?;
        self.factories.insert(index, factory);
        Ok(())
    }

    /// Insert a factory immediately after the named one.
    pub fn insert_after(
        &mut self,
        name: &str,
        factory: Arc<dyn FacetFactory>,
    ) -> Result<(), MetamodelError> {
        let index = self.position(name)?;
        self.factories.insert(index + 1, factory);
        Ok(())
    }

    /// Remove the named factory.
    pub fn remove(&mut self, name: &str) -> Result<Arc<dyn FacetFactory>, MetamodelError> {
        let index = self.position(name)?;
        Ok(self.factories.remove(index))
    }

    /// Factory names in order.
    #[must_use]
    pub fn factory_names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    /// Factories in order.
    #[must_use]
    pub fn factories(&self) -> &[Arc<dyn FacetFactory>] {
        &self.factories
    }

    /// Number of factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize, MetamodelError> {
        self.factories
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| MetamodelError::FactoryNotFound(name.to_string()))
    }
}

impl fmt::Debug for ProgrammingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factory_names()).finish()
    }
}

// =============================================================================
// FACET PROCESSOR
// =============================================================================

/// Drives the factories of a programming model over each feature.
///
/// Factory lists are cached per feature type when the processor is built.
pub struct FacetProcessor {
    model: ProgrammingModel,
    by_feature: BTreeMap<FeatureType, Vec<Arc<dyn FacetFactory>>>,
    supporting_prefixes: Vec<&'static str>,
}

impl FacetProcessor {
    /// Build the per-feature caches.
    #[must_use]
    pub fn new(model: ProgrammingModel) -> Self {
        let mut by_feature: BTreeMap<FeatureType, Vec<Arc<dyn FacetFactory>>> = BTreeMap::new();
        let mut prefixes = BTreeSet::new();
        for factory in model.factories() {
            for feature in factory.feature_types() {
                by_feature.entry(*feature).or_default().push(factory.clone());
            }
            prefixes.extend(factory.supporting_prefixes().iter().copied());
        }

        tracing::debug!(
            factories = model.len(),
            prefixes = prefixes.len(),
            "facet processor ready"
        );

        // Longest first so `autoComplete` is never mistaken for a shorter prefix.
        let mut supporting_prefixes: Vec<&'static str> = prefixes.into_iter().collect();
        supporting_prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));

        Self {
            model,
            by_feature,
            supporting_prefixes,
        }
    }

    /// The underlying programming model.
    #[must_use]
    pub fn model(&self) -> &ProgrammingModel {
        &self.model
    }

    /// Every prefix claimed by some factory, longest first.
    #[must_use]
    pub fn supporting_prefixes(&self) -> &[&'static str] {
        &self.supporting_prefixes
    }

    /// Factories registered for a feature type, in table order.
    #[must_use]
    pub fn factories_for(&self, feature: FeatureType) -> &[Arc<dyn FacetFactory>] {
        self.by_feature
            .get(&feature)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        for factory in self.factories_for(FeatureType::Object) {
            factory.process_class(ctx);
        }
    }

    pub fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        for factory in self.factories_for(ctx.feature_type) {
            factory.process_method(ctx);
        }
    }

    pub fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        for factory in self.factories_for(FeatureType::Parameter) {
            factory.process_param(ctx);
        }
    }
}

impl fmt::Debug for FacetProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetProcessor")
            .field("model", &self.model)
            .field("supporting_prefixes", &self.supporting_prefixes)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
