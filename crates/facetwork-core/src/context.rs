//! # Metamodel Context
//!
//! The constructed, explicitly passed owner of one metamodel: registry,
//! programming model, configuration, persistence collaborator, loader and
//! the validation report.
//!
//! ```text
//! MetaModelContext::builder(registry)
//!     .config(config)
//!     .build()
//!     .prime()?          // load every registered type, validate once
//! ```
//!
//! There is no process-wide instance. Anything that needs the metamodel
//! takes `&MetaModelContext` (or the loader it exposes).

use crate::class::ClassRegistry;
use crate::config::MetamodelConfig;
use crate::factory::ProgrammingModel;
use crate::interaction::InteractionContext;
use crate::loader::SpecificationLoader;
use crate::persistence::{NoPersistence, PersistenceProvider};
use crate::spec::ObjectSpecification;
use crate::validate::{MetaModelValidator, ValidationFailures, default_validators, validate_all};
use crate::{MetamodelError, TypeName};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// BUILDER
// =============================================================================

/// Assembles a [`MetaModelContext`].
pub struct MetaModelContextBuilder {
    registry: ClassRegistry,
    model: ProgrammingModel,
    config: MetamodelConfig,
    persistence: Arc<dyn PersistenceProvider>,
    validators: Vec<Box<dyn MetaModelValidator>>,
}

impl MetaModelContextBuilder {
    /// Use a custom programming model instead of the standard one.
    #[must_use]
    pub fn programming_model(mut self, model: ProgrammingModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn config(mut self, config: MetamodelConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn persistence(mut self, persistence: Arc<dyn PersistenceProvider>) -> Self {
        self.persistence = persistence;
        self
    }

    /// Add a validator run after the configured defaults.
    #[must_use]
    pub fn validator(mut self, validator: Box<dyn MetaModelValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    #[must_use]
    pub fn build(self) -> MetaModelContext {
        let mut validators = default_validators(&self.config.validation);
        validators.extend(self.validators);
        let config = Arc::new(self.config);
        let loader = SpecificationLoader::new(
            Arc::new(self.registry),
            self.model,
            Arc::clone(&config),
            self.persistence,
        );
        MetaModelContext {
            loader,
            config,
            validators,
            report: Mutex::new(None),
        }
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// One metamodel and its lifecycle.
pub struct MetaModelContext {
    loader: SpecificationLoader,
    config: Arc<MetamodelConfig>,
    validators: Vec<Box<dyn MetaModelValidator>>,
    report: Mutex<Option<ValidationFailures>>,
}

impl MetaModelContext {
    /// Start building a context over `registry`, with the standard
    /// programming model, default configuration and no persistence.
    #[must_use]
    pub fn builder(registry: ClassRegistry) -> MetaModelContextBuilder {
        MetaModelContextBuilder {
            registry,
            model: ProgrammingModel::standard(),
            config: MetamodelConfig::default(),
            persistence: Arc::new(NoPersistence),
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn loader(&self) -> &SpecificationLoader {
        &self.loader
    }

    #[must_use]
    pub fn config(&self) -> &Arc<MetamodelConfig> {
        &self.config
    }

    /// Shorthand for [`SpecificationLoader::load_specification`].
    pub fn specification(&self, type_name: &TypeName) -> Arc<ObjectSpecification> {
        self.loader.load_specification(type_name)
    }

    /// An interaction context in which every object is visible.
    #[must_use]
    pub fn interaction(&self) -> InteractionContext<'_> {
        InteractionContext::new(&self.loader)
    }

    /// Load every registered type, then validate once.
    ///
    /// The report is computed on the first call and reused afterwards. With
    /// `validation.strict`, a non-empty report is returned as
    /// `MetamodelError::Validation`.
    pub fn prime(&self) -> Result<ValidationFailures, MetamodelError> {
        let names: Vec<TypeName> = self.loader.registry().type_names().cloned().collect();
        for name in &names {
            self.loader.load_specification(name);
        }

        let report = {
            let mut cached = self.report.lock();
            match &*cached {
                Some(report) => report.clone(),
                None => {
                    let report = if self.config.validation.enabled {
                        validate_all(&self.loader, &self.validators)
                    } else {
                        ValidationFailures::new()
                    };
                    *cached = Some(report.clone());
                    report
                }
            }
        };

        tracing::info!(
            types = names.len(),
            specifications = self.loader.all_specifications().len(),
            introspections = self.loader.introspection_count(),
            failures = report.len(),
            "metamodel primed"
        );
        for failure in report.iter() {
            tracing::warn!(origin = %failure.origin, "{}", failure.message);
        }

        if self.config.validation.strict && !report.is_empty() {
            return Err(MetamodelError::Validation(report));
        }
        Ok(report)
    }

    /// The report of the last validation pass, if one ran.
    #[must_use]
    pub fn validation_report(&self) -> Option<ValidationFailures> {
        self.report.lock().clone()
    }

    /// Evict a type (and its subtypes). The next `prime` validates again.
    pub fn invalidate(&self, type_name: &TypeName) -> usize {
        let evicted = self.loader.invalidate_cache(type_name);
        *self.report.lock() = None;
        evicted
    }

    /// Drop every cached specification and the validation report.
    pub fn shutdown(&self) {
        self.loader.clear();
        *self.report.lock() = None;
        tracing::info!("metamodel shut down");
    }
}

impl fmt::Debug for MetaModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaModelContext")
            .field("loader", &self.loader)
            .field("validators", &self.validators.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, MethodDescriptor};
    use crate::config::ValidationConfig;
    use crate::TypeRef;

    fn registry() -> ClassRegistry {
        ClassRegistry::new()
            .with(
                ClassDescriptor::new("demo.Customer")
                    .method(MethodDescriptor::new("getName").returns(TypeRef::text()))
                    .method(MethodDescriptor::new("hideNickname").returns(TypeRef::boolean())),
            )
            .expect("registry")
    }

    #[test]
    fn prime_loads_everything_and_validates_once() {
        let ctx = MetaModelContext::builder(registry()).build();
        let report = ctx.prime().expect("lenient");
        assert_eq!(report.len(), 1);

        let introspections = ctx.loader().introspection_count();
        let again = ctx.prime().expect("lenient");
        assert_eq!(again, report);
        assert_eq!(ctx.loader().introspection_count(), introspections);
    }

    #[test]
    fn strict_validation_fails_prime() {
        let config = MetamodelConfig {
            validation: ValidationConfig {
                strict: true,
                ..ValidationConfig::default()
            },
            ..MetamodelConfig::default()
        };
        let ctx = MetaModelContext::builder(registry()).config(config).build();
        assert!(matches!(ctx.prime(), Err(MetamodelError::Validation(_))));
    }

    #[test]
    fn shutdown_clears_cache_and_report() {
        let ctx = MetaModelContext::builder(registry()).build();
        ctx.prime().expect("prime");
        assert!(ctx.validation_report().is_some());

        ctx.shutdown();
        assert!(ctx.loader().all_specifications().is_empty());
        assert!(ctx.validation_report().is_none());
    }
}
