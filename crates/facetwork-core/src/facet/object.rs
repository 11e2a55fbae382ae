//! Type-level facets: naming, nature, and the object support methods.

use super::{FacetCore, returned_bool, returned_text};
use crate::class::Nature;
use crate::introspect::ClassMethod;
use crate::persistence::PersistenceProvider;
use crate::{MetamodelError, Pojo};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// NAMING
// =============================================================================

/// Display name of a type, member or parameter.
#[derive(Debug)]
pub struct NamedFacet {
    core: FacetCore,
    name: String,
}

impl NamedFacet {
    #[must_use]
    pub fn new(core: FacetCore, name: impl Into<String>) -> Self {
        Self {
            core,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Free-text description.
#[derive(Debug)]
pub struct DescribedAsFacet {
    core: FacetCore,
    description: String,
}

impl DescribedAsFacet {
    #[must_use]
    pub fn new(core: FacetCore, description: impl Into<String>) -> Self {
        Self {
            core,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Logical type name overriding the registered type name.
#[derive(Debug)]
pub struct LogicalTypeFacet {
    core: FacetCore,
    logical_type_name: String,
}

impl LogicalTypeFacet {
    #[must_use]
    pub fn new(core: FacetCore, logical_type_name: impl Into<String>) -> Self {
        Self {
            core,
            logical_type_name: logical_type_name.into(),
        }
    }

    #[must_use]
    pub fn logical_type_name(&self) -> &str {
        &self.logical_type_name
    }
}

// =============================================================================
// NATURE
// =============================================================================

/// Declared nature of a domain object.
#[derive(Debug)]
pub struct DomainObjectFacet {
    core: FacetCore,
    nature: Nature,
}

impl DomainObjectFacet {
    #[must_use]
    pub fn new(core: FacetCore, nature: Nature) -> Self {
        Self { core, nature }
    }

    #[must_use]
    pub fn nature(&self) -> Nature {
        self.nature
    }
}

/// Marks a value type.
#[derive(Debug)]
pub struct ValueFacet {
    core: FacetCore,
}

impl ValueFacet {
    #[must_use]
    pub fn new(core: FacetCore) -> Self {
        Self { core }
    }
}

/// Marks a persistent entity and exposes its identifier through the
/// persistence provider.
pub struct EntityFacet {
    core: FacetCore,
    provider: Arc<dyn PersistenceProvider>,
}

impl EntityFacet {
    #[must_use]
    pub fn new(core: FacetCore, provider: Arc<dyn PersistenceProvider>) -> Self {
        Self { core, provider }
    }

    /// Identifier of a persisted instance, if it has one.
    #[must_use]
    pub fn identifier_of(&self, pojo: &Pojo) -> Option<String> {
        self.provider.identifier_of(pojo)
    }

    /// Name of the backing persistence provider.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl fmt::Debug for EntityFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFacet")
            .field("core", &self.core)
            .field("provider", &self.provider.name())
            .finish()
    }
}

// =============================================================================
// OBJECT SUPPORT METHODS
// =============================================================================

/// `title()`
#[derive(Debug)]
pub struct TitleFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl TitleFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    /// Title of `target`; an empty string when the method returns nothing.
    pub fn title(&self, target: &Pojo) -> Result<String, MetamodelError> {
        let value = self.method.call(target, &[])?;
        Ok(returned_text(&self.method, value)?.unwrap_or_default())
    }
}

/// `iconName()`
#[derive(Debug)]
pub struct IconFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl IconFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn icon_name(&self, target: &Pojo) -> Result<Option<String>, MetamodelError> {
        let value = self.method.call(target, &[])?;
        returned_text(&self.method, value)
    }
}

/// `cssClass()`
#[derive(Debug)]
pub struct CssClassFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl CssClassFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn css_class(&self, target: &Pojo) -> Result<Option<String>, MetamodelError> {
        let value = self.method.call(target, &[])?;
        returned_text(&self.method, value)
    }
}

/// `hidden()`: the whole object is hidden from the current interaction.
#[derive(Debug)]
pub struct HiddenObjectFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl HiddenObjectFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn hidden(&self, target: &Pojo) -> Result<bool, MetamodelError> {
        let value = self.method.call(target, &[])?;
        returned_bool(&self.method, value)
    }
}

/// `disabled()`: reason why the whole object is read-only, if it is.
#[derive(Debug)]
pub struct DisabledObjectFacetViaMethod {
    core: FacetCore,
    method: ClassMethod,
}

impl DisabledObjectFacetViaMethod {
    #[must_use]
    pub fn new(core: FacetCore, method: ClassMethod) -> Self {
        Self { core, method }
    }

    pub fn disabled_reason(&self, target: &Pojo) -> Result<Option<String>, MetamodelError> {
        let value = self.method.call(target, &[])?;
        returned_text(&self.method, value)
    }
}

crate::facet!(
    NamedFacet,
    DescribedAsFacet,
    LogicalTypeFacet,
    DomainObjectFacet,
    ValueFacet,
    EntityFacet,
    TitleFacetViaMethod,
    IconFacetViaMethod,
    CssClassFacetViaMethod,
    HiddenObjectFacetViaMethod,
    DisabledObjectFacetViaMethod,
);
