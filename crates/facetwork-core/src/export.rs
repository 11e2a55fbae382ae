//! # Metamodel Export
//!
//! A plain, deterministic snapshot of the loaded metamodel for tooling:
//! types, bean sorts, members, parameters and the facet types attached to
//! each feature. Facet behaviour is not exported, only which facets exist.
//!
//! The snapshot renders as JSON here and as a framed binary stream in
//! [`formats::snapshot`](crate::formats::snapshot).

use crate::facet::{FacetHolder, HasFacets, NamedFacet};
use crate::loader::SpecificationLoader;
use crate::spec::{
    AssociationKind, IntrospectionOutcome, ObjectAction, ObjectAssociation, ObjectSpecification,
};
use crate::{BeanSort, MetamodelError};
use serde::{Deserialize, Serialize};

// =============================================================================
// SNAPSHOT TYPES
// =============================================================================

/// One action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub index: usize,
    pub name: String,
    pub param_type: String,
    pub facets: Vec<String>,
}

/// One property or collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSnapshot {
    pub id: String,
    pub kind: AssociationKind,
    pub declared_type: String,
    pub facets: Vec<String>,
}

/// One action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSnapshot {
    pub id: String,
    pub return_type: String,
    pub parameters: Vec<ParameterSnapshot>,
    pub facets: Vec<String>,
}

/// One type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSnapshot {
    pub type_name: String,
    pub logical_type_name: String,
    pub bean_sort: BeanSort,
    pub supertype: Option<String>,
    pub outcome: IntrospectionOutcome,
    pub facets: Vec<String>,
    pub associations: Vec<AssociationSnapshot>,
    pub actions: Vec<ActionSnapshot>,
}

/// Every exported type, ordered by type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetamodelSnapshot {
    pub types: Vec<TypeSnapshot>,
}

// =============================================================================
// CAPTURE
// =============================================================================

fn facet_names(holder: &FacetHolder) -> Vec<String> {
    holder
        .facet_types()
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

impl From<&ObjectAssociation> for AssociationSnapshot {
    fn from(association: &ObjectAssociation) -> Self {
        Self {
            id: association.id().to_string(),
            kind: association.kind(),
            declared_type: association.declared_type().to_string(),
            facets: facet_names(association.facet_holder()),
        }
    }
}

impl From<&ObjectAction> for ActionSnapshot {
    fn from(action: &ObjectAction) -> Self {
        let parameters = action
            .parameters()
            .iter()
            .map(|p| ParameterSnapshot {
                index: p.index(),
                name: p
                    .get_facet::<NamedFacet>()
                    .map(|f| f.name().to_string())
                    .or_else(|| p.name().map(str::to_string))
                    .unwrap_or_default(),
                param_type: p.param_type().to_string(),
                facets: facet_names(p.facet_holder()),
            })
            .collect();
        Self {
            id: action.id().to_string(),
            return_type: action.return_type().to_string(),
            parameters,
            facets: facet_names(action.facet_holder()),
        }
    }
}

impl From<&ObjectSpecification> for TypeSnapshot {
    fn from(spec: &ObjectSpecification) -> Self {
        Self {
            type_name: spec.type_name().to_string(),
            logical_type_name: spec.logical_type_name().to_string(),
            bean_sort: spec.bean_sort(),
            supertype: spec.supertype().map(ToString::to_string),
            outcome: spec.outcome().clone(),
            facets: facet_names(spec.facet_holder()),
            associations: spec.associations().iter().map(Into::into).collect(),
            actions: spec.actions().iter().map(Into::into).collect(),
        }
    }
}

impl MetamodelSnapshot {
    /// Snapshot every published specification.
    ///
    /// Built-in value and collection types are skipped unless
    /// `include_builtins` is set.
    #[must_use]
    pub fn capture(loader: &SpecificationLoader, include_builtins: bool) -> Self {
        let registry = loader.registry();
        let types = loader
            .all_specifications()
            .iter()
            .filter(|spec| {
                include_builtins
                    || !registry
                        .get(spec.type_name())
                        .is_some_and(|class| class.is_builtin())
            })
            .map(|spec| TypeSnapshot::from(spec.as_ref()))
            .collect();
        Self { types }
    }

    /// Look up an exported type by name.
    #[must_use]
    pub fn find_type(&self, type_name: &str) -> Option<&TypeSnapshot> {
        self.types.iter().find(|t| t.type_name == type_name)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MetamodelError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MetamodelError::SerializationError(e.to_string()))
    }

    /// Parse a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, MetamodelError> {
        serde_json::from_str(json).map_err(|e| {
            MetamodelError::DeserializationError(format!("Invalid snapshot JSON: {e}"))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{Annotation, ClassDescriptor, ClassRegistry, MethodDescriptor, Nature};
    use crate::config::MetamodelConfig;
    use crate::factory::ProgrammingModel;
    use crate::persistence::NoPersistence;
    use crate::{TypeName, TypeRef};
    use std::sync::Arc;

    fn loader() -> SpecificationLoader {
        let registry = ClassRegistry::new()
            .with(
                ClassDescriptor::new("demo.Customer")
                    .annotate(Annotation::DomainObject(Nature::Entity))
                    .method(MethodDescriptor::new("getName").returns(TypeRef::text()))
                    .method(
                        MethodDescriptor::new("rename").param_with(
                            crate::class::ParamDescriptor::new(TypeRef::text()).named("newName"),
                        ),
                    ),
            )
            .expect("registry");
        let loader = SpecificationLoader::new(
            Arc::new(registry),
            ProgrammingModel::standard(),
            Arc::new(MetamodelConfig::default()),
            Arc::new(NoPersistence),
        );
        loader.load_specification(&TypeName::new("demo.Customer"));
        loader
    }

    #[test]
    fn capture_skips_builtins_by_default() {
        let loader = loader();
        let snapshot = MetamodelSnapshot::capture(&loader, false);
        let names: Vec<_> = snapshot.types.iter().map(|t| t.type_name.as_str()).collect();
        assert_eq!(names, vec!["demo.Customer"]);

        let full = MetamodelSnapshot::capture(&loader, true);
        assert!(full.find_type("String").is_some());
    }

    #[test]
    fn capture_lists_members_and_facets() {
        let snapshot = MetamodelSnapshot::capture(&loader(), false);
        let customer = snapshot.find_type("demo.Customer").expect("customer");
        assert_eq!(customer.bean_sort, BeanSort::Entity);
        assert!(customer.facets.contains(&"EntityFacet".to_string()));

        let name = &customer.associations[0];
        assert_eq!(name.id, "name");
        assert!(name.facets.contains(&"AccessorFacetViaMethod".to_string()));

        let rename = &customer.actions[0];
        assert_eq!(rename.parameters[0].name, "New Name");
    }

    #[test]
    fn json_is_deterministic_and_parses_back() {
        let loader = loader();
        let first = MetamodelSnapshot::capture(&loader, true).to_json().expect("json");
        let second = MetamodelSnapshot::capture(&loader, true).to_json().expect("json");
        assert_eq!(first, second);

        let parsed = MetamodelSnapshot::from_json(&first).expect("parse");
        assert_eq!(parsed, MetamodelSnapshot::capture(&loader, true));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            MetamodelSnapshot::from_json("{not json"),
            Err(MetamodelError::DeserializationError(_))
        ));
    }
}
