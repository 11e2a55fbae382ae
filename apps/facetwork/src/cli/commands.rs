//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::demo::{self, DemoPersistence};
use facetwork_core::export::TypeSnapshot;
use facetwork_core::facet::{HasFacets, NamedFacet};
use facetwork_core::primitives::MAGIC_BYTES;
use facetwork_core::{
    MetaModelContext, MetamodelConfig, MetamodelError, MetamodelSnapshot, ObjectSpecification,
    TypeName, snapshot_from_bytes, snapshot_to_bytes,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum size of a snapshot file (64 MB).
const MAX_SNAPSHOT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), MetamodelError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| MetamodelError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(MetamodelError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, MetamodelError> {
    let canonical = path.canonicalize().map_err(|e| {
        MetamodelError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(MetamodelError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path whose parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, MetamodelError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        MetamodelError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(MetamodelError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| MetamodelError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Read the configuration file, or use defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<MetamodelConfig, MetamodelError> {
    let Some(path) = path else {
        return Ok(MetamodelConfig::default());
    };
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_CONFIG_FILE_SIZE)?;
    let source = std::fs::read_to_string(&validated)
        .map_err(|e| MetamodelError::IoError(format!("Read file: {}", e)))?;
    let config = MetamodelConfig::from_toml_str(&source)?;
    tracing::debug!(path = %validated.display(), "configuration loaded");
    Ok(config)
}

/// Metamodel context over the demo domain.
pub fn demo_context(config: MetamodelConfig) -> Result<MetaModelContext, MetamodelError> {
    Ok(MetaModelContext::builder(demo::registry()?)
        .config(config)
        .persistence(Arc::new(DemoPersistence))
        .build())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

fn print_specification(ctx: &MetaModelContext, spec: &ObjectSpecification) {
    let name = ctx
        .loader()
        .lookup_facet::<NamedFacet>(spec)
        .map(|f| f.name().to_string())
        .unwrap_or_else(|| spec.type_name().simple_name().to_string());

    println!("{} ({})", spec.type_name(), name);
    println!("  Logical name: {}", spec.logical_type_name());
    println!("  Bean sort:    {}", spec.bean_sort());
    if let Some(supertype) = spec.supertype() {
        println!("  Supertype:    {}", supertype);
    }
    if let facetwork_core::IntrospectionOutcome::Unintrospectable(reason) = spec.outcome() {
        println!("  NOT INTROSPECTABLE: {}", reason);
        return;
    }

    for association in spec.associations() {
        println!(
            "  {:<10} {:<12} : {:<16} [{}]",
            if association.is_property() { "property" } else { "collection" },
            association.id(),
            association.declared_type().to_string(),
            association
                .facet_holder()
                .facet_types()
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    for action in spec.actions() {
        let params = action
            .parameters()
            .iter()
            .map(|p| {
                let label = p
                    .get_facet::<NamedFacet>()
                    .map(|f| f.name().to_string())
                    .unwrap_or_default();
                format!("{}: {}", label, p.param_type())
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<10} {}({}) -> {}",
            "action",
            action.id(),
            params,
            action.return_type()
        );
    }
}

/// Show one specification, or every registered domain type.
pub fn cmd_inspect(
    config: MetamodelConfig,
    json_mode: bool,
    type_name: Option<&str>,
) -> Result<(), MetamodelError> {
    let ctx = demo_context(config)?;

    let names: Vec<TypeName> = match type_name {
        Some(name) => {
            let name = TypeName::new(name);
            if !ctx.loader().registry().contains(&name) {
                return Err(MetamodelError::UnknownType(name));
            }
            vec![name]
        }
        None => ctx.loader().registry().domain_types().cloned().collect(),
    };
    let specs: Vec<_> = names.iter().map(|n| ctx.specification(n)).collect();

    if json_mode {
        let types: Vec<TypeSnapshot> = specs.iter().map(|s| TypeSnapshot::from(s.as_ref())).collect();
        let output = serde_json::to_value(&types)
            .map_err(|e| MetamodelError::SerializationError(e.to_string()))?;
        print_json(&output);
        return Ok(());
    }

    println!("Facetwork Metamodel");
    println!("===================");
    for spec in &specs {
        println!();
        print_specification(&ctx, spec);
    }

    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Prime the metamodel and report what the validation pass found.
pub fn cmd_validate(
    mut config: MetamodelConfig,
    json_mode: bool,
    strict: bool,
) -> Result<(), MetamodelError> {
    config.validation.strict |= strict;
    let ctx = demo_context(config)?;

    let report = match ctx.prime() {
        Ok(report) => report,
        Err(MetamodelError::Validation(report)) => {
            print_report(json_mode, &report, &ctx);
            return Err(MetamodelError::Validation(report));
        }
        Err(e) => return Err(e),
    };
    print_report(json_mode, &report, &ctx);

    Ok(())
}

fn print_report(
    json_mode: bool,
    report: &facetwork_core::ValidationFailures,
    ctx: &MetaModelContext,
) {
    if json_mode {
        let output = serde_json::json!({
            "specifications": ctx.loader().all_specifications().len(),
            "introspections": ctx.loader().introspection_count(),
            "failures": report,
        });
        print_json(&output);
        return;
    }

    println!("Facetwork Validation");
    println!("====================");
    println!("Specifications: {}", ctx.loader().all_specifications().len());
    println!("Failures:       {}", report.len());
    for failure in report.iter() {
        println!("  - {}", failure);
    }
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write a snapshot of the primed metamodel.
pub fn cmd_export(
    config: MetamodelConfig,
    output: &Path,
    format: &str,
    builtins: bool,
) -> Result<(), MetamodelError> {
    let validated_output = validate_output_path(output)?;

    let ctx = demo_context(config)?;
    ctx.prime()?;
    let snapshot = MetamodelSnapshot::capture(ctx.loader(), builtins);

    let data = match format {
        "json" => snapshot.to_json()?.into_bytes(),
        "binary" => snapshot_to_bytes(&snapshot)?,
        _ => {
            return Err(MetamodelError::SerializationError(format!(
                "Unknown format: {}. Use: json, binary",
                format
            )));
        }
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| MetamodelError::IoError(format!("Write file: {}", e)))?;

    println!(
        "Exported {} types ({} bytes) to {:?}",
        snapshot.types.len(),
        data.len(),
        validated_output
    );

    Ok(())
}

// =============================================================================
// DECODE COMMAND
// =============================================================================

/// Read a snapshot file, binary or JSON, detected by its header.
pub fn read_snapshot(input: &Path) -> Result<MetamodelSnapshot, MetamodelError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_SNAPSHOT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| MetamodelError::IoError(format!("Read file: {}", e)))?;

    if data.starts_with(MAGIC_BYTES) {
        snapshot_from_bytes(&data)
    } else {
        let text = String::from_utf8(data).map_err(|e| {
            MetamodelError::DeserializationError(format!("Snapshot is not UTF-8: {}", e))
        })?;
        MetamodelSnapshot::from_json(&text)
    }
}

/// Summarize a snapshot file.
pub fn cmd_decode(input: &Path, json_mode: bool) -> Result<(), MetamodelError> {
    let snapshot = read_snapshot(input)?;

    if json_mode {
        let types: Vec<_> = snapshot
            .types
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type_name": t.type_name,
                    "bean_sort": t.bean_sort,
                    "associations": t.associations.len(),
                    "actions": t.actions.len(),
                })
            })
            .collect();
        print_json(&serde_json::json!({ "types": types }));
        return Ok(());
    }

    println!("Snapshot: {:?}", input);
    println!("Types:    {}", snapshot.types.len());
    for t in &snapshot.types {
        println!(
            "  {:<24} {:<12} {} association(s), {} action(s)",
            t.type_name,
            t.bean_sort.to_string(),
            t.associations.len(),
            t.actions.len()
        );
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_without_path() {
        assert_eq!(load_config(None).expect("config"), MetamodelConfig::default());
    }

    #[test]
    fn missing_config_is_io_error() {
        let result = load_config(Some(Path::new("/nonexistent/facetwork.toml")));
        assert!(matches!(result, Err(MetamodelError::IoError(_))));
    }

    #[test]
    fn output_path_in_current_directory() {
        let path = validate_output_path(Path::new("snapshot.json")).expect("path");
        assert!(path.ends_with("snapshot.json"));
    }

    #[test]
    fn unknown_type_rejected() {
        let result = cmd_inspect(MetamodelConfig::default(), true, Some("demo.Missing"));
        assert!(matches!(result, Err(MetamodelError::UnknownType(_))));
    }
}
