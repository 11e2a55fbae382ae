use super::TypeName;
use crate::validate::ValidationFailures;
use thiserror::Error;

/// Errors that can occur in the metamodel engine.
///
/// - Absent facets are never errors; holders answer `None`.
/// - `DomainModel` and `Unintrospectable` are unrecoverable convention
///   violations raised at the point of use.
/// - `Validation` carries the whole batch of findings from one pass.
#[derive(Debug, Error)]
pub enum MetamodelError {
    /// The domain model violates a programming convention
    /// (e.g. a choices method returning the wrong shape).
    #[error("Domain model error at {origin}: {message}")]
    DomainModel { origin: String, message: String },

    /// A specification that could not be introspected was used as a
    /// first-class member.
    #[error("Type '{type_name}' is not introspectable: {reason}")]
    Unintrospectable { type_name: TypeName, reason: String },

    /// No class descriptor is registered under this name.
    #[error("Unknown type: {0}")]
    UnknownType(TypeName),

    /// A class descriptor was registered twice.
    #[error("Type already registered: {0}")]
    DuplicateType(TypeName),

    /// Population was attempted on a read-only collection strategy.
    #[error("Collection of type '{0}' is read-only")]
    ReadOnlyCollection(TypeName),

    /// The underlying domain method failed or was called incorrectly.
    #[error("Invocation of '{method}' failed: {message}")]
    Invocation { method: String, message: String },

    /// The validation pass found problems and validation is strict.
    #[error("Metamodel validation failed with {} failure(s)", .0.len())]
    Validation(ValidationFailures),

    /// A programming model edit referred to a factory that does not exist.
    #[error("Facet factory not found: {0}")]
    FactoryNotFound(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred in an application layer.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl MetamodelError {
    /// Build a domain model error for the given origin.
    pub fn domain_model(origin: impl ToString, message: impl Into<String>) -> Self {
        Self::DomainModel {
            origin: origin.to_string(),
            message: message.into(),
        }
    }

    /// Build an invocation error for the given method.
    pub fn invocation(method: impl ToString, message: impl Into<String>) -> Self {
        Self::Invocation {
            method: method.to_string(),
            message: message.into(),
        }
    }
}
