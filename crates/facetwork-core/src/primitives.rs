//! # Naming Conventions & Limits
//!
//! Hardcoded constants of the metamodel engine.
//!
//! The method-naming convention is the de facto contract between domain
//! authors and the engine: factories recognize supporting methods purely by
//! prefix and signature shape. These prefixes are compiled in and immutable.

// =============================================================================
// BUILT-IN TYPE NAMES
// =============================================================================

/// Root of every specification graph.
pub const OBJECT_TYPE: &str = "Object";

/// Built-in boolean value type.
pub const BOOL_TYPE: &str = "bool";

/// Built-in integer value type.
pub const INT_TYPE: &str = "i64";

/// Built-in text value type.
pub const TEXT_TYPE: &str = "String";

/// Growable ordered collection.
pub const LIST_TYPE: &str = "List";

/// Growable collection without duplicates.
pub const SET_TYPE: &str = "Set";

/// Fixed-size array.
pub const ARRAY_TYPE: &str = "Array";

/// Read-only wrapper around ad hoc result sets.
pub const STANDALONE_LIST_TYPE: &str = "StandaloneList";

// =============================================================================
// ACCESSOR PREFIXES
// =============================================================================

/// Accessor prefix for any property or collection.
pub const GET_PREFIX: &str = "get";

/// Accessor prefix for boolean properties.
pub const IS_PREFIX: &str = "is";

/// Mutator prefix.
pub const SET_PREFIX: &str = "set";

// =============================================================================
// SUPPORTING METHOD PREFIXES
// =============================================================================

/// `choicesXxx` — candidate values for a property, an action, or (with a
/// parameter index) a single parameter.
pub const CHOICES_PREFIX: &str = "choices";

/// `autoCompleteXxx(String)` — search-driven candidates for a property.
pub const AUTO_COMPLETE_PREFIX: &str = "autoComplete";

/// `defaultXxx` — default value(s).
pub const DEFAULT_PREFIX: &str = "default";

/// `hideXxx` — hide a member for the current target.
pub const HIDE_PREFIX: &str = "hide";

/// `disableXxx` — disable a member, returning a reason.
pub const DISABLE_PREFIX: &str = "disable";

/// `validateXxx` — validate a proposed value or argument list.
pub const VALIDATE_PREFIX: &str = "validate";

// =============================================================================
// OBJECT SUPPORT METHODS
// =============================================================================

/// Object-level title method.
pub const TITLE_METHOD: &str = "title";

/// Object-level icon name method.
pub const ICON_NAME_METHOD: &str = "iconName";

/// Object-level CSS class method.
pub const CSS_CLASS_METHOD: &str = "cssClass";

/// Object-level hidden method.
pub const HIDDEN_METHOD: &str = "hidden";

/// Object-level disabled method.
pub const DISABLED_METHOD: &str = "disabled";

/// Methods every class inherits from the platform and that never become
/// members.
pub const IGNORED_METHOD_NAMES: &[&str] = &["toString", "hashCode", "equals"];

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the binary metamodel snapshot header.
///
/// - File Header = Magic Bytes ("FWMM") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"FWMM";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum size accepted when decoding a binary snapshot (64 MB).
pub const MAX_SNAPSHOT_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;
