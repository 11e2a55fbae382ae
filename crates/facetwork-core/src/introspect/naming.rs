//! Naming helpers for the method-naming convention.

use crate::primitives::{GET_PREFIX, IS_PREFIX, SET_PREFIX};

/// Upper-case the first character (`name` → `Name`).
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character (`Name` → `name`).
#[must_use]
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human readable name of a member id (`firstName` → `First Name`).
#[must_use]
pub fn natural_name(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 4);
    let mut prev_lower = false;
    for (i, c) in id.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() && prev_lower {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    out
}

/// Strip `prefix` and require an upper-case character to follow it.
///
/// `strip_convention_prefix("getName", "get")` → `Some("Name")`, while
/// `"getaway"` does not match.
#[must_use]
pub fn strip_convention_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase() || c.is_ascii_digit())
        .map(|_| rest)
}

/// Member id of an accessor (`getName` → `name`, `isActive` → `active`).
#[must_use]
pub fn member_id_from_accessor(name: &str) -> Option<String> {
    strip_convention_prefix(name, GET_PREFIX)
        .or_else(|| strip_convention_prefix(name, IS_PREFIX))
        .map(decapitalize)
}

/// Member id of a mutator (`setName` → `name`).
#[must_use]
pub fn member_id_from_mutator(name: &str) -> Option<String> {
    strip_convention_prefix(name, SET_PREFIX).map(decapitalize)
}

/// Name of a supporting method for a member (`choices` + `name` → `choicesName`).
#[must_use]
pub fn supporting_method_name(prefix: &str, member_id: &str) -> String {
    format!("{prefix}{}", capitalize(member_id))
}

/// Name of a parameter-scoped supporting method
/// (`choices` + 0 + `placeOrder` → `choices0PlaceOrder`).
#[must_use]
pub fn parameter_method_name(prefix: &str, index: usize, member_id: &str) -> String {
    format!("{prefix}{index}{}", capitalize(member_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalization() {
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(decapitalize("Name"), "name");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn natural_names() {
        assert_eq!(natural_name("firstName"), "First Name");
        assert_eq!(natural_name("name"), "Name");
        assert_eq!(natural_name("placeOrder"), "Place Order");
        assert_eq!(natural_name("URL"), "URL");
    }

    #[test]
    fn accessor_member_ids() {
        assert_eq!(member_id_from_accessor("getName").as_deref(), Some("name"));
        assert_eq!(member_id_from_accessor("isActive").as_deref(), Some("active"));
        assert_eq!(member_id_from_accessor("getaway"), None);
        assert_eq!(member_id_from_accessor("issue"), None);
        assert_eq!(member_id_from_mutator("setName").as_deref(), Some("name"));
    }

    #[test]
    fn supporting_names() {
        assert_eq!(supporting_method_name("choices", "name"), "choicesName");
        assert_eq!(
            parameter_method_name("default", 1, "placeOrder"),
            "default1PlaceOrder"
        );
    }
}
