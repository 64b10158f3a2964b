//! Field and class filtering.
//!
//! Narrows which record types and which fields participate in auditing.
//! The filter is applied identically to the old and new attribute maps, so
//! filtering can never create a spurious diff on its own.

use trail_core::AttributeMap;

/// True when the record type is exempt from auditing entirely.
pub fn should_skip_type(type_name: &str, ignored_classes: &[String]) -> bool {
    ignored_classes.iter().any(|class| class == type_name)
}

/// Reduce an attribute map to the fields eligible for auditing.
///
/// A non-empty allow-list narrows first; the ignore-list subtracts after,
/// regardless. Both lists are optional and independently empty by default,
/// meaning no restriction.
pub fn apply(attributes: AttributeMap, allowed: &[String], ignored: &[String]) -> AttributeMap {
    attributes
        .into_iter()
        .filter(|(name, _)| allowed.is_empty() || allowed.iter().any(|a| a == name))
        .filter(|(name, _)| !ignored.iter().any(|i| i == name))
        .collect()
}
