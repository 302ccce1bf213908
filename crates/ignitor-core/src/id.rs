use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies an external igniter device in the registry.
    pub struct ExternalIgnitorId;

    /// Identifies a carried ignitor charge pack in the registry.
    pub struct ChargePackId;
}

/// Opaque handle to a host-world part. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartId(pub u64);

/// Identifies a resource definition in the host's resource library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

/// Ignitor compatibility class.
///
/// Matching is case-insensitive, and the `"universal"` class serves every
/// engine regardless of its required type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitorType(String);

impl IgnitorType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn universal() -> Self {
        Self("universal".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_universal(&self) -> bool {
        self.0.eq_ignore_ascii_case("universal")
    }

    /// True when a source of this type can ignite an engine requiring
    /// `required`.
    pub fn serves(&self, required: &IgnitorType) -> bool {
        self.is_universal() || self.0.eq_ignore_ascii_case(&required.0)
    }
}

impl Default for IgnitorType {
    fn default() -> Self {
        Self("type0".to_string())
    }
}

impl std::fmt::Display for IgnitorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive() {
        let a = IgnitorType::new("Type0");
        let b = IgnitorType::new("type0");
        assert!(a.serves(&b));
        assert!(b.serves(&a));
    }

    #[test]
    fn universal_serves_everything() {
        let u = IgnitorType::new("Universal");
        assert!(u.is_universal());
        assert!(u.serves(&IgnitorType::new("type3")));
    }

    #[test]
    fn mismatched_types_do_not_serve() {
        let a = IgnitorType::new("type0");
        let b = IgnitorType::new("type1");
        assert!(!a.serves(&b));
    }

    #[test]
    fn part_ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(PartId(1), "engine");
        assert_eq!(map[&PartId(1)], "engine");
    }
}
