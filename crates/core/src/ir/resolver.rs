//! Reference resolver: stable, collision-free identifiers for schema keys.

use indexmap::{IndexMap, IndexSet};

use super::utils::sanitize_type_name;
use crate::spec::decode_pointer_segment;

/// Names the generated file declares at the top level. Schema validators
/// share that scope, so these are never handed out.
pub const GENERATED_NAMES: [&str; 22] = [
    "Schemas",
    "Endpoints",
    "EndpointByMethod",
    "EndpointParameters",
    "MutationMethod",
    "Method",
    "RequestFormat",
    "DefaultEndpoint",
    "Endpoint",
    "Fetcher",
    "RequiredKeys",
    "MaybeOptionalArg",
    "ApiClient",
    "createApiClient",
    "GetEndpoints",
    "PostEndpoints",
    "PutEndpoints",
    "PatchEndpoints",
    "DeleteEndpoints",
    "AllEndpoints",
    "__Schemas",
    // TypeBox import
    "Type",
];

/// Assigns identifiers in first-seen order; a clash gets a numeric suffix
/// starting at 2. Each generation run owns its own registry.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    by_key: IndexMap<String, String>,
    taken: IndexSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that will never produce any of `names`.
    pub fn with_reserved<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.taken.insert(name.to_string());
        }
        registry
    }

    /// Registry for schema identifiers, pre-seeded with generated names.
    pub fn for_schemas() -> Self {
        Self::with_reserved(GENERATED_NAMES)
    }

    /// Identifier for a schema key, deriving it from the last pointer segment.
    pub fn resolve(&mut self, key: &str) -> String {
        let base = key.rsplit('/').next().unwrap_or(key);
        let base = sanitize_type_name(&decode_pointer_segment(base));
        self.resolve_as(key, &base)
    }

    /// Identifier for `key`, starting from an already sanitized base name.
    /// Repeated calls with the same key return the same identifier.
    pub fn resolve_as(&mut self, key: &str, base: &str) -> String {
        if let Some(existing) = self.by_key.get(key) {
            return existing.clone();
        }
        let mut candidate = base.to_string();
        let mut suffix = 2usize;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        self.by_key.insert(key.to_string(), candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_stable() {
        let mut registry = NameRegistry::for_schemas();
        let first = registry.resolve("#/components/schemas/Pet");
        let again = registry.resolve("#/components/schemas/Pet");
        assert_eq!(first, "Pet");
        assert_eq!(again, "Pet");
    }

    #[test]
    fn test_collision_suffix_in_first_seen_order() {
        let mut registry = NameRegistry::for_schemas();
        assert_eq!(registry.resolve("#/components/schemas/pet-item"), "PetItem");
        assert_eq!(registry.resolve("#/components/schemas/pet.item"), "PetItem2");
        assert_eq!(registry.resolve("#/components/schemas/Pet_Item"), "PetItem3");
    }

    #[test]
    fn test_generated_names_are_reserved() {
        let mut registry = NameRegistry::for_schemas();
        assert_eq!(registry.resolve("#/components/schemas/ApiClient"), "ApiClient2");
        assert_eq!(registry.resolve("#/components/schemas/Schemas"), "Schemas2");
    }

    #[test]
    fn test_pointer_escapes_decoded() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.resolve("#/components/schemas/a~1b"), "AB");
    }

    #[test]
    fn test_resolve_as() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.resolve_as("x", "get_Pets"), "get_Pets");
        assert_eq!(registry.resolve_as("y", "get_Pets"), "get_Pets2");
        assert_eq!(registry.resolve_as("y", "ignored"), "get_Pets2");
    }
}
