//! Manifest aggregation

use crate::registry::ComponentRegistry;
use meshctl_core::types::{ComponentName, ManifestMap, YAML_SEPARATOR};
use std::collections::HashMap;

/// Joins manifest fragments into per-component and whole-deployment documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestAggregator;

impl ManifestAggregator {
    /// One document per component, fragments joined in generation order.
    ///
    /// Components without fragments are left out.
    pub fn consolidate(manifests: &ManifestMap) -> HashMap<ComponentName, String> {
        manifests
            .iter()
            .filter(|(_, fragments)| !fragments.is_empty())
            .map(|(name, fragments)| (name.clone(), Self::merge_slices(fragments.as_slice())))
            .collect()
    }

    /// Every fragment of every component in a single document.
    ///
    /// Component order follows map iteration and is not stable; use
    /// [`consolidate`](Self::consolidate) or [`ordered`](Self::ordered) for
    /// anything order sensitive.
    pub fn flatten(manifests: &ManifestMap) -> String {
        let all: Vec<&str> = manifests
            .iter()
            .flat_map(|(_, fragments)| fragments.iter().map(String::as_str))
            .collect();
        all.join(YAML_SEPARATOR)
    }

    /// Join fragments with the document separator, without validating them
    pub fn merge_slices<S: AsRef<str>>(fragments: &[S]) -> String {
        let parts: Vec<&str> = fragments.iter().map(AsRef::as_ref).collect();
        parts.join(YAML_SEPARATOR)
    }

    /// Consolidated documents in the registry's removal order
    pub fn ordered(manifests: &ManifestMap, registry: &ComponentRegistry) -> Vec<(ComponentName, String)> {
        let mut consolidated = Self::consolidate(manifests);
        registry
            .removal_order(manifests.components())
            .into_iter()
            .filter_map(|name| consolidated.remove(&name).map(|doc| (name, doc)))
            .collect()
    }
}
