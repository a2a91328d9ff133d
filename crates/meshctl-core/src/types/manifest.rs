//! Per-component rendered manifests

use super::ComponentName;
use std::collections::hash_map;
use std::collections::HashMap;

/// Separator placed between YAML documents
pub const YAML_SEPARATOR: &str = "\n---\n";

/// Rendered manifest fragments keyed by owning component.
///
/// Fragment order within a component is generation order and is never
/// changed. Iteration order across components is not stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestMap(HashMap<ComponentName, Vec<String>>);

impl ManifestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to the component's sequence
    pub fn push(&mut self, component: ComponentName, fragment: impl Into<String>) {
        self.0.entry(component).or_default().push(fragment.into());
    }

    /// Replace the component's whole sequence
    pub fn insert(&mut self, component: ComponentName, fragments: Vec<String>) {
        self.0.insert(component, fragments);
    }

    pub fn get(&self, component: &str) -> Option<&[String]> {
        self.0.get(component).map(Vec::as_slice)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.0.contains_key(component)
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentName> {
        self.0.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, ComponentName, Vec<String>> {
        self.0.iter()
    }

    /// Number of components, including those with no fragments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of fragments across all components
    pub fn fragment_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl<'a> IntoIterator for &'a ManifestMap {
    type Item = (&'a ComponentName, &'a Vec<String>);
    type IntoIter = hash_map::Iter<'a, ComponentName, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(ComponentName, Vec<String>)> for ManifestMap {
    fn from_iter<I: IntoIterator<Item = (ComponentName, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
