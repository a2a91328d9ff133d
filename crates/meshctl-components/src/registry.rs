//! Component registry
//!
//! The registry is the naming authority for components:
//! - fixed core, gateway and operator identifiers registered at construction
//! - deprecated identifiers loaded from a version-pinned naming file
//! - addon identifiers appended once by [`AddonDiscovery`](crate::AddonDiscovery)
//!
//! It is append-only after initialisation. An identifier never changes
//! category and is never removed.

use meshctl_core::error::{Error, Result};
use meshctl_core::resources::{names_config_path, ResourceStore};
use meshctl_core::types::{ComponentCategory, ComponentName};
use meshctl_core::version::MinorVersion;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Label returned for unrecognised components
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Legacy `values` enablement paths and their current equivalents
const BASE_ENABLEMENT_PATHS: &[(&str, &str)] = &[
    (
        "values.gateways.istio-ingressgateway.enabled",
        "components.ingressGateways.[name:istio-ingressgateway].enabled",
    ),
    (
        "values.gateways.istio-egressgateway.enabled",
        "components.egressGateways.[name:istio-egressgateway].enabled",
    ),
];

/// Naming file contents (translateConfig/names-<minor>.yaml)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentNamesConfig {
    #[serde(default, alias = "DeprecatedComponentNames")]
    deprecated_component_names: Vec<String>,
}

#[derive(Debug, Default)]
struct RegistryState {
    categories: HashMap<ComponentName, ComponentCategory>,
    deprecated: HashSet<ComponentName>,
    enablement_paths: BTreeMap<String, String>,
}

impl RegistryState {
    fn check(&self, id: &ComponentName, category: ComponentCategory) -> Result<()> {
        match self.categories.get(id) {
            Some(existing) if *existing != category => {
                Err(Error::conflict(id.as_str(), existing, category))
            }
            _ => Ok(()),
        }
    }
}

/// Registry of known components
#[derive(Debug)]
pub struct ComponentRegistry {
    state: RwLock<RegistryState>,
}

impl ComponentRegistry {
    /// Create a registry holding the fixed component identifiers
    pub fn new() -> Self {
        let mut state = RegistryState::default();
        for id in ComponentName::ALL_CORE {
            state.categories.insert(id, ComponentCategory::Core);
        }
        for id in ComponentName::ALL_GATEWAYS {
            state.categories.insert(id, ComponentCategory::Gateway);
        }
        state
            .categories
            .insert(ComponentName::ADDON_COMPONENTS, ComponentCategory::Addon);
        for id in ComponentName::ALL_OPERATOR_META {
            state.categories.insert(id, ComponentCategory::OperatorMeta);
        }
        for (legacy, current) in BASE_ENABLEMENT_PATHS {
            state
                .enablement_paths
                .insert(legacy.to_string(), current.to_string());
        }
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a component.
    ///
    /// Registering an identifier again with the same category is a no-op;
    /// with a different category it fails with `Error::Conflict`.
    pub fn register(&self, id: ComponentName, category: ComponentCategory) -> Result<()> {
        let mut state = self.write();
        state.check(&id, category)?;
        debug!("Registering component {} as {}", id, category);
        state.categories.insert(id, category);
        Ok(())
    }

    /// Register discovered addons together with their enablement paths.
    ///
    /// The batch is applied under a single write lock and only after every
    /// name has been checked, so readers see either none or all of it.
    pub fn register_addons(&self, names: &[ComponentName]) -> Result<()> {
        let mut state = self.write();
        for name in names {
            state.check(name, ComponentCategory::Addon)?;
        }
        for name in names {
            let enablement = name.lower_first();
            state
                .categories
                .insert(name.clone(), ComponentCategory::Addon);
            state.enablement_paths.insert(
                format!("values.{}.enabled", enablement),
                format!("addonComponents.{}.enabled", enablement),
            );
        }
        info!("Registered {} addon components", names.len());
        Ok(())
    }

    /// Category of a registered component
    pub fn category(&self, id: &str) -> Option<ComponentCategory> {
        self.read().categories.get(id).copied()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.read().categories.contains_key(id)
    }

    pub fn is_core(&self, id: &str) -> bool {
        self.category(id) == Some(ComponentCategory::Core)
    }

    pub fn is_gateway(&self, id: &str) -> bool {
        self.category(id) == Some(ComponentCategory::Gateway)
    }

    pub fn is_addon(&self, id: &str) -> bool {
        self.category(id) == Some(ComponentCategory::Addon)
    }

    pub fn is_deprecated(&self, id: &str) -> bool {
        self.read().deprecated.contains(id)
    }

    /// Deprecated components, sorted by name
    pub fn deprecated(&self) -> Vec<ComponentName> {
        let mut ids: Vec<_> = self.read().deprecated.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Load the deprecated component names for a minor version.
    ///
    /// Replaces any previously loaded set.
    pub fn load_deprecated(&self, store: &dyn ResourceStore, minor_version: MinorVersion) -> Result<()> {
        let path = names_config_path(&minor_version.to_string());
        let data = store.read_file(&path)?;
        let config: ComponentNamesConfig =
            serde_yaml_ng::from_slice(&data).map_err(|e| Error::parse(path.as_str(), e))?;

        let deprecated: HashSet<ComponentName> = config
            .deprecated_component_names
            .into_iter()
            .map(ComponentName::from)
            .collect();
        debug!(
            "Loaded {} deprecated component names from {}",
            deprecated.len(),
            path
        );
        self.write().deprecated = deprecated;
        Ok(())
    }

    /// Name of the component as shown in progress output
    pub fn user_facing_label(&self, id: &str) -> &'static str {
        match id {
            "Base" => "Istio core",
            "Pilot" => "Istiod",
            "Policy" => "Policy",
            "Telemetry" => "Telemetry",
            "Cni" => "CNI",
            "IngressGateways" => "Ingress gateways",
            "EgressGateways" => "Egress gateways",
            "AddonComponents" => "Addons",
            "IstioOperator" => "Istio operator",
            "IstioOperatorCustomResource" => "Istio operator CRDs",
            "IstiodRemote" => "Istiod remote",
            _ => UNKNOWN_LABEL,
        }
    }

    /// Current-schema path for a legacy enablement path
    pub fn translate_enablement_path(&self, legacy: &str) -> Option<String> {
        self.read().enablement_paths.get(legacy).cloned()
    }

    /// Snapshot of the legacy to current enablement path table
    pub fn enablement_paths(&self) -> BTreeMap<String, String> {
        self.read().enablement_paths.clone()
    }

    /// Order components for removal.
    ///
    /// Addons and unrecognised components go first, then gateways, then core
    /// components in reverse install order, then operator components.
    pub fn removal_order<'a, I>(&self, ids: I) -> Vec<ComponentName>
    where
        I: IntoIterator<Item = &'a ComponentName>,
    {
        let mut ranked: Vec<(usize, ComponentName)> = ids
            .into_iter()
            .map(|id| (self.removal_rank(id), id.clone()))
            .collect();
        ranked.sort();
        ranked.into_iter().map(|(_, id)| id).collect()
    }

    fn removal_rank(&self, id: &ComponentName) -> usize {
        let core_count = ComponentName::ALL_CORE.len();
        match self.category(id.as_str()) {
            None | Some(ComponentCategory::Addon) => 0,
            Some(ComponentCategory::Gateway) => 1,
            Some(ComponentCategory::Core) => {
                let pos = ComponentName::ALL_CORE
                    .iter()
                    .position(|c| c == id)
                    .unwrap_or(0);
                2 + (core_count - 1 - pos)
            }
            Some(ComponentCategory::OperatorMeta) => 2 + core_count,
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
