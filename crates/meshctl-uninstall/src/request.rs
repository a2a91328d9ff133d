//! Uninstall inputs and the resolved uninstall request

use meshctl_components::ComponentRegistry;
use meshctl_core::error::{Error, Result};
use meshctl_core::tpath;
use meshctl_core::types::{ControlPlaneSpec, ManifestMap, DEFAULT_NAMESPACE};
use serde_yaml_ng::Value;
use tracing::debug;

/// Path set by the `--manifests` flag alias
pub const INSTALL_PACKAGE_PATH: &str = "installPackagePath";

/// Path set by the `--revision` flag alias
pub const REVISION_PATH: &str = "revision";

/// Raw caller inputs for an uninstall
#[derive(Debug, Clone, Default)]
pub struct UninstallOptions {
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
    /// Target revision, empty for the default revision
    pub revision: String,
    /// Operator file describing the control plane to remove
    pub filename: Option<String>,
    /// Remove resources of every revision plus shared resources
    pub purge: bool,
    /// Proceed despite generation warnings
    pub force: bool,
    /// `path=value` overrides
    pub set: Vec<String>,
    /// Charts and pre-rendered manifests directory
    pub manifests_path: Option<String>,
    /// Control plane namespace used when the spec names none.
    /// `None` means `istio-system`.
    pub istio_namespace: Option<String>,
    pub skip_confirmation: bool,
    pub dry_run: bool,
}

impl UninstallOptions {
    /// Check that the options name something to remove.
    ///
    /// At least one of revision, filename or purge must be set.
    pub fn validate(&self) -> Result<()> {
        if self.revision.is_empty() && self.filename().is_none() && !self.purge {
            return Err(Error::usage(
                "at least one of the --revision, --filename or --purge flags must be set",
            ));
        }
        Ok(())
    }

    /// Operator file, treating an empty string as unset
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }

    /// Manifests directory, treating an empty string as unset
    /// Namespace used when neither the spec nor its values name one
    pub fn namespace_fallback(&self) -> &str {
        self.istio_namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn manifests_path(&self) -> Option<&str> {
        self.manifests_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Overrides handed to the manifest generator.
    ///
    /// `--set` values come first, with legacy enablement paths translated
    /// through `registry`; the `--manifests` and `--revision` flags follow as
    /// `installPackagePath` and `revision` overrides.
    pub fn overrides(&self, registry: &ComponentRegistry) -> Result<Vec<SetOverride>> {
        let mut overrides = self
            .set
            .iter()
            .map(|raw| SetOverride::parse(raw).map(|o| o.translated(registry)))
            .collect::<Result<Vec<_>>>()?;

        if let Some(dir) = self.manifests_path() {
            overrides.push(SetOverride::new(INSTALL_PACKAGE_PATH, Value::from(dir)));
        }
        if !self.revision.is_empty() {
            overrides.push(SetOverride::new(REVISION_PATH, Value::from(self.revision.as_str())));
        }
        Ok(overrides)
    }
}

/// A single `path=value` override
#[derive(Debug, Clone, PartialEq)]
pub struct SetOverride {
    pub path: String,
    pub value: Value,
}

impl SetOverride {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    /// Parse `path=value`. The value is read as a YAML scalar, so `true` and
    /// `5` become a bool and a number.
    pub fn parse(raw: &str) -> Result<Self> {
        let (path, value) = raw
            .split_once('=')
            .ok_or_else(|| Error::invalid_override(raw, "expected path=value"))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::invalid_override(raw, "empty path"));
        }
        Ok(Self::new(path, tpath::parse_scalar(value.trim())))
    }

    /// Replace a legacy enablement path with its current equivalent
    pub fn translated(self, registry: &ComponentRegistry) -> Self {
        match registry.translate_enablement_path(&self.path) {
            Some(current) => {
                debug!("Translated legacy path {} to {}", self.path, current);
                Self {
                    path: current,
                    value: self.value,
                }
            }
            None => self,
        }
    }

    /// Spec with this override applied
    pub fn apply(&self, spec: &ControlPlaneSpec) -> Result<ControlPlaneSpec> {
        spec.with_path(&self.path, self.value.clone())
    }
}

/// What an uninstall removes
#[derive(Debug, Clone)]
pub enum UninstallRequest {
    /// Everything labelled with a revision, or everything with `purge`
    PruneByRevision { revision: String, purge: bool },

    /// Exactly the resources named by generated manifests
    DeleteByManifest {
        manifests: ManifestMap,
        spec: ControlPlaneSpec,
        revision: String,
        purge: bool,
    },
}

impl UninstallRequest {
    pub fn revision(&self) -> &str {
        match self {
            Self::PruneByRevision { revision, .. } | Self::DeleteByManifest { revision, .. } => revision,
        }
    }

    pub fn purge(&self) -> bool {
        match self {
            Self::PruneByRevision { purge, .. } | Self::DeleteByManifest { purge, .. } => *purge,
        }
    }
}
