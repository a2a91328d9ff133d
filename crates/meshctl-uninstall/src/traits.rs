//! Collaborator trait definitions
//!
//! The planner never talks to a cluster itself. Connectivity, manifest
//! generation, spec translation, deletion and progress reporting are all
//! provided through these traits; `meshctl-kube` supplies kubectl-backed
//! implementations and tests supply recording mocks.

use crate::request::SetOverride;
use async_trait::async_trait;
use meshctl_core::error::Result;
use meshctl_core::types::{ControlPlaneSpec, ManifestMap};
use serde_yaml_ng::Value;
use std::fmt;

/// Resolved connection to a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSession {
    /// Kubeconfig file in use, `None` for the default lookup
    pub kubeconfig: Option<String>,

    /// Kubeconfig context in use
    pub context: Option<String>,

    /// API server address of the selected context
    pub server: Option<String>,
}

/// Deletion-oriented representation of a control plane spec
#[derive(Debug, Clone, PartialEq)]
pub struct InternalSpec {
    /// Resource name, e.g. `installed-state-removed`
    pub name: String,
    pub namespace: String,
    pub revision: String,
    pub profile_tag: String,
    /// Full resource document
    pub document: Value,
}

/// A single cluster resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
    /// `None` for cluster-scoped resources
    pub namespace: Option<String>,
}

impl ResourceRef {
    pub fn namespaced(kind: impl Into<String>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    pub fn cluster_scoped(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: None,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}/{}", self.kind, ns, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

/// Output of a manifest generation run
#[derive(Debug, Clone, Default)]
pub struct GeneratedManifests {
    pub manifests: ManifestMap,
    /// Fully merged spec the manifests were generated from
    pub spec: ControlPlaneSpec,
    /// Non-fatal problems found while generating
    pub warnings: Vec<String>,
}

/// States reported to the progress sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressState {
    UninstallComplete,
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninstallComplete => write!(f, "uninstall complete"),
        }
    }
}

/// Factory for cluster connections
#[async_trait]
pub trait ClusterClientFactory: Send + Sync {
    /// Connect using a kubeconfig path and context, both optional.
    ///
    /// Failures are `Error::Connectivity`.
    async fn connect(&self, kubeconfig: Option<&str>, context: Option<&str>) -> Result<ClusterSession>;
}

/// Factory for deletion engines bound to a session and a translated spec
#[async_trait]
pub trait DeletionEngineFactory: Send + Sync {
    async fn create(&self, session: &ClusterSession, spec: &InternalSpec) -> Result<Box<dyn DeletionEngine>>;
}

/// Removes previously applied resources from a cluster
#[async_trait]
pub trait DeletionEngine: Send + Sync {
    /// Resources labelled with `revision`.
    ///
    /// With `purge`, resources of every revision plus shared cluster-scoped
    /// resources. `namespace_hint` narrows namespaced lookups when non-empty.
    async fn prune_by_revision(
        &self,
        revision: &str,
        purge: bool,
        namespace_hint: &str,
    ) -> Result<Vec<ResourceRef>>;

    /// Delete every listed resource
    async fn delete_resources(&self, resources: &[ResourceRef]) -> Result<()>;

    /// Delete the resources named in `manifests`, expanded to purge scope
    /// when `purge` is set
    async fn delete_by_manifests(&self, manifests: &ManifestMap, revision: &str, purge: bool) -> Result<()>;
}

/// Renders manifests from operator files and overrides
#[async_trait]
pub trait ManifestGenerator: Send + Sync {
    async fn generate(
        &self,
        files: &[String],
        overrides: &[SetOverride],
        force: bool,
        session: &ClusterSession,
    ) -> Result<GeneratedManifests>;
}

/// Converts a control plane spec into its deletion-oriented form
pub trait SpecTranslator: Send + Sync {
    fn to_internal_spec(
        &self,
        spec: &ControlPlaneSpec,
        profile_tag: &str,
        namespace: &str,
    ) -> Result<InternalSpec>;
}

/// Fire-and-forget progress reporting
pub trait ProgressSink: Send + Sync {
    fn set_state(&self, state: ProgressState);
}
