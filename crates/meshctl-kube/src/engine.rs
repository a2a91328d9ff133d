//! Label-selector deletion engine on top of kubectl
//!
//! Resources installed for a revision carry `istio.io/rev=<revision>`
//! (`default` for the default revision). Everything the operator installed,
//! whatever its revision, carries `operator.istio.io/component`; purge
//! selects on that label.

use crate::kubectl::{CommandExecutor, Kubectl, ProcessExecutor};
use async_trait::async_trait;
use meshctl_components::{ComponentRegistry, ManifestAggregator};
use meshctl_core::error::{Error, Result};
use meshctl_core::kinds::{self, CLUSTER_SCOPED_KINDS, NAMESPACED_KINDS};
use meshctl_core::types::ManifestMap;
use meshctl_uninstall::{ClusterSession, DeletionEngine, DeletionEngineFactory, InternalSpec, ResourceRef};
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Label naming the revision a resource belongs to
pub const REVISION_LABEL: &str = "istio.io/rev";

/// Label naming the operator component that owns a resource
pub const OPERATOR_COMPONENT_LABEL: &str = "operator.istio.io/component";

/// Revision label value of the default revision
pub const DEFAULT_REVISION: &str = "default";

/// Label selector for a prune
pub fn prune_selector(revision: &str, purge: bool) -> String {
    if purge {
        OPERATOR_COMPONENT_LABEL.to_string()
    } else {
        format!("{}={}", REVISION_LABEL, revision_label(revision))
    }
}

fn revision_label(revision: &str) -> &str {
    if revision.is_empty() {
        DEFAULT_REVISION
    } else {
        revision
    }
}

/// Creates [`KubectlDeletionEngine`]s
pub struct KubectlDeletionEngineFactory {
    executor: Arc<dyn CommandExecutor>,
    registry: Arc<ComponentRegistry>,
    dry_run: bool,
}

impl KubectlDeletionEngineFactory {
    pub fn new(registry: Arc<ComponentRegistry>, dry_run: bool) -> Self {
        Self::with_executor(Arc::new(ProcessExecutor), registry, dry_run)
    }

    pub fn with_executor(
        executor: Arc<dyn CommandExecutor>,
        registry: Arc<ComponentRegistry>,
        dry_run: bool,
    ) -> Self {
        Self {
            executor,
            registry,
            dry_run,
        }
    }
}

#[async_trait]
impl DeletionEngineFactory for KubectlDeletionEngineFactory {
    async fn create(&self, session: &ClusterSession, spec: &InternalSpec) -> Result<Box<dyn DeletionEngine>> {
        if spec.namespace.is_empty() {
            return Err(Error::reconciler_init(format!(
                "{} has no namespace",
                spec.name
            )));
        }
        let kubectl = Kubectl::new(Arc::clone(&self.executor), session).with_dry_run(self.dry_run);
        debug!(
            "Created deletion engine for {} in {}{}",
            spec.name,
            spec.namespace,
            if self.dry_run { " (dry run)" } else { "" }
        );
        Ok(Box::new(KubectlDeletionEngine {
            kubectl,
            spec: spec.clone(),
            registry: Arc::clone(&self.registry),
        }))
    }
}

/// Deletes control plane resources through kubectl
pub struct KubectlDeletionEngine {
    kubectl: Kubectl,
    spec: InternalSpec,
    registry: Arc<ComponentRegistry>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestObject {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    metadata: ManifestMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestMeta {
    #[serde(default)]
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    labels: HashMap<String, String>,
}

impl KubectlDeletionEngine {
    fn failure(&self, message: impl ToString) -> Error {
        Error::deletion(self.spec.revision.as_str(), message)
    }

    /// Resources named by one consolidated manifest.
    ///
    /// Objects labelled with a different revision are skipped unless
    /// `purge` is set.
    fn manifest_resources(&self, manifest: &str, revision: &str, purge: bool) -> Result<Vec<ResourceRef>> {
        let mut resources = Vec::new();
        for document in serde_yaml_ng::Deserializer::from_str(manifest) {
            let value = Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            let object: ManifestObject = serde_yaml_ng::from_value(value)?;
            if object.kind.is_empty() || object.metadata.name.is_empty() {
                debug!("Skipping manifest document without kind or name");
                continue;
            }

            if let Some(rev) = object.metadata.labels.get(REVISION_LABEL) {
                if !purge && rev != revision_label(revision) {
                    debug!(
                        "Skipping {} {} of revision {}",
                        object.kind, object.metadata.name, rev
                    );
                    continue;
                }
            }

            let resource = if kinds::is_cluster_scoped(&object.kind) {
                ResourceRef::cluster_scoped(object.kind, object.metadata.name)
            } else {
                let namespace = object
                    .metadata
                    .namespace
                    .filter(|ns| !ns.is_empty())
                    .unwrap_or_else(|| self.spec.namespace.clone());
                ResourceRef::namespaced(object.kind, namespace, object.metadata.name)
            };
            resources.push(resource);
        }
        Ok(resources)
    }
}

#[async_trait]
impl DeletionEngine for KubectlDeletionEngine {
    async fn prune_by_revision(
        &self,
        revision: &str,
        purge: bool,
        namespace_hint: &str,
    ) -> Result<Vec<ResourceRef>> {
        let selector = prune_selector(revision, purge);
        let namespace = Some(namespace_hint).filter(|ns| !ns.is_empty());
        debug!("Listing resources with selector {}", selector);

        let mut resources = Vec::new();
        for kind in NAMESPACED_KINDS {
            let found = self
                .kubectl
                .list(kind, namespace, &selector, false)
                .await
                .map_err(|e| self.failure(e))?;
            resources.extend(found);
        }
        for kind in CLUSTER_SCOPED_KINDS {
            let found = self
                .kubectl
                .list(kind, None, &selector, true)
                .await
                .map_err(|e| self.failure(e))?;
            resources.extend(found);
        }

        info!(
            "Found {} resources for revision {}",
            resources.len(),
            revision_label(revision)
        );
        Ok(resources)
    }

    async fn delete_resources(&self, resources: &[ResourceRef]) -> Result<()> {
        // Grouped by (kind, namespace) in first-seen order.
        let mut groups: Vec<((&str, Option<&str>), Vec<String>)> = Vec::new();
        for resource in resources {
            let key = (resource.kind.as_str(), resource.namespace.as_deref());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, names)) => names.push(resource.name.clone()),
                None => groups.push((key, vec![resource.name.clone()])),
            }
        }

        for ((kind, namespace), names) in &groups {
            info!(
                "{}Deleting {} {}{}",
                if self.kubectl.is_dry_run() { "[dry run] " } else { "" },
                kind,
                names.join(", "),
                namespace.map(|ns| format!(" in {}", ns)).unwrap_or_default()
            );
            self.kubectl
                .delete(kind, *namespace, names)
                .await
                .map_err(|e| self.failure(e))?;
        }
        Ok(())
    }

    async fn delete_by_manifests(&self, manifests: &ManifestMap, revision: &str, purge: bool) -> Result<()> {
        // Listed while the Base CRDs still exist.
        let shared = if purge {
            self.prune_by_revision(revision, true, "").await?
        } else {
            Vec::new()
        };

        for (component, manifest) in ManifestAggregator::ordered(manifests, &self.registry) {
            let resources = self
                .manifest_resources(&manifest, revision, purge)
                .map_err(|e| self.failure(format!("{}: {}", component, e)))?;
            info!(
                "Removing {} ({} resources)",
                self.registry.user_facing_label(component.as_str()),
                resources.len()
            );
            self.delete_resources(&resources).await?;
        }

        self.delete_resources(&shared).await
    }
}
