//! Uninstall planning and execution
//!
//! An uninstall ends in one of two deletion scopes:
//!
//! - **prune by revision** when no operator file is given: a synthetic
//!   `{profile: empty, revision}` spec configures the deletion engine, which
//!   lists every resource labelled with the revision (all revisions plus
//!   shared cluster-scoped resources with purge) and deletes them
//! - **delete by manifest** when an operator file is given: manifests are
//!   generated from the file and overrides, and exactly the resources they
//!   name are deleted for the generated spec's revision, expanded to purge
//!   scope with purge
//!
//! Both report [`ProgressState::UninstallComplete`] when done. Nothing is
//! retried; collaborator futures are awaited in place so dropping the
//! planner future cancels whatever is in flight.

use crate::request::{UninstallOptions, UninstallRequest};
use crate::traits::{
    ClusterClientFactory, ClusterSession, DeletionEngine, DeletionEngineFactory, ManifestGenerator,
    ProgressSink, ProgressState, SpecTranslator,
};
use meshctl_components::{AddonDiscovery, ComponentRegistry, NamespaceResolver};
use meshctl_core::error::{Error, Result};
use meshctl_core::types::{ControlPlaneSpec, EMPTY_PROFILE};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Profile tag of the spec translated for manifest deletion
pub const REMOVED_PROFILE_TAG: &str = "removed";

/// Decides the deletion scope of an uninstall and drives the deletion engine
pub struct UninstallPlanner {
    discovery: Arc<AddonDiscovery>,
    clients: Arc<dyn ClusterClientFactory>,
    engines: Arc<dyn DeletionEngineFactory>,
    generator: Arc<dyn ManifestGenerator>,
    translator: Arc<dyn SpecTranslator>,
    progress: Arc<dyn ProgressSink>,
}

impl UninstallPlanner {
    pub fn new(
        discovery: Arc<AddonDiscovery>,
        clients: Arc<dyn ClusterClientFactory>,
        engines: Arc<dyn DeletionEngineFactory>,
        generator: Arc<dyn ManifestGenerator>,
        translator: Arc<dyn SpecTranslator>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            discovery,
            clients,
            engines,
            generator,
            translator,
            progress,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        self.discovery.registry()
    }

    /// Run a complete uninstall: validate, connect, plan, execute and report
    /// completion. Returns the request that was executed.
    pub async fn uninstall(&self, options: &UninstallOptions) -> Result<UninstallRequest> {
        options.validate()?;

        let session = self
            .clients
            .connect(options.kubeconfig.as_deref(), options.context.as_deref())
            .await?;
        debug!(
            "Connected to cluster {}",
            session.server.as_deref().unwrap_or("<unknown>")
        );

        let request = self.plan(options, &session).await?;
        let resolver = NamespaceResolver::with_fallback(options.namespace_fallback());
        self.execute(&request, &session, &resolver).await?;

        self.progress.set_state(ProgressState::UninstallComplete);
        Ok(request)
    }

    /// Decide the deletion scope.
    ///
    /// Without an operator file the request prunes by revision and no
    /// manifests are generated. With one, manifests are generated; generator
    /// warnings abort unless `force` is set.
    pub async fn plan(&self, options: &UninstallOptions, session: &ClusterSession) -> Result<UninstallRequest> {
        let Some(filename) = options.filename() else {
            info!(
                "Pruning resources of revision '{}'{}",
                options.revision,
                if options.purge { " with purge" } else { "" }
            );
            return Ok(UninstallRequest::PruneByRevision {
                revision: options.revision.clone(),
                purge: options.purge,
            });
        };

        self.discovery
            .ensure_scanned(options.manifests_path().unwrap_or(""))?;
        let overrides = options.overrides(self.registry())?;

        info!("Generating manifests from {}", filename);
        let generated = self
            .generator
            .generate(&[filename.to_string()], &overrides, options.force, session)
            .await?;

        if !generated.warnings.is_empty() {
            if !options.force {
                return Err(Error::generation(format!(
                    "{} (use --force to proceed anyway)",
                    generated.warnings.join("; ")
                )));
            }
            for warning in &generated.warnings {
                warn!("{}", warning);
            }
        }

        let revision = generated.spec.revision().to_string();
        debug!(
            "Generated {} manifests for {} components, revision '{}'",
            generated.manifests.fragment_count(),
            generated.manifests.len(),
            revision
        );
        Ok(UninstallRequest::DeleteByManifest {
            manifests: generated.manifests,
            spec: generated.spec,
            revision,
            purge: options.purge,
        })
    }

    /// Hand a planned request to the deletion engine
    pub async fn execute(
        &self,
        request: &UninstallRequest,
        session: &ClusterSession,
        resolver: &NamespaceResolver,
    ) -> Result<()> {
        match request {
            UninstallRequest::PruneByRevision { revision, purge } => {
                let spec = ControlPlaneSpec::empty_for_revision(revision.as_str());
                let namespace = resolver.default_namespace(&spec)?;
                let engine = self.engine_for(&spec, EMPTY_PROFILE, &namespace, session).await?;

                let resources = engine
                    .prune_by_revision(revision, *purge, "")
                    .await
                    .map_err(|e| deletion_error(revision, e))?;
                info!("Deleting {} resources", resources.len());
                engine
                    .delete_resources(&resources)
                    .await
                    .map_err(|e| deletion_error(revision, e))?;
            }
            UninstallRequest::DeleteByManifest {
                manifests,
                spec,
                revision,
                purge,
            } => {
                for component in manifests.components() {
                    if self.registry().is_deprecated(component.as_str()) {
                        warn!("Removing deprecated component {}", component);
                    }
                }

                let namespace = resolver.default_namespace(spec)?;
                let engine = self
                    .engine_for(spec, REMOVED_PROFILE_TAG, &namespace, session)
                    .await?;
                engine
                    .delete_by_manifests(manifests, revision, *purge)
                    .await
                    .map_err(|e| deletion_error(revision, e))?;
            }
        }
        Ok(())
    }

    async fn engine_for(
        &self,
        spec: &ControlPlaneSpec,
        profile_tag: &str,
        namespace: &str,
        session: &ClusterSession,
    ) -> Result<Box<dyn DeletionEngine>> {
        let internal = self
            .translator
            .to_internal_spec(spec, profile_tag, namespace)
            .map_err(reconciler_error)?;
        self.engines
            .create(session, &internal)
            .await
            .map_err(reconciler_error)
    }
}

fn reconciler_error(err: Error) -> Error {
    match err {
        err @ Error::ReconcilerInit { .. } => err,
        other => Error::reconciler_init(other),
    }
}

fn deletion_error(revision: &str, err: Error) -> Error {
    match err {
        err @ Error::Deletion { .. } => err,
        other => Error::deletion(revision, other),
    }
}
