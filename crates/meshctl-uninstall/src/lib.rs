//! # meshctl-uninstall
//!
//! Uninstall planning for meshctl.
//!
//! The planner takes the caller's {revision, filename, purge} inputs and
//! decides one of two deletion scopes:
//! - prune every resource labelled with a revision (or everything, with purge)
//! - delete exactly the resources named by manifests generated from a file
//!
//! Cluster access, manifest generation and deletion are collaborators
//! behind the traits in [`traits`].

pub mod planner;
pub mod request;
pub mod traits;

pub use planner::UninstallPlanner;
pub use request::{SetOverride, UninstallOptions, UninstallRequest};
pub use traits::{
    ClusterClientFactory, ClusterSession, DeletionEngine, DeletionEngineFactory,
    GeneratedManifests, InternalSpec, ManifestGenerator, ProgressSink, ProgressState,
    ResourceRef, SpecTranslator,
};
