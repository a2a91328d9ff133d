//! kubectl-backed collaborators for meshctl
//!
//! Provides:
//! - [`KubectlClientFactory`]: resolves the kubeconfig context and API server
//! - [`KubectlDeletionEngineFactory`]: label-selector pruning and manifest
//!   deletion through `kubectl delete`
//! - [`OperatorSpecTranslator`]: wraps a spec into an operator resource
//! - [`PrerenderedManifestGenerator`]: reads pre-rendered manifests from an
//!   install package directory

pub mod client;
pub mod engine;
pub mod generate;
pub mod kubectl;
pub mod translate;

pub use client::KubectlClientFactory;
pub use engine::{KubectlDeletionEngine, KubectlDeletionEngineFactory};
pub use generate::PrerenderedManifestGenerator;
pub use kubectl::{CommandExecutor, CommandOutput, Kubectl, ProcessExecutor};
pub use translate::OperatorSpecTranslator;
