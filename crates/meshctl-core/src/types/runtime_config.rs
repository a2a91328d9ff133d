//! Runtime configuration for meshctl
//!
//! Defaults for values the CLI would otherwise require on every invocation.

use serde::{Deserialize, Serialize};

/// Default control plane namespace
pub const DEFAULT_NAMESPACE: &str = "istio-system";

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Namespace of the control plane when the spec does not name one
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Path to the kubeconfig file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,

    /// Kubeconfig context to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Charts and pre-rendered manifests directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifests_path: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            kubeconfig: None,
            context: None,
            manifests_path: None,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}
