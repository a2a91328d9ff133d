//! Cluster connection through kubectl

use crate::kubectl::{CommandExecutor, Kubectl, ProcessExecutor, KUBECTL};
use async_trait::async_trait;
use meshctl_core::error::{Error, Result};
use meshctl_uninstall::{ClusterClientFactory, ClusterSession};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// `kubectl config view --minify -o json` output, reduced to what we read
#[derive(Debug, Default, Deserialize)]
struct KubeconfigView {
    #[serde(rename = "current-context", default)]
    current_context: String,
    #[serde(default)]
    clusters: Vec<NamedCluster>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    #[serde(default)]
    cluster: ClusterEntry,
}

#[derive(Debug, Default, Deserialize)]
struct ClusterEntry {
    #[serde(default)]
    server: Option<String>,
}

/// Resolves the selected kubeconfig context and its API server
pub struct KubectlClientFactory {
    executor: Arc<dyn CommandExecutor>,
    require_binary: bool,
}

impl KubectlClientFactory {
    /// Factory running the kubectl found on PATH
    pub fn new() -> Self {
        Self {
            executor: Arc::new(ProcessExecutor),
            require_binary: true,
        }
    }

    /// Factory running commands through `executor`
    pub fn with_executor(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            require_binary: false,
        }
    }
}

impl Default for KubectlClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterClientFactory for KubectlClientFactory {
    async fn connect(&self, kubeconfig: Option<&str>, context: Option<&str>) -> Result<ClusterSession> {
        if self.require_binary && which::which(KUBECTL).is_err() {
            return Err(Error::connectivity(format!("{} not found in PATH", KUBECTL)));
        }

        let mut session = ClusterSession {
            kubeconfig: kubeconfig.filter(|k| !k.is_empty()).map(String::from),
            context: context.filter(|c| !c.is_empty()).map(String::from),
            server: None,
        };

        let kubectl = Kubectl::new(Arc::clone(&self.executor), &session);
        let stdout = kubectl
            .run(["config", "view", "--minify", "-o", "json"])
            .await
            .map_err(Error::connectivity)?;
        let view: KubeconfigView = serde_json::from_str(&stdout)
            .map_err(|e| Error::connectivity(format!("cannot read kubeconfig: {}", e)))?;

        if session.context.is_none() && !view.current_context.is_empty() {
            session.context = Some(view.current_context);
        }
        session.server = view.clusters.into_iter().find_map(|c| c.cluster.server);
        if session.server.is_none() {
            return Err(Error::connectivity(format!(
                "context {} has no cluster server",
                session.context.as_deref().unwrap_or("<current>")
            )));
        }

        debug!("Resolved kubeconfig session {:?}", session);
        info!(
            "Using context {} ({})",
            session.context.as_deref().unwrap_or("<current>"),
            session.server.as_deref().unwrap_or_default()
        );
        Ok(session)
    }
}
