//! kubectl invocation

use async_trait::async_trait;
use meshctl_core::error::Result;
use meshctl_uninstall::{ClusterSession, ResourceRef};
use serde::Deserialize;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the kubectl binary
pub const KUBECTL: &str = "kubectl";

/// kubectl error text for a kind the API server does not know
const MISSING_RESOURCE_TYPE: &str = "the server doesn't have a resource type";

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }
}

/// Runs external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Executor spawning real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(program).args(args).output().await?;
        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        };

        if !result.success {
            warn!(
                "Command failed: {} {}\nStderr: {}",
                program,
                args.join(" "),
                result.stderr.trim()
            );
        }
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<ObjectItem>,
}

#[derive(Debug, Deserialize)]
struct ObjectItem {
    #[serde(default)]
    kind: Option<String>,
    metadata: ObjectMeta,
}

#[derive(Debug, Deserialize)]
struct ObjectMeta {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

/// kubectl bound to a kubeconfig and context
#[derive(Clone)]
pub struct Kubectl {
    executor: Arc<dyn CommandExecutor>,
    kubeconfig: Option<String>,
    context: Option<String>,
    dry_run: bool,
}

impl Kubectl {
    pub fn new(executor: Arc<dyn CommandExecutor>, session: &ClusterSession) -> Self {
        Self {
            executor,
            kubeconfig: session.kubeconfig.clone(),
            context: session.context.clone(),
            dry_run: false,
        }
    }

    /// Make every delete a client-side dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn args<I, S>(&self, rest: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.clone());
        }
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        args.extend(rest.into_iter().map(Into::into));
        args
    }

    /// Run kubectl, returning stdout or the failure as `stderr`
    pub async fn run<I, S>(&self, rest: I) -> std::result::Result<String, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = self.args(rest);
        match self.executor.run(KUBECTL, &args).await {
            Ok(out) if out.success => Ok(out.stdout),
            Ok(out) => Err(out.stderr.trim().to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// List resources of `kind` matching `selector`.
    ///
    /// `namespace` of `None` lists across all namespaces; cluster-scoped
    /// kinds ignore it. A kind the API server does not serve (its CRD is
    /// absent or already deleted) lists as empty.
    pub async fn list(
        &self,
        kind: &str,
        namespace: Option<&str>,
        selector: &str,
        cluster_scoped: bool,
    ) -> std::result::Result<Vec<ResourceRef>, String> {
        let mut rest = vec!["get".to_string(), kind.to_string()];
        if !cluster_scoped {
            match namespace {
                Some(ns) => rest.extend(["-n".to_string(), ns.to_string()]),
                None => rest.push("--all-namespaces".to_string()),
            }
        }
        rest.extend([
            "-l".to_string(),
            selector.to_string(),
            "-o".to_string(),
            "json".to_string(),
        ]);

        let stdout = match self.run(rest).await {
            Ok(stdout) => stdout,
            Err(stderr) if stderr.contains(MISSING_RESOURCE_TYPE) => {
                debug!("Kind {} is not served by the cluster, skipping", kind);
                return Ok(Vec::new());
            }
            Err(stderr) => return Err(stderr),
        };
        let list: ObjectList = serde_json::from_str(&stdout)
            .map_err(|e| format!("cannot parse {} list: {}", kind, e))?;
        Ok(list
            .items
            .into_iter()
            .map(|item| ResourceRef {
                kind: item.kind.unwrap_or_else(|| kind.to_string()),
                name: item.metadata.name,
                namespace: if cluster_scoped { None } else { item.metadata.namespace },
            })
            .collect())
    }

    /// Delete named resources of one kind in one namespace
    pub async fn delete(
        &self,
        kind: &str,
        namespace: Option<&str>,
        names: &[String],
    ) -> std::result::Result<(), String> {
        if names.is_empty() {
            return Ok(());
        }
        let mut rest = vec!["delete".to_string(), kind.to_string()];
        rest.extend(names.iter().cloned());
        if let Some(ns) = namespace {
            rest.extend(["-n".to_string(), ns.to_string()]);
        }
        rest.push("--ignore-not-found".to_string());
        if self.dry_run {
            rest.push("--dry-run=client".to_string());
        }
        self.run(rest).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_prefix_kubeconfig_and_context() {
        let session = ClusterSession {
            kubeconfig: Some("/tmp/kc".into()),
            context: Some("kind-mesh".into()),
            server: None,
        };
        let kubectl = Kubectl::new(Arc::new(ProcessExecutor), &session);
        assert_eq!(
            kubectl.args(["get", "pods"]),
            vec!["--kubeconfig", "/tmp/kc", "--context", "kind-mesh", "get", "pods"]
        );

        let bare = Kubectl::new(Arc::new(ProcessExecutor), &ClusterSession::default());
        assert_eq!(bare.args(["version"]), vec!["version"]);
    }

    #[test]
    fn test_parse_object_list() {
        let json = r#"{"items":[{"kind":"Service","metadata":{"name":"istiod","namespace":"istio-system"}},{"metadata":{"name":"x"}}]}"#;
        let list: ObjectList = serde_json::from_str(json).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].metadata.namespace.as_deref(), Some("istio-system"));
        assert!(list.items[1].kind.is_none());
    }
}
