//! Manifest generation from pre-rendered install packages
//!
//! An install package directory holds one sub-directory per component with
//! the component's rendered manifests:
//!
//! ```text
//! <installPackagePath>/
//!   Base/crds.yaml
//!   Pilot/istiod.yaml
//!   Grafana/grafana.yaml
//!   addons/<chart>/Chart.yaml     (addon chart sources, not manifests)
//! ```

use async_trait::async_trait;
use meshctl_components::charts::ADDONS_DIR;
use meshctl_components::ComponentRegistry;
use meshctl_core::error::{Error, Result};
use meshctl_core::tpath;
use meshctl_core::types::{ComponentName, ControlPlaneSpec, ManifestMap};
use meshctl_uninstall::{ClusterSession, GeneratedManifests, ManifestGenerator, SetOverride};
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Reads operator files and pre-rendered component manifests
pub struct PrerenderedManifestGenerator {
    registry: Arc<ComponentRegistry>,
}

impl PrerenderedManifestGenerator {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self { registry }
    }

    /// Merge operator files in order, later files overriding earlier ones
    async fn load_spec(&self, files: &[String]) -> Result<ControlPlaneSpec> {
        let mut merged = Value::Null;
        for file in files {
            let content = tokio::fs::read_to_string(file)
                .await
                .map_err(|e| Error::generation(format!("cannot read {}: {}", file, e)))?;
            let spec = ControlPlaneSpec::from_yaml(&content, file)?;
            merge_values(&mut merged, spec.to_value()?);
        }
        if merged.is_null() {
            return Ok(ControlPlaneSpec::default());
        }
        serde_yaml_ng::from_value(merged).map_err(|e| Error::parse(files.join(","), e))
    }

    fn is_disabled(&self, component: &ComponentName, spec: &ControlPlaneSpec) -> bool {
        let tree = if self.registry.is_addon(component.as_str()) {
            &spec.addon_components
        } else {
            &spec.components
        };
        let path = format!("{}.enabled", component);
        matches!(tpath::get(tree, &path), Some(Value::Bool(false)))
    }
}

#[async_trait]
impl ManifestGenerator for PrerenderedManifestGenerator {
    async fn generate(
        &self,
        files: &[String],
        overrides: &[SetOverride],
        force: bool,
        session: &ClusterSession,
    ) -> Result<GeneratedManifests> {
        let mut spec = self.load_spec(files).await?;
        for o in overrides {
            spec = o.apply(&spec)?;
        }

        let package = spec
            .install_package_path
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                Error::generation("installPackagePath is not set; pass --manifests with a pre-rendered package")
            })?;
        debug!(
            "Generating manifests from {} for cluster {}",
            package,
            session.server.as_deref().unwrap_or("<unknown>")
        );

        let mut manifests = ManifestMap::new();
        let mut warnings = Vec::new();

        for dir in component_dirs(Path::new(&package)).await? {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == ADDONS_DIR {
                continue;
            }
            let component = ComponentName::new(name);

            // Deprecated components are emitted; the planner reports them.
            let deprecated = self.registry.is_deprecated(name);
            if deprecated {
                debug!("Component {} is deprecated", component);
            } else if !self.registry.is_registered(name) {
                warnings.push(format!("component {} is not recognised", name));
                continue;
            }
            if self.is_disabled(&component, &spec) {
                debug!("Component {} is disabled", component);
                continue;
            }

            for file in manifest_files(&dir).await? {
                let content = tokio::fs::read_to_string(&file).await?;
                let origin = file.display().to_string();
                match split_documents(&content, &origin) {
                    Ok(docs) => {
                        for doc in docs {
                            manifests.push(component.clone(), doc);
                        }
                    }
                    Err(e) if force => warnings.push(e.to_string()),
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            "Read {} manifests for {} components",
            manifests.fragment_count(),
            manifests.len()
        );
        Ok(GeneratedManifests {
            manifests,
            spec,
            warnings,
        })
    }
}

/// Deep merge `overlay` into `base`; mappings merge key by key, anything
/// else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

async fn component_dirs(package: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(package)
        .await
        .map_err(|e| Error::generation(format!("cannot read {}: {}", package.display(), e)))?;
    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

async fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Split a multi-document file into its non-empty documents, each checked
/// to be valid YAML
fn split_documents(content: &str, origin: &str) -> Result<Vec<String>> {
    let mut docs = Vec::new();
    let mut current = String::new();
    for line in content.lines() {
        if line.trim_end() == "---" {
            docs.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    docs.push(current);

    let mut out = Vec::new();
    for doc in docs {
        let trimmed = doc.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_yaml_ng::from_str(trimmed).map_err(|e| Error::parse(origin, e))?;
        if !value.is_null() {
            out.push(trimmed.to_string());
        }
    }
    Ok(out)
}
