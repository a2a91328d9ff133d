//! Common test utilities for meshctl-components
//!
//! Provides chart directory builders and stub resource stores.

#![allow(dead_code)]

use meshctl_core::error::{Error, Result};
use meshctl_core::resources::ResourceStore;
use std::path::Path;
use tempfile::TempDir;

/// Chart root directory on disk with `addons/<name>/Chart.yaml` entries
pub struct ChartDir {
    pub dir: TempDir,
}

impl ChartDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("addons")).expect("create addons dir");
        Self { dir }
    }

    /// Build a chart root holding one addon chart per name
    pub fn with_addons(names: &[&str]) -> Self {
        let charts = Self::new();
        for name in names {
            charts.add_chart(&format!("addons/{}", name), name);
        }
        charts
    }

    /// Write `<rel>/Chart.yaml` declaring `name`
    pub fn add_chart(&self, rel: &str, name: &str) {
        let chart_dir = self.dir.path().join(rel);
        std::fs::create_dir_all(&chart_dir).expect("create chart dir");
        std::fs::write(
            chart_dir.join("Chart.yaml"),
            format!("apiVersion: v1\nname: {}\nversion: 0.1.0\n", name),
        )
        .expect("write Chart.yaml");
    }

    /// Write an arbitrary file below the chart root
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }
}

/// Resource store with no files, standing in for a binary built without charts
pub struct EmptyStore;

impl ResourceStore for EmptyStore {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Err(Error::not_found(path))
    }

    fn list_files(&self, _prefix: &str) -> Vec<String> {
        Vec::new()
    }

    fn describe(&self) -> String {
        "empty".to_string()
    }
}
