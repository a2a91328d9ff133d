//! Addon chart sources
//!
//! Addon charts live under `<root>/addons/<chart>/Chart.yaml`; sub-charts
//! nested below an addon (`<chart>/charts/<sub>/Chart.yaml`) are addons too.

use meshctl_core::error::{Error, Result};
use meshctl_core::resources::{EmbeddedStore, ResourceStore};
use meshctl_core::types::upper_first;
use serde::Deserialize;
use tracing::debug;

/// Directory holding addon charts, relative to the charts root
pub const ADDONS_DIR: &str = "addons";

const CHART_FILE: &str = "Chart.yaml";

#[derive(Debug, Deserialize)]
struct ChartMetadata {
    #[serde(default)]
    name: String,
}

/// Charts compiled into the binary
pub fn bundled_charts() -> EmbeddedStore {
    EmbeddedStore::scoped("charts")
}

/// Whether `store` holds any chart files at all
pub fn has_charts(store: &dyn ResourceStore) -> bool {
    !store.list_files("").is_empty()
}

/// Names of all addon charts in `store`, in path order without duplicates.
///
/// With `capitalize` the first character of each name is upper-cased so it
/// matches component naming.
pub fn addon_names(store: &dyn ResourceStore, capitalize: bool) -> Result<Vec<String>> {
    let prefix = format!("{}/", ADDONS_DIR);
    let chart_files: Vec<String> = store
        .list_files(&prefix)
        .into_iter()
        .filter(|path| path.rsplit('/').next() == Some(CHART_FILE))
        .collect();

    let mut names: Vec<String> = Vec::new();
    for path in chart_files {
        let data = store.read_file(&path)?;
        let chart: ChartMetadata =
            serde_yaml_ng::from_slice(&data).map_err(|e| Error::parse(path.as_str(), e))?;
        if chart.name.trim().is_empty() {
            return Err(Error::parse(path.as_str(), "chart has no name"));
        }
        let name = if capitalize {
            upper_first(&chart.name)
        } else {
            chart.name
        };
        debug!("Found addon chart {} at {}", name, path);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}
