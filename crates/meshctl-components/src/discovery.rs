//! One-time addon discovery
//!
//! Addon components are discovered from a chart source exactly once per
//! [`AddonDiscovery`] instance, however many call sites ask for it and
//! whether or not they run concurrently:
//!
//! - the first caller runs the scan; concurrent callers block until it
//!   finishes and then observe its outcome
//! - the `source_dir` passed by the first caller decides what is scanned;
//!   later callers passing a different directory get the cached outcome of
//!   that first scan
//! - a failed scan is sticky: every later call returns the same error
//!   (the same `Arc`), there is no retry
//!
//! Callers that need isolation, such as tests, construct their own
//! `AddonDiscovery` and `ComponentRegistry`.

use crate::charts::{self, ADDONS_DIR};
use crate::registry::ComponentRegistry;
use camino::Utf8Path;
use meshctl_core::error::{Error, Result};
use meshctl_core::resources::{DirectoryStore, ResourceStore};
use meshctl_core::types::ComponentName;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

type ScanOutcome = std::result::Result<Vec<ComponentName>, Arc<Error>>;

/// Single-flight addon discovery bound to a registry
pub struct AddonDiscovery {
    registry: Arc<ComponentRegistry>,
    bundled: Arc<dyn ResourceStore>,
    outcome: OnceLock<ScanOutcome>,
}

impl AddonDiscovery {
    /// Discovery using the charts compiled into the binary as bundled source
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self::with_bundled(registry, Arc::new(charts::bundled_charts()))
    }

    /// Discovery using `bundled` as the source for an empty `source_dir`
    pub fn with_bundled(registry: Arc<ComponentRegistry>, bundled: Arc<dyn ResourceStore>) -> Self {
        Self {
            registry,
            bundled,
            outcome: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Scan for addons unless a scan already ran.
    ///
    /// An empty `source_dir` selects the bundled charts, which must be
    /// present (`Error::MissingSource` otherwise). Failures are returned as
    /// `Error::AddonScan` wrapping the cached inner error.
    pub fn ensure_scanned(&self, source_dir: &str) -> Result<()> {
        let outcome = self
            .outcome
            .get_or_init(|| self.scan(source_dir).map_err(Arc::new));
        match outcome {
            Ok(_) => Ok(()),
            Err(err) => Err(Error::AddonScan(Arc::clone(err))),
        }
    }

    /// Whether the one-time scan has completed, successfully or not
    pub fn is_scanned(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Addons found by a successful scan
    pub fn discovered(&self) -> Option<&[ComponentName]> {
        match self.outcome.get() {
            Some(Ok(names)) => Some(names.as_slice()),
            _ => None,
        }
    }

    fn scan(&self, source_dir: &str) -> Result<Vec<ComponentName>> {
        let source: Arc<dyn ResourceStore> = if source_dir.is_empty() {
            if !charts::has_charts(self.bundled.as_ref()) {
                return Err(Error::missing_source(format!(
                    "no compiled-in charts found in {}",
                    self.bundled.describe()
                )));
            }
            Arc::clone(&self.bundled)
        } else {
            let addons = Utf8Path::new(source_dir).join(ADDONS_DIR);
            if !addons.is_dir() {
                return Err(Error::not_found(addons.as_str()));
            }
            Arc::new(DirectoryStore::new(source_dir))
        };

        debug!("Scanning addon charts in {}", source.describe());
        let names: Vec<ComponentName> = charts::addon_names(source.as_ref(), true)?
            .into_iter()
            .map(ComponentName::from)
            .collect();

        self.registry.register_addons(&names)?;
        info!(
            "Discovered {} addon components in {}",
            names.len(),
            source.describe()
        );
        Ok(names)
    }
}
