//! Read-only resource stores
//!
//! Version-pinned naming files, runtime defaults and bundled addon charts are
//! compiled into the binary. A directory-backed store reads the same layout
//! from the local filesystem.

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use rust_embed::RustEmbed;
use tracing::debug;
use walkdir::WalkDir;

/// Folder holding version specific naming files
pub const TRANSLATE_CONFIG_FOLDER: &str = "translateConfig";

/// Prefix of naming file names
pub const NAMES_CONFIG_PREFIX: &str = "names-";

/// Embedded resource files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/"]
#[prefix = ""]
struct EmbeddedResources;

/// Path of the naming file for a minor version, e.g. `translateConfig/names-1.7.yaml`
pub fn names_config_path(minor_version: &str) -> String {
    format!(
        "{}/{}{}.yaml",
        TRANSLATE_CONFIG_FOLDER, NAMES_CONFIG_PREFIX, minor_version
    )
}

/// Read access to a tree of resource files addressed by `/`-separated paths
pub trait ResourceStore: Send + Sync {
    /// Read a file; `Error::NotFound` when absent
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// All file paths starting with `prefix`, sorted
    fn list_files(&self, prefix: &str) -> Vec<String>;

    /// Human readable location, for diagnostics
    fn describe(&self) -> String;
}

/// Store over the resources compiled into the binary
#[derive(Debug, Clone, Default)]
pub struct EmbeddedStore {
    scope: String,
}

impl EmbeddedStore {
    /// Store over every embedded resource
    pub fn new() -> Self {
        Self::default()
    }

    /// Store over the embedded resources below `scope`
    pub fn scoped(scope: impl Into<String>) -> Self {
        let scope = scope.into().trim_matches('/').to_string();
        Self { scope }
    }

    fn full_path(&self, path: &str) -> String {
        if self.scope.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.scope, path)
        }
    }
}

impl ResourceStore for EmbeddedStore {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.full_path(path);
        debug!("Reading embedded resource: {}", full);
        EmbeddedResources::get(&full)
            .map(|file| file.data.into_owned())
            .ok_or_else(|| Error::not_found(format!("embedded:{}", full)))
    }

    fn list_files(&self, prefix: &str) -> Vec<String> {
        let full_prefix = self.full_path(prefix);
        let strip = if self.scope.is_empty() {
            0
        } else {
            self.scope.len() + 1
        };
        let mut files: Vec<String> = EmbeddedResources::iter()
            .filter(|f| f.starts_with(&full_prefix))
            .filter(|f| f.len() > strip)
            .map(|f| f[strip..].to_string())
            .collect();
        files.sort();
        files
    }

    fn describe(&self) -> String {
        format!("embedded:{}", self.scope)
    }
}

/// Store over a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: Utf8PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceStore for DirectoryStore {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        debug!("Reading resource file: {}", full);
        std::fs::read(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(full.as_str())
            } else {
                Error::Io(e)
            }
        })
    }

    fn list_files(&self, prefix: &str) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let rel = entry.path().strip_prefix(&self.root).ok()?;
                let rel = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                rel.starts_with(prefix).then_some(rel)
            })
            .collect();
        files.sort();
        files
    }

    fn describe(&self) -> String {
        self.root.to_string()
    }
}
