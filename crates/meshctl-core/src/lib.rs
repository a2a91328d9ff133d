//! # meshctl-core
//!
//! Core library for meshctl providing:
//! - Component identifiers, categories and manifest maps
//! - The control plane configuration tree and dotted-path access into it
//! - The error taxonomy shared by every meshctl crate
//! - Embedded and directory-backed resource stores
//! - Hierarchical runtime configuration

pub mod config;
pub mod error;
pub mod kinds;
pub mod resources;
pub mod tpath;
pub mod types;
pub mod utils;
pub mod version;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use resources::{DirectoryStore, EmbeddedStore, ResourceStore};
pub use types::{ComponentCategory, ComponentName, ControlPlaneSpec, ManifestMap};
pub use utils::get_home_dir;
pub use version::MinorVersion;
