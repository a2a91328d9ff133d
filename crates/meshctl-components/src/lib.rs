//! Component naming for meshctl
//!
//! This crate handles:
//! - The component registry (categories, deprecated names, labels)
//! - One-time discovery of addon components from chart sources
//! - Namespace resolution for components
//! - Aggregation of rendered manifest fragments

pub mod aggregate;
pub mod charts;
pub mod discovery;
pub mod namespace;
pub mod registry;

pub use aggregate::ManifestAggregator;
pub use discovery::AddonDiscovery;
pub use namespace::NamespaceResolver;
pub use registry::{ComponentRegistry, UNKNOWN_LABEL};
