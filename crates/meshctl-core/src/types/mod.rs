//! Type definitions for components, control plane specs and manifests

mod component;
mod manifest;
mod runtime_config;
mod spec;

pub use component::*;
pub use manifest::*;
pub use runtime_config::*;
pub use spec::*;
