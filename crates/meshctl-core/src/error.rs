//! Error types for meshctl-core
//!
//! Every variant carries the component, path or revision it concerns so a
//! failure can be diagnosed without re-running. None of these errors are
//! recovered locally; they are returned to the immediate caller.

use std::sync::Arc;
use thiserror::Error;

/// Result type alias using meshctl-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for meshctl
#[derive(Error, Debug)]
pub enum Error {
    /// Component identifier reused with a different category
    #[error("Component {component} is already registered as {existing}, cannot register as {requested}")]
    Conflict {
        component: String,
        existing: String,
        requested: String,
    },

    /// Expected resource is absent
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    /// No compiled-in addon source is available
    #[error("Addon source missing: {message}")]
    MissingSource { message: String },

    /// Cached failure of the one-time addon scan
    #[error("failed to scan bundled addon components: {0}")]
    AddonScan(#[source] Arc<Error>),

    /// Malformed configuration content
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// Configuration node holds a value of the wrong type
    #[error("Value at {path} has bad type {found}, expect {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// The control-plane namespace cannot be determined
    #[error("Cannot determine control plane namespace for {context}")]
    UnresolvedNamespace { context: String },

    /// The deletion engine could not be initialised
    #[error("Failed to create reconciler: {message}")]
    ReconcilerInit { message: String },

    /// The deletion engine failed to remove resources
    #[error("Failed to delete control plane resources for revision '{revision}': {message}")]
    Deletion { revision: String, message: String },

    /// Manifest generation failed or reported warnings without force
    #[error("Manifest generation failed: {message}")]
    Generation { message: String },

    /// Cluster connectivity or credentials failure
    #[error("Cluster connection failed: {message}")]
    Connectivity { message: String },

    /// Invalid combination of caller inputs
    #[error("{message}")]
    Usage { message: String },

    /// Malformed `path=value` override
    #[error("Invalid override '{value}': {message}")]
    InvalidOverride { value: String, message: String },

    /// Invalid runtime configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Invalid semver version
    #[error("Invalid version format: {version}")]
    InvalidVersion { version: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// Create a registry conflict error
    pub fn conflict(
        component: impl Into<String>,
        existing: impl ToString,
        requested: impl ToString,
    ) -> Self {
        Self::Conflict {
            component: component.into(),
            existing: existing.to_string(),
            requested: requested.to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a missing source error
    pub fn missing_source(message: impl Into<String>) -> Self {
        Self::MissingSource {
            message: message.into(),
        }
    }

    /// Create a parse error for the given path
    pub fn parse(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(path: impl Into<String>, expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create an unresolved namespace error
    pub fn unresolved_namespace(context: impl Into<String>) -> Self {
        Self::UnresolvedNamespace {
            context: context.into(),
        }
    }

    /// Create a reconciler init error
    pub fn reconciler_init(message: impl ToString) -> Self {
        Self::ReconcilerInit {
            message: message.to_string(),
        }
    }

    /// Create a deletion error
    pub fn deletion(revision: impl Into<String>, message: impl ToString) -> Self {
        Self::Deletion {
            revision: revision.into(),
            message: message.to_string(),
        }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a connectivity error
    pub fn connectivity(message: impl ToString) -> Self {
        Self::Connectivity {
            message: message.to_string(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create an invalid override error
    pub fn invalid_override(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOverride {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }
}
