//! Control plane configuration tree

use crate::error::{Error, Result};
use crate::tpath;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};

/// Profile used for synthetic specs that install nothing
pub const EMPTY_PROFILE: &str = "empty";

/// Control plane specification
///
/// `components`, `addonComponents` and `values` stay untyped so that values
/// of the wrong type remain observable to resolvers instead of failing at
/// parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Control-plane-wide namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Path to charts and pre-rendered manifests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_package_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub components: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub addon_components: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub values: Value,

    /// Keys not modelled above, preserved verbatim
    #[serde(flatten)]
    pub extra: Mapping,
}

impl ControlPlaneSpec {
    /// Synthetic spec carrying only the empty profile and a revision
    pub fn empty_for_revision(revision: impl Into<String>) -> Self {
        let revision = revision.into();
        Self {
            profile: Some(EMPTY_PROFILE.to_string()),
            revision: (!revision.is_empty()).then_some(revision),
            ..Self::default()
        }
    }

    /// Parse a spec from YAML.
    ///
    /// Accepts either a full resource document (with a top-level `spec` key)
    /// or a bare spec.
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self> {
        let doc: Value = serde_yaml_ng::from_str(content).map_err(|e| Error::parse(origin, e))?;
        let spec = match doc.get("spec") {
            Some(spec) if doc.get("kind").is_some() || doc.get("apiVersion").is_some() => {
                spec.clone()
            }
            _ => doc,
        };
        if spec.is_null() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_value(spec).map_err(|e| Error::parse(origin, e))
    }

    /// Revision label, empty for the default revision
    pub fn revision(&self) -> &str {
        self.revision.as_deref().unwrap_or("")
    }

    /// The whole spec as an untyped tree
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_yaml_ng::to_value(self)?)
    }

    /// Look up the node at a dotted path
    pub fn get_path(&self, path: &str) -> Result<Option<Value>> {
        let root = self.to_value()?;
        Ok(tpath::get(&root, path).cloned())
    }

    /// Set the node at a dotted path, returning the updated spec
    pub fn with_path(&self, path: &str, value: Value) -> Result<Self> {
        let mut root = self.to_value()?;
        tpath::set(&mut root, path, value)?;
        serde_yaml_ng::from_value(root).map_err(|e| Error::parse(path, e))
    }
}
