//! Operator resource translation

use meshctl_core::error::{Error, Result};
use meshctl_core::types::ControlPlaneSpec;
use meshctl_uninstall::{InternalSpec, SpecTranslator};
use serde_yaml_ng::{Mapping, Value};

/// API version of the operator resource
pub const OPERATOR_API_VERSION: &str = "install.istio.io/v1alpha1";

/// Kind of the operator resource
pub const OPERATOR_KIND: &str = "IstioOperator";

/// Prefix of the operator resource name
pub const INSTALLED_STATE_PREFIX: &str = "installed-state";

/// Wraps a spec into an `IstioOperator` resource named
/// `installed-state-<tag>`
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorSpecTranslator;

impl SpecTranslator for OperatorSpecTranslator {
    fn to_internal_spec(&self, spec: &ControlPlaneSpec, profile_tag: &str, namespace: &str) -> Result<InternalSpec> {
        if profile_tag.is_empty() {
            return Err(Error::invalid_config("profile tag must not be empty"));
        }
        if namespace.is_empty() {
            return Err(Error::unresolved_namespace(format!(
                "operator resource {}",
                profile_tag
            )));
        }

        let name = format!("{}-{}", INSTALLED_STATE_PREFIX, profile_tag);

        let mut metadata = Mapping::new();
        metadata.insert("name".into(), name.as_str().into());
        metadata.insert("namespace".into(), namespace.into());

        let mut document = Mapping::new();
        document.insert("apiVersion".into(), OPERATOR_API_VERSION.into());
        document.insert("kind".into(), OPERATOR_KIND.into());
        document.insert("metadata".into(), Value::Mapping(metadata));
        document.insert("spec".into(), spec.to_value()?);

        Ok(InternalSpec {
            name,
            namespace: namespace.to_string(),
            revision: spec.revision().to_string(),
            profile_tag: profile_tag.to_string(),
            document: Value::Mapping(document),
        })
    }
}
