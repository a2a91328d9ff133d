//! Component namespace resolution

use meshctl_core::error::{Error, Result};
use meshctl_core::tpath;
use meshctl_core::types::{ComponentName, ControlPlaneSpec};
use serde_yaml_ng::Value;
use tracing::debug;

/// Path of the control-plane namespace inside `values`
const VALUES_NAMESPACE_PATH: &str = "global.istioNamespace";

/// Resolves the namespace a component is installed into.
///
/// Precedence, highest first:
/// 1. `components.<component>.namespace` when set to a non-empty string
/// 2. the control-plane-wide default namespace
#[derive(Debug, Clone, Default)]
pub struct NamespaceResolver {
    fallback: Option<String>,
}

impl NamespaceResolver {
    /// Resolver without a configured fallback namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that uses `namespace` when the spec names none
    pub fn with_fallback(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            fallback: (!namespace.is_empty()).then_some(namespace),
        }
    }

    /// Effective namespace of `component`.
    ///
    /// An override holding anything other than a string or null fails with
    /// `Error::TypeMismatch`.
    pub fn resolve(&self, component: &ComponentName, spec: &ControlPlaneSpec) -> Result<String> {
        let path = format!("{}.namespace", component);
        match tpath::get(&spec.components, &path) {
            None | Some(Value::Null) => self.default_namespace(spec),
            Some(Value::String(ns)) if ns.is_empty() => self.default_namespace(spec),
            Some(Value::String(ns)) => {
                debug!("Component {} overrides namespace to {}", component, ns);
                Ok(ns.clone())
            }
            Some(other) => Err(Error::type_mismatch(
                format!("components.{}.namespace", component.lower_first()),
                "string",
                tpath::kind_name(other),
            )),
        }
    }

    /// Control-plane-wide namespace.
    ///
    /// Taken from `namespace`, then `values.global.istioNamespace`, then the
    /// configured fallback. Never empty.
    pub fn default_namespace(&self, spec: &ControlPlaneSpec) -> Result<String> {
        if let Some(ns) = spec.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            return Ok(ns.to_string());
        }

        match tpath::get(&spec.values, VALUES_NAMESPACE_PATH) {
            Some(Value::String(ns)) if !ns.is_empty() => return Ok(ns.clone()),
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => {
                return Err(Error::type_mismatch(
                    format!("values.{}", VALUES_NAMESPACE_PATH),
                    "string",
                    tpath::kind_name(other),
                ))
            }
        }

        self.fallback.clone().ok_or_else(|| {
            let context = match spec.revision() {
                "" => "default revision".to_string(),
                rev => format!("revision {}", rev),
            };
            Error::unresolved_namespace(context)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(yaml: &str) -> ControlPlaneSpec {
        ControlPlaneSpec::from_yaml(yaml, "test").unwrap()
    }

    #[test]
    fn test_default_from_namespace_field() {
        let resolver = NamespaceResolver::new();
        let s = spec("namespace: istio-system\n");
        assert_eq!(resolver.resolve(&ComponentName::PILOT, &s).unwrap(), "istio-system");
    }

    #[test]
    fn test_override_wins() {
        let resolver = NamespaceResolver::new();
        let s = spec("namespace: istio-system\ncomponents:\n  pilot:\n    namespace: istio-control\n");
        assert_eq!(resolver.resolve(&ComponentName::PILOT, &s).unwrap(), "istio-control");
        assert_eq!(resolver.resolve(&ComponentName::BASE, &s).unwrap(), "istio-system");
    }

    #[test]
    fn test_null_and_empty_override_fall_back() {
        let resolver = NamespaceResolver::new();
        let null = spec("namespace: a\ncomponents:\n  pilot:\n    namespace: ~\n");
        let empty = spec("namespace: a\ncomponents:\n  pilot:\n    namespace: \"\"\n");
        assert_eq!(resolver.resolve(&ComponentName::PILOT, &null).unwrap(), "a");
        assert_eq!(resolver.resolve(&ComponentName::PILOT, &empty).unwrap(), "a");
    }

    #[test]
    fn test_non_string_override_is_type_mismatch() {
        let resolver = NamespaceResolver::new();
        let s = spec("namespace: a\ncomponents:\n  pilot:\n    namespace: 5\n");
        match resolver.resolve(&ComponentName::PILOT, &s).unwrap_err() {
            Error::TypeMismatch { path, found, .. } => {
                assert_eq!(path, "components.pilot.namespace");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_values_global_namespace() {
        let resolver = NamespaceResolver::new();
        let s = spec("values:\n  global:\n    istioNamespace: mesh\n");
        assert_eq!(resolver.default_namespace(&s).unwrap(), "mesh");
    }

    #[test]
    fn test_fallback_and_unresolved() {
        let s = ControlPlaneSpec::empty_for_revision("canary");
        let err = NamespaceResolver::new().default_namespace(&s).unwrap_err();
        assert!(matches!(err, Error::UnresolvedNamespace { .. }));
        assert!(err.to_string().contains("canary"));

        let resolver = NamespaceResolver::with_fallback("istio-system");
        assert_eq!(resolver.default_namespace(&s).unwrap(), "istio-system");

        let empty_fallback = NamespaceResolver::with_fallback("");
        assert!(empty_fallback.default_namespace(&s).is_err());
    }
}
