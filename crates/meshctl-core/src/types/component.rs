//! Component identifiers and categories

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// A component name, typed to constrain where it is accepted.
///
/// Names are case-sensitive and match the component keys of the control
/// plane configuration with the first character upper-cased (`Pilot` for
/// `components.pilot`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentName(Cow<'static, str>);

impl ComponentName {
    pub const BASE: ComponentName = ComponentName::from_static("Base");
    pub const PILOT: ComponentName = ComponentName::from_static("Pilot");
    pub const POLICY: ComponentName = ComponentName::from_static("Policy");
    pub const TELEMETRY: ComponentName = ComponentName::from_static("Telemetry");
    pub const CNI: ComponentName = ComponentName::from_static("Cni");
    pub const ISTIOD_REMOTE: ComponentName = ComponentName::from_static("IstiodRemote");

    pub const INGRESS_GATEWAYS: ComponentName = ComponentName::from_static("IngressGateways");
    pub const EGRESS_GATEWAYS: ComponentName = ComponentName::from_static("EgressGateways");

    /// Root of all addon components
    pub const ADDON_COMPONENTS: ComponentName = ComponentName::from_static("AddonComponents");

    pub const ISTIO_OPERATOR: ComponentName = ComponentName::from_static("IstioOperator");
    pub const ISTIO_OPERATOR_CUSTOM_RESOURCE: ComponentName =
        ComponentName::from_static("IstioOperatorCustomResource");

    /// All core components, in install order
    pub const ALL_CORE: [ComponentName; 6] = [
        Self::BASE,
        Self::PILOT,
        Self::POLICY,
        Self::TELEMETRY,
        Self::CNI,
        Self::ISTIOD_REMOTE,
    ];

    pub const ALL_GATEWAYS: [ComponentName; 2] = [Self::INGRESS_GATEWAYS, Self::EGRESS_GATEWAYS];

    pub const ALL_OPERATOR_META: [ComponentName; 2] =
        [Self::ISTIO_OPERATOR, Self::ISTIO_OPERATOR_CUSTOM_RESOURCE];

    /// Create a name from a static string
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a name from any string
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Version of the name with the first character upper-cased
    pub fn title_case(&self) -> ComponentName {
        ComponentName::new(upper_first(&self.0))
    }

    /// Version of the name with the first character lower-cased, as used in
    /// configuration keys and enablement paths
    pub fn lower_first(&self) -> String {
        lower_first(&self.0)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ComponentName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for ComponentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ComponentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Category of a registered component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentCategory {
    Core,
    Gateway,
    Addon,
    OperatorMeta,
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentCategory::Core => write!(f, "core"),
            ComponentCategory::Gateway => write!(f, "gateway"),
            ComponentCategory::Addon => write!(f, "addon"),
            ComponentCategory::OperatorMeta => write!(f, "operator-meta"),
        }
    }
}

/// Upper-case the first character of `s`
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character of `s`
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
