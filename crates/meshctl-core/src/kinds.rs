//! Kubernetes and mesh resource kind names

pub const CRD: &str = "CustomResourceDefinition";
pub const DAEMON_SET: &str = "DaemonSet";
pub const DEPLOYMENT: &str = "Deployment";
pub const HPA: &str = "HorizontalPodAutoscaler";
pub const NAMESPACE: &str = "Namespace";
pub const PDB: &str = "PodDisruptionBudget";
pub const ROLE: &str = "Role";
pub const ROLE_BINDING: &str = "RoleBinding";
pub const SERVICE_ACCOUNT: &str = "ServiceAccount";
pub const SERVICE: &str = "Service";
pub const STATEFUL_SET: &str = "StatefulSet";
pub const CLUSTER_ROLE: &str = "ClusterRole";
pub const CLUSTER_ROLE_BINDING: &str = "ClusterRoleBinding";
pub const CONFIG_MAP: &str = "ConfigMap";
pub const MUTATING_WEBHOOK_CONFIGURATION: &str = "MutatingWebhookConfiguration";
pub const PVC: &str = "PersistentVolumeClaim";
pub const SECRET: &str = "Secret";
pub const VALIDATING_WEBHOOK_CONFIGURATION: &str = "ValidatingWebhookConfiguration";

pub const ENVOY_FILTER: &str = "EnvoyFilter";
pub const GATEWAY: &str = "Gateway";
pub const DESTINATION_RULE: &str = "DestinationRule";
pub const PEER_AUTHENTICATION: &str = "PeerAuthentication";
pub const VIRTUAL_SERVICE: &str = "VirtualService";

/// Namespaced kinds a control plane installs
pub const NAMESPACED_KINDS: &[&str] = &[
    DEPLOYMENT,
    DAEMON_SET,
    STATEFUL_SET,
    HPA,
    PDB,
    SERVICE,
    SERVICE_ACCOUNT,
    CONFIG_MAP,
    SECRET,
    ROLE,
    ROLE_BINDING,
    PVC,
    ENVOY_FILTER,
    GATEWAY,
    DESTINATION_RULE,
    PEER_AUTHENTICATION,
    VIRTUAL_SERVICE,
];

/// Cluster-scoped kinds shared by every revision
pub const CLUSTER_SCOPED_KINDS: &[&str] = &[
    CLUSTER_ROLE,
    CLUSTER_ROLE_BINDING,
    MUTATING_WEBHOOK_CONFIGURATION,
    VALIDATING_WEBHOOK_CONFIGURATION,
    CRD,
];

/// Whether `kind` is cluster scoped
pub fn is_cluster_scoped(kind: &str) -> bool {
    kind == NAMESPACE || CLUSTER_SCOPED_KINDS.contains(&kind)
}
