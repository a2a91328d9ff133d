//! Mock collaborators for planner tests
//!
//! Every mock records its invocations so tests can assert on what the
//! planner asked for without touching a cluster.

#![allow(dead_code)]

use async_trait::async_trait;
use meshctl_components::{AddonDiscovery, ComponentRegistry};
use meshctl_core::error::{Error, Result};
use meshctl_core::types::{ComponentName, ControlPlaneSpec, ManifestMap};
use meshctl_uninstall::{
    ClusterClientFactory, ClusterSession, DeletionEngine, DeletionEngineFactory, GeneratedManifests,
    InternalSpec, ManifestGenerator, ProgressSink, ProgressState, ResourceRef, SetOverride,
    SpecTranslator, UninstallPlanner,
};
use std::sync::{Arc, Mutex};

/// Call made against a mock deletion engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    PruneByRevision {
        revision: String,
        purge: bool,
        namespace_hint: String,
    },
    DeleteResources(Vec<ResourceRef>),
    DeleteByManifests {
        components: Vec<String>,
        revision: String,
        purge: bool,
    },
}

/// Engine failure to inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFailure {
    None,
    Create,
    Prune,
    Delete,
}

/// Cluster client factory returning a fixed session
#[derive(Default)]
pub struct MockClusterFactory {
    pub connects: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
    pub fail: bool,
}

#[async_trait]
impl ClusterClientFactory for MockClusterFactory {
    async fn connect(&self, kubeconfig: Option<&str>, context: Option<&str>) -> Result<ClusterSession> {
        self.connects
            .lock()
            .unwrap()
            .push((kubeconfig.map(String::from), context.map(String::from)));
        if self.fail {
            return Err(Error::connectivity("no route to cluster"));
        }
        Ok(ClusterSession {
            kubeconfig: kubeconfig.map(String::from),
            context: context.map(String::from),
            server: Some("https://127.0.0.1:6443".to_string()),
        })
    }
}

/// Engine factory handing out engines that share one call log
pub struct MockEngineFactory {
    pub created: Arc<Mutex<Vec<InternalSpec>>>,
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    pub failure: EngineFailure,
    pub pruned: Vec<ResourceRef>,
}

impl MockEngineFactory {
    pub fn new() -> Self {
        Self::failing(EngineFailure::None)
    }

    pub fn failing(failure: EngineFailure) -> Self {
        Self {
            created: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failure,
            pruned: vec![
                ResourceRef::namespaced("Deployment", "istio-system", "istiod-canary"),
                ResourceRef::cluster_scoped("MutatingWebhookConfiguration", "istio-sidecar-injector-canary"),
            ],
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<InternalSpec> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeletionEngineFactory for MockEngineFactory {
    async fn create(&self, _session: &ClusterSession, spec: &InternalSpec) -> Result<Box<dyn DeletionEngine>> {
        self.created.lock().unwrap().push(spec.clone());
        if self.failure == EngineFailure::Create {
            return Err(Error::invalid_config("cannot build client"));
        }
        Ok(Box::new(MockEngine {
            calls: Arc::clone(&self.calls),
            failure: self.failure,
            pruned: self.pruned.clone(),
        }))
    }
}

struct MockEngine {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    failure: EngineFailure,
    pruned: Vec<ResourceRef>,
}

#[async_trait]
impl DeletionEngine for MockEngine {
    async fn prune_by_revision(&self, revision: &str, purge: bool, namespace_hint: &str) -> Result<Vec<ResourceRef>> {
        self.calls.lock().unwrap().push(EngineCall::PruneByRevision {
            revision: revision.to_string(),
            purge,
            namespace_hint: namespace_hint.to_string(),
        });
        if self.failure == EngineFailure::Prune {
            return Err(Error::connectivity("list failed"));
        }
        Ok(self.pruned.clone())
    }

    async fn delete_resources(&self, resources: &[ResourceRef]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::DeleteResources(resources.to_vec()));
        if self.failure == EngineFailure::Delete {
            return Err(Error::connectivity("delete failed"));
        }
        Ok(())
    }

    async fn delete_by_manifests(&self, manifests: &ManifestMap, revision: &str, purge: bool) -> Result<()> {
        let mut components: Vec<String> = manifests.components().map(|c| c.to_string()).collect();
        components.sort();
        self.calls.lock().unwrap().push(EngineCall::DeleteByManifests {
            components,
            revision: revision.to_string(),
            purge,
        });
        if self.failure == EngineFailure::Delete {
            return Err(Error::connectivity("delete failed"));
        }
        Ok(())
    }
}

/// Recorded generator invocation
#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub files: Vec<String>,
    pub overrides: Vec<SetOverride>,
    pub force: bool,
}

/// Manifest generator applying overrides to a fixed spec
pub struct MockGenerator {
    pub calls: Arc<Mutex<Vec<GenerateCall>>>,
    pub spec: ControlPlaneSpec,
    pub warnings: Vec<String>,
    pub fail: bool,
}

impl MockGenerator {
    pub fn new(spec: ControlPlaneSpec) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            spec,
            warnings: Vec::new(),
            fail: false,
        }
    }

    pub fn with_warnings(mut self, warnings: &[&str]) -> Self {
        self.warnings = warnings.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ManifestGenerator for MockGenerator {
    async fn generate(
        &self,
        files: &[String],
        overrides: &[SetOverride],
        force: bool,
        _session: &ClusterSession,
    ) -> Result<GeneratedManifests> {
        self.calls.lock().unwrap().push(GenerateCall {
            files: files.to_vec(),
            overrides: overrides.to_vec(),
            force,
        });
        if self.fail {
            return Err(Error::generation("chart rendering failed"));
        }

        let mut spec = self.spec.clone();
        for o in overrides {
            spec = o.apply(&spec)?;
        }

        let mut manifests = ManifestMap::new();
        manifests.push(ComponentName::BASE, "kind: CustomResourceDefinition");
        manifests.push(ComponentName::PILOT, "kind: Deployment");
        Ok(GeneratedManifests {
            manifests,
            spec,
            warnings: self.warnings.clone(),
        })
    }
}

/// Translator recording profile tags and namespaces
#[derive(Default)]
pub struct MockTranslator {
    pub calls: Arc<Mutex<Vec<(String, String, String)>>>,
    pub fail: bool,
}

impl SpecTranslator for MockTranslator {
    fn to_internal_spec(&self, spec: &ControlPlaneSpec, profile_tag: &str, namespace: &str) -> Result<InternalSpec> {
        self.calls.lock().unwrap().push((
            spec.revision().to_string(),
            profile_tag.to_string(),
            namespace.to_string(),
        ));
        if self.fail {
            return Err(Error::parse("spec", "unknown field"));
        }
        Ok(InternalSpec {
            name: format!("installed-state-{}", profile_tag),
            namespace: namespace.to_string(),
            revision: spec.revision().to_string(),
            profile_tag: profile_tag.to_string(),
            document: serde_yaml_ng::Value::Null,
        })
    }
}

/// Progress sink recording every state
#[derive(Default)]
pub struct RecordingSink {
    pub states: Arc<Mutex<Vec<ProgressState>>>,
}

impl ProgressSink for RecordingSink {
    fn set_state(&self, state: ProgressState) {
        self.states.lock().unwrap().push(state);
    }
}

/// Planner wired to mocks, keeping handles for assertions
pub struct Harness {
    pub clients: Arc<MockClusterFactory>,
    pub engines: Arc<MockEngineFactory>,
    pub generator: Arc<MockGenerator>,
    pub translator: Arc<MockTranslator>,
    pub sink: Arc<RecordingSink>,
    pub planner: UninstallPlanner,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(
            MockEngineFactory::new(),
            MockGenerator::new(spec_with_revision("canary")),
            MockTranslator::default(),
        )
    }

    /// Harness whose cluster factory refuses to connect
    pub fn disconnected() -> Self {
        Self::assemble(
            MockClusterFactory {
                fail: true,
                ..Default::default()
            },
            MockEngineFactory::new(),
            MockGenerator::new(spec_with_revision("canary")),
            MockTranslator::default(),
        )
    }

    pub fn build(engines: MockEngineFactory, generator: MockGenerator, translator: MockTranslator) -> Self {
        Self::assemble(MockClusterFactory::default(), engines, generator, translator)
    }

    fn assemble(
        clients: MockClusterFactory,
        engines: MockEngineFactory,
        generator: MockGenerator,
        translator: MockTranslator,
    ) -> Self {
        let registry = Arc::new(ComponentRegistry::new());
        let discovery = Arc::new(AddonDiscovery::new(registry));
        let clients = Arc::new(clients);
        let engines = Arc::new(engines);
        let generator = Arc::new(generator);
        let translator = Arc::new(translator);
        let sink = Arc::new(RecordingSink::default());

        let planner = UninstallPlanner::new(
            discovery,
            clients.clone(),
            engines.clone(),
            generator.clone(),
            translator.clone(),
            sink.clone(),
        );
        Self {
            clients,
            engines,
            generator,
            translator,
            sink,
            planner,
        }
    }

    pub fn states(&self) -> Vec<ProgressState> {
        self.sink.states.lock().unwrap().clone()
    }
}

/// Spec as read from an operator file
pub fn spec_with_revision(revision: &str) -> ControlPlaneSpec {
    ControlPlaneSpec::from_yaml(
        &format!("namespace: istio-system\nrevision: {}\n", revision),
        "iop.yaml",
    )
    .expect("valid spec")
}
