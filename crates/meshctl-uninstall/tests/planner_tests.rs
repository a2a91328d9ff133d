//! Uninstall planner integration tests
//!
//! Covers both deletion scopes end to end against recording mocks:
//! - revision-only pruning never generates manifests
//! - manifest deletion forwards revision and purge
//! - generator warnings abort unless forced
//! - engine and translator failures surface with the right error kind

mod common;

use common::*;
use meshctl_core::error::Error;
use meshctl_core::types::EMPTY_PROFILE;
use meshctl_uninstall::planner::REMOVED_PROFILE_TAG;
use meshctl_uninstall::{ProgressState, UninstallOptions, UninstallRequest};
use serde_yaml_ng::Value;

fn by_revision(revision: &str) -> UninstallOptions {
    UninstallOptions {
        revision: revision.to_string(),
        istio_namespace: Some("istio-system".to_string()),
        ..Default::default()
    }
}

fn by_file(purge: bool) -> UninstallOptions {
    UninstallOptions {
        filename: Some("iop.yaml".to_string()),
        purge,
        istio_namespace: Some("istio-system".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_revision_only_prunes_without_generating() {
    let h = Harness::new();

    let request = h.planner.uninstall(&by_revision("canary")).await.unwrap();

    assert!(matches!(
        request,
        UninstallRequest::PruneByRevision { ref revision, purge: false } if revision == "canary"
    ));
    assert!(h.generator.calls().is_empty());

    let calls = h.engines.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        EngineCall::PruneByRevision {
            revision: "canary".to_string(),
            purge: false,
            namespace_hint: String::new(),
        }
    );
    assert_eq!(calls[1], EngineCall::DeleteResources(h.engines.pruned.clone()));

    let created = h.engines.created();
    assert_eq!(created[0].profile_tag, EMPTY_PROFILE);
    assert_eq!(created[0].namespace, "istio-system");
    assert_eq!(created[0].revision, "canary");

    assert_eq!(h.states(), vec![ProgressState::UninstallComplete]);
}

#[tokio::test]
async fn test_revision_alone_prunes_in_default_namespace() {
    let h = Harness::new();
    let options = UninstallOptions {
        revision: "canary".into(),
        ..Default::default()
    };

    let request = h.planner.uninstall(&options).await.unwrap();

    assert_eq!(request.revision(), "canary");
    assert!(h.generator.calls().is_empty());
    assert_eq!(h.engines.created()[0].namespace, "istio-system");
    assert_eq!(
        h.engines.calls()[0],
        EngineCall::PruneByRevision {
            revision: "canary".to_string(),
            purge: false,
            namespace_hint: String::new(),
        }
    );
    assert_eq!(h.states(), vec![ProgressState::UninstallComplete]);
}

#[tokio::test]
async fn test_purge_only_prunes_every_revision() {
    let h = Harness::new();
    let options = UninstallOptions {
        purge: true,
        ..Default::default()
    };

    h.planner.uninstall(&options).await.unwrap();
    assert_eq!(h.engines.created()[0].namespace, "istio-system");

    let h = Harness::new();
    let options = UninstallOptions {
        istio_namespace: Some("mesh".to_string()),
        ..options
    };
    h.planner.uninstall(&options).await.unwrap();
    assert_eq!(
        h.engines.calls()[0],
        EngineCall::PruneByRevision {
            revision: String::new(),
            purge: true,
            namespace_hint: String::new(),
        }
    );
    assert_eq!(h.engines.created()[0].namespace, "mesh");
}

#[tokio::test]
async fn test_filename_with_purge_deletes_by_manifest() {
    let h = Harness::new();

    let request = h.planner.uninstall(&by_file(true)).await.unwrap();
    assert_eq!(request.revision(), "canary");
    assert!(request.purge());

    let calls = h.engines.calls();
    assert_eq!(
        calls,
        vec![EngineCall::DeleteByManifests {
            components: vec!["Base".to_string(), "Pilot".to_string()],
            revision: "canary".to_string(),
            purge: true,
        }]
    );

    let translated = h.translator.calls.lock().unwrap().clone();
    assert_eq!(
        translated,
        vec![(
            "canary".to_string(),
            REMOVED_PROFILE_TAG.to_string(),
            "istio-system".to_string()
        )]
    );
    assert_eq!(h.states(), vec![ProgressState::UninstallComplete]);
}

#[tokio::test]
async fn test_revision_flag_overrides_file_revision() {
    let h = Harness::new();
    let options = UninstallOptions {
        revision: "stable".to_string(),
        manifests_path: None,
        set: vec!["values.grafana.enabled=true".to_string()],
        ..by_file(false)
    };

    let request = h.planner.uninstall(&options).await.unwrap();
    assert_eq!(request.revision(), "stable");

    let generated = h.generator.calls();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].files, vec!["iop.yaml".to_string()]);

    let paths: Vec<&str> = generated[0].overrides.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, vec!["addonComponents.grafana.enabled", "revision"]);
    assert_eq!(generated[0].overrides[0].value, Value::Bool(true));
}

#[tokio::test]
async fn test_generation_warnings_abort_without_force() {
    let h = Harness::build(
        MockEngineFactory::new(),
        MockGenerator::new(spec_with_revision("canary")).with_warnings(&["component Foo is not recognised"]),
        MockTranslator::default(),
    );

    let err = h.planner.uninstall(&by_file(false)).await.unwrap_err();
    assert!(matches!(err, Error::Generation { .. }));
    assert!(err.to_string().contains("Foo"));
    assert!(h.engines.calls().is_empty());
    assert!(h.states().is_empty());
}

#[tokio::test]
async fn test_generation_warnings_logged_with_force() {
    let h = Harness::build(
        MockEngineFactory::new(),
        MockGenerator::new(spec_with_revision("canary")).with_warnings(&["component Foo is not recognised"]),
        MockTranslator::default(),
    );
    let options = UninstallOptions {
        force: true,
        ..by_file(false)
    };

    h.planner.uninstall(&options).await.unwrap();
    assert!(h.generator.calls()[0].force);
    assert_eq!(h.engines.calls().len(), 1);
}

#[tokio::test]
async fn test_missing_target_is_usage_error() {
    let h = Harness::new();

    let err = h.planner.uninstall(&UninstallOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::Usage { .. }));
    assert!(h.clients.connects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_translation_failure_is_reconciler_init() {
    let h = Harness::build(
        MockEngineFactory::new(),
        MockGenerator::new(spec_with_revision("canary")),
        MockTranslator {
            fail: true,
            ..Default::default()
        },
    );

    let err = h.planner.uninstall(&by_revision("canary")).await.unwrap_err();
    assert!(matches!(err, Error::ReconcilerInit { .. }));
    assert!(h.engines.created().is_empty());
}

#[tokio::test]
async fn test_engine_creation_failure_is_reconciler_init() {
    let h = Harness::build(
        MockEngineFactory::failing(EngineFailure::Create),
        MockGenerator::new(spec_with_revision("canary")),
        MockTranslator::default(),
    );

    let err = h.planner.uninstall(&by_file(false)).await.unwrap_err();
    assert!(matches!(err, Error::ReconcilerInit { .. }));
}

#[tokio::test]
async fn test_engine_failures_are_deletion_errors() {
    for failure in [EngineFailure::Prune, EngineFailure::Delete] {
        let h = Harness::build(
            MockEngineFactory::failing(failure),
            MockGenerator::new(spec_with_revision("canary")),
            MockTranslator::default(),
        );

        match h.planner.uninstall(&by_revision("canary")).await.unwrap_err() {
            Error::Deletion { revision, .. } => assert_eq!(revision, "canary"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(h.states().is_empty());
    }
}

#[tokio::test]
async fn test_connectivity_failure_surfaces_verbatim() {
    let h = Harness::disconnected();
    let options = UninstallOptions {
        kubeconfig: Some("/tmp/kubeconfig".to_string()),
        context: Some("kind-mesh".to_string()),
        ..by_revision("canary")
    };

    let err = h.planner.uninstall(&options).await.unwrap_err();
    assert!(matches!(err, Error::Connectivity { .. }));
    assert_eq!(
        h.clients.connects.lock().unwrap().clone(),
        vec![(Some("/tmp/kubeconfig".to_string()), Some("kind-mesh".to_string()))]
    );
    assert!(h.engines.created().is_empty());
}
