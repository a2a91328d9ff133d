//! Uninstall command

use anyhow::Result;
use dialoguer::Confirm;
use meshctl_components::{AddonDiscovery, ComponentRegistry};
use meshctl_core::config::HierarchicalConfigLoader;
use meshctl_core::resources::EmbeddedStore;
use meshctl_core::version::MinorVersion;
use meshctl_kube::{
    KubectlClientFactory, KubectlDeletionEngineFactory, OperatorSpecTranslator,
    PrerenderedManifestGenerator,
};
use meshctl_uninstall::{UninstallOptions, UninstallPlanner};
use std::sync::Arc;

use crate::cli::UninstallArgs;
use crate::output;
use crate::progress::ConsoleProgress;

pub async fn run(args: UninstallArgs) -> Result<()> {
    let runtime = HierarchicalConfigLoader::new()?.load_runtime_config()?;
    let options = args.into_options(&runtime);
    options.validate()?;

    if !options.skip_confirmation && !options.dry_run {
        let confirmed = Confirm::new()
            .with_prompt(confirmation_prompt(&options))
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    output::header("Uninstalling control plane");
    if options.dry_run {
        output::warning("Dry run: nothing will be deleted");
    }

    let registry = Arc::new(ComponentRegistry::new());
    registry.load_deprecated(&EmbeddedStore::new(), MinorVersion::of_binary()?)?;

    let spinner = output::removal_spinner(options.dry_run);
    let planner = UninstallPlanner::new(
        Arc::new(AddonDiscovery::new(registry.clone())),
        Arc::new(KubectlClientFactory::new()),
        Arc::new(KubectlDeletionEngineFactory::new(registry.clone(), options.dry_run)),
        Arc::new(PrerenderedManifestGenerator::new(registry)),
        Arc::new(OperatorSpecTranslator),
        Arc::new(ConsoleProgress::with_spinner(spinner.clone())),
    );

    let outcome = planner.uninstall(&options).await;
    spinner.finish_and_clear();
    output::print_summary(&outcome?);

    Ok(())
}

fn confirmation_prompt(options: &UninstallOptions) -> String {
    let target = match (options.filename(), options.revision.as_str()) {
        (Some(file), _) => format!("the control plane described by '{}'", file),
        (None, "") if options.purge => "every control plane revision".to_string(),
        (None, "") => "the default control plane revision".to_string(),
        (None, revision) => format!("control plane revision '{}'", revision),
    };
    let shared = if options.purge {
        " and all shared cluster-scoped resources"
    } else {
        ""
    };
    format!("Remove {}{}?", target, shared)
}
