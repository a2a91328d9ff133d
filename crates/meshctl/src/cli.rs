//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use meshctl_core::types::RuntimeConfig;
use meshctl_uninstall::UninstallOptions;

/// meshctl - service mesh control plane management
#[derive(Parser, Debug)]
#[command(name = "meshctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Uninstall a control plane from a cluster
    #[command(after_help = UNINSTALL_EXAMPLES)]
    Uninstall(UninstallArgs),
}

const UNINSTALL_EXAMPLES: &str = "\
Examples:
  # Uninstall a single control plane by revision
  meshctl uninstall --revision foo

  # Uninstall a single control plane by operator file
  meshctl uninstall -f iop.yaml

  # Uninstall all control planes and shared resources
  meshctl uninstall --purge";

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Uninstall command
#[derive(Args, Debug, Default)]
pub struct UninstallArgs {
    /// Path to kube config
    #[arg(short = 'c', long)]
    pub kubeconfig: Option<String>,

    /// The name of the kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Target control plane revision
    #[arg(short, long, default_value = "")]
    pub revision: String,

    /// The filename of the operator resource describing the control plane
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Delete all mesh resources of every revision, including shared ones
    #[arg(long)]
    pub purge: bool,

    /// Proceed even with generation warnings
    #[arg(long)]
    pub force: bool,

    /// Override a value, path=value (repeatable)
    #[arg(short, long = "set", value_name = "PATH=VALUE")]
    pub set: Vec<String>,

    /// Directory with charts and pre-rendered manifests
    #[arg(short = 'd', long = "manifests")]
    pub manifests: Option<String>,

    /// The namespace of the control plane
    #[arg(long = "istio-namespace", alias = "istioNamespace")]
    pub istio_namespace: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub skip_confirmation: bool,

    /// Print what would be deleted without deleting it
    #[arg(long)]
    pub dry_run: bool,
}

impl UninstallArgs {
    /// Uninstall options with unset flags filled from runtime configuration
    pub fn into_options(self, runtime: &RuntimeConfig) -> UninstallOptions {
        UninstallOptions {
            kubeconfig: self.kubeconfig.or_else(|| runtime.kubeconfig.clone()),
            context: self.context.or_else(|| runtime.context.clone()),
            revision: self.revision,
            filename: self.filename,
            purge: self.purge,
            force: self.force,
            set: self.set,
            manifests_path: self.manifests.or_else(|| runtime.manifests_path.clone()),
            istio_namespace: Some(
                self.istio_namespace
                    .filter(|ns| !ns.is_empty())
                    .unwrap_or_else(|| runtime.default_namespace.clone()),
            ),
            skip_confirmation: self.skip_confirmation,
            dry_run: self.dry_run,
        }
    }
}
