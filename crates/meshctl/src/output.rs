//! Terminal output for uninstall runs

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use meshctl_uninstall::UninstallRequest;

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Spinner shown while resources are removed
pub fn removal_spinner(dry_run: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.set_message(if dry_run {
        "Listing resources that would be removed..."
    } else {
        "Removing resources..."
    });
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Human name of the deletion scope
pub fn scope_label(request: &UninstallRequest) -> &'static str {
    match request {
        UninstallRequest::PruneByRevision { .. } => "prune by revision",
        UninstallRequest::DeleteByManifest { .. } => "delete by manifest",
    }
}

/// Revision as users know it; the empty revision is `default`
pub fn revision_label(revision: &str) -> &str {
    if revision.is_empty() {
        "default"
    } else {
        revision
    }
}

/// Summary of an executed uninstall request
pub fn request_summary(request: &UninstallRequest) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Scope", scope_label(request).to_string())];
    if let UninstallRequest::DeleteByManifest { manifests, .. } = request {
        rows.push(("Components", manifests.len().to_string()));
        rows.push(("Manifests", manifests.fragment_count().to_string()));
    }
    rows.push(("Revision", revision_label(request.revision()).to_string()));
    rows.push(("Purge", if request.purge() { "yes" } else { "no" }.to_string()));
    rows
}

/// Print [`request_summary`] as key-value lines
pub fn print_summary(request: &UninstallRequest) {
    header("Summary");
    for (key, value) in request_summary(request) {
        kv(key, &value);
    }
}
