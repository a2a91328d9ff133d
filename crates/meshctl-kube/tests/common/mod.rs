//! Common test utilities for meshctl-kube
//!
//! A recording command executor standing in for kubectl, and builders for
//! install package directories.

#![allow(dead_code)]

use async_trait::async_trait;
use meshctl_core::error::Result;
use meshctl_kube::{CommandExecutor, CommandOutput};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Executor returning canned output keyed by argument substrings
#[derive(Default)]
pub struct MockExecutor {
    responses: Mutex<Vec<(String, CommandOutput)>>,
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `output` to any invocation whose joined arguments
    /// contain `needle`. Earlier registrations win.
    pub fn respond(&self, needle: &str, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap()
            .push((needle.to_string(), output));
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    /// Invocations whose first non-flag argument is `verb`
    pub fn verb_calls(&self, verb: &str) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|args| args.join(" "))
            .filter(|joined| joined.split(' ').any(|a| a == verb))
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn run(&self, _program: &str, args: &[String]) -> Result<CommandOutput> {
        self.invocations.lock().unwrap().push(args.to_vec());
        let joined = args.join(" ");
        let responses = self.responses.lock().unwrap();
        for (needle, output) in responses.iter() {
            if joined.contains(needle.as_str()) {
                return Ok(output.clone());
            }
        }
        if args.iter().any(|a| a == "get") {
            return Ok(CommandOutput::success(r#"{"items":[]}"#));
        }
        Ok(CommandOutput::success(""))
    }
}

/// JSON list output for `kubectl get -o json`
pub fn object_list(items: &[(&str, &str, Option<&str>)]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|(kind, name, ns)| match ns {
            Some(ns) => format!(
                r#"{{"kind":"{}","metadata":{{"name":"{}","namespace":"{}"}}}}"#,
                kind, name, ns
            ),
            None => format!(r#"{{"kind":"{}","metadata":{{"name":"{}"}}}}"#, kind, name),
        })
        .collect();
    format!(r#"{{"items":[{}]}}"#, items.join(","))
}

/// Install package on disk with per-component manifest directories
pub struct PackageDir {
    pub dir: TempDir,
}

impl PackageDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Write an operator file pointing at this package and return its path
    pub fn operator_file(&self, body: &str) -> String {
        let content = format!(
            "apiVersion: install.istio.io/v1alpha1\nkind: IstioOperator\nspec:\n  installPackagePath: {}\n{}",
            self.path_str(),
            body
        );
        self.write("iop.yaml", &content);
        self.path().join("iop.yaml").to_string_lossy().into_owned()
    }
}
