//! Outcome of a provisioning run

use crate::network::NetworkMode;
use kubeforge_core::{Error, OutputSink, Result};
use std::fmt;
use std::path::PathBuf;

/// Top-level phases of the provisioning workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validate,
    ResolveNetwork,
    BuildPlan,
    Execute,
    WriteCredentials,
    AuthorizeAndAwaitNodes,
    RunDeferredAddOns,
    GitOpsBootstrap,
    PrivateLockdown,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::ResolveNetwork => "resolve network",
            Stage::BuildPlan => "build plan",
            Stage::Execute => "execute",
            Stage::WriteCredentials => "write credentials",
            Stage::AuthorizeAndAwaitNodes => "authorize and await nodes",
            Stage::RunDeferredAddOns => "run deferred add-ons",
            Stage::GitOpsBootstrap => "GitOps bootstrap",
            Stage::PrivateLockdown => "private lockdown",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What happened during one workflow run
#[derive(Debug)]
pub struct ProvisionReport {
    pub cluster: String,
    pub region: String,
    /// Stages entered, in order
    pub stages: Vec<Stage>,
    pub network_mode: Option<NetworkMode>,
    /// Stage whose failures stopped the run
    pub failed_stage: Option<Stage>,
    pub failures: Vec<Error>,
    /// Node groups that reached their expected ready node count
    pub ready_node_groups: Vec<String>,
    pub kubeconfig_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl ProvisionReport {
    pub fn new(cluster: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            region: region.into(),
            stages: Vec::new(),
            network_mode: None,
            failed_stage: None,
            failures: Vec::new(),
            ready_node_groups: Vec::new(),
            kubeconfig_path: None,
            dry_run: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed_stage.is_none() && self.failures.is_empty()
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        tracing::info!(stage = %stage, cluster = %self.cluster, "entering stage");
        self.stages.push(stage);
    }

    pub(crate) fn fail(&mut self, stage: Stage, failures: Vec<Error>) {
        tracing::error!(stage = %stage, failed = failures.len(), "stage failed");
        self.failed_stage.get_or_insert(stage);
        self.failures.extend(failures);
    }

    /// Teardown command for a partially created cluster
    pub fn cleanup_command(&self) -> String {
        format!(
            "kubeforge delete cluster --region={} --name={}",
            self.region, self.cluster
        )
    }

    /// Write the failure summary: count, cleanup advice, then every failure
    /// with capability explanations ahead of their error chain
    pub fn render_failures(&self, output: &OutputSink, summary: &str) {
        if self.failures.is_empty() {
            return;
        }

        output.line(format!("{} error(s) occurred and {summary}", self.failures.len()));
        output.line(format!("to cleanup resources, run '{}'", self.cleanup_command()));
        for failure in &self.failures {
            if let Some(message) = failure.capability_message() {
                output.line(message);
            }
            output.line(failure.to_string());
        }
    }

    /// Convert a failed run into an error for callers that only need
    /// success or failure
    pub fn into_result(self) -> Result<Self> {
        match self.failed_stage {
            None => Ok(self),
            Some(stage) => Err(Error::provider(
                format!("{stage} stage"),
                format!(
                    "failed to create cluster {:?} ({} error(s))",
                    self.cluster,
                    self.failures.len()
                ),
            )),
        }
    }
}
