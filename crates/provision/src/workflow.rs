//! Cluster Provisioning Workflow
//!
//! Runs the stages in a fixed order:
//!
//! ```text
//! Validate -> ResolveNetwork -> BuildPlan -> Execute -> WriteCredentials
//!   -> AuthorizeAndAwaitNodes -> RunDeferredAddOns -> GitOpsBootstrap
//!   -> PrivateLockdown -> Done
//! ```
//!
//! Validation, network and planning problems are returned as errors before
//! anything is mutated. Failures from executed stages are collected in the
//! returned [`ProvisionReport`] together with cleanup advice; nothing is
//! rolled back automatically.

use crate::network::{resolve_network, NetworkResolution, ResolvedNetwork};
use crate::plan::{build_cluster_plan, ClusterPlan, PlanFeatures};
use crate::readiness::{build_readiness_plan, ReadinessOutcome};
use crate::report::{ProvisionReport, Stage};
use kubeforge_config::{
    validate, ClusterEndpoints, ClusterSpec, ClusterSpecLoader, CreateParams, ValidatedSpec,
};
use kubeforge_core::{Error, OutputSink, Result, DEFAULT_POLL_INTERVAL};
use kubeforge_provider::{ClusterProvider, KubeconfigRequest};
use kubeforge_utils::WaitOptions;
use std::path::PathBuf;

/// Drives one cluster creation against a provider
pub struct ProvisionWorkflow {
    provider: ClusterProvider,
    params: CreateParams,
    output: OutputSink,
    poll_interval: std::time::Duration,
}

impl ProvisionWorkflow {
    pub fn new(provider: ClusterProvider, params: CreateParams, output: OutputSink) -> Self {
        Self {
            provider,
            params,
            output,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override how often readiness waits poll
    pub fn with_poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Provision the cluster described by `spec`
    pub async fn run(&self, spec: ClusterSpec) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::new(&spec.metadata.name, &spec.metadata.region);
        report.dry_run = self.params.dry_run;
        let _muted = self.params.dry_run.then(|| self.output.mute());

        report.enter(Stage::Validate);
        let validated = validate(spec)?;
        let kubeconfig_path = self.params.kubeconfig.resolve_path(validated.name())?;
        self.output
            .line(format!("using Kubernetes version {}", validated.version()));

        report.enter(Stage::ResolveNetwork);
        let resolution =
            resolve_network(validated.spec(), &self.params, self.provider.network.as_ref())
                .await?;
        report.network_mode = Some(resolution.mode().clone());

        let network = match resolution {
            NetworkResolution::DryRun {
                availability_zones, ..
            } => {
                self.print_dry_run(&validated, availability_zones)?;
                report.enter(Stage::Done);
                return Ok(report);
            }
            NetworkResolution::Resolved(network) => network,
        };

        report.enter(Stage::BuildPlan);
        let plan = self.build_plan(&validated, &network)?;

        report.enter(Stage::Execute);
        let ClusterPlan {
            tree,
            deferred_addons,
            outline,
            spec,
        } = plan;
        let failures = tree.execute().await;
        if !failures.is_empty() {
            let salvageable = outline.created_node_groups(&failures);
            report.fail(Stage::Execute, failures);
            if !salvageable.is_empty() {
                self.output.line(format!(
                    "waiting for nodegroups that were created despite the failures: {}",
                    salvageable.join(", ")
                ));
                self.await_nodes(&spec, Some(salvageable.as_slice()), &mut report).await;
            }
            // Covers creation failures and any from the salvage readiness pass
            report.render_failures(
                &self.output,
                "cluster hasn't been created properly, you may wish to check the provider console",
            );
            return Ok(report);
        }
        self.output.line("waiting for the control plane availability...");

        report.enter(Stage::WriteCredentials);
        report.kubeconfig_path = self.write_credentials(&validated, kubeconfig_path).await;

        if !self.await_nodes(&spec, None, &mut report).await {
            report.render_failures(&self.output, "post actions have failed");
            return Ok(report);
        }
        self.output.line(format!(
            "all cluster resources for {:?} have been created",
            validated.name()
        ));

        if !deferred_addons.is_empty() {
            report.enter(Stage::RunDeferredAddOns);
            self.output.line(deferred_addons.describe());
            let failures = deferred_addons.execute().await;
            if !failures.is_empty() {
                report.fail(Stage::RunDeferredAddOns, failures);
                report.render_failures(&self.output, "addons could not be created");
                return Ok(report);
            }
        }

        if let Some(flux) = spec.gitops.as_ref().and_then(|gitops| gitops.flux.as_ref()) {
            report.enter(Stage::GitOpsBootstrap);
            self.output
                .line("gitops configuration detected, installing Flux v2");
            if let Err(e) = self.provider.gitops.install_flux(validated.name(), flux).await {
                report.fail(Stage::GitOpsBootstrap, vec![e]);
                report.render_failures(&self.output, "GitOps bootstrap has failed");
                return Ok(report);
            }

            if !self.params.continue_after_gitops {
                if spec.private_cluster.enabled {
                    tracing::warn!(
                        cluster = %validated.name(),
                        "GitOps bootstrap ends the run; public endpoint access stays enabled"
                    );
                    self.output.line(
                        "public endpoint access was left enabled; re-run with --continue-after-gitops to lock it down",
                    );
                }
                self.finish(&mut report, &spec);
                return Ok(report);
            }
        }

        if spec.private_cluster.enabled {
            report.enter(Stage::PrivateLockdown);
            if let Err(e) = self.lock_down(&spec).await {
                report.fail(Stage::PrivateLockdown, vec![e]);
                report.render_failures(
                    &self.output,
                    "public endpoint access could not be disabled",
                );
                return Ok(report);
            }
            self.output.line(format!(
                "fully private cluster {:?} has been created; subsequent operations must run from within the cluster's network",
                validated.name()
            ));
        }

        self.finish(&mut report, &spec);
        Ok(report)
    }

    fn build_plan(&self, validated: &ValidatedSpec, network: &ResolvedNetwork) -> Result<ClusterPlan> {
        let features = PlanFeatures::new(&self.params, &self.provider);
        let plan = build_cluster_plan(validated, network, features, &self.provider)?;

        self.output
            .line(format!("creating {}", validated.spec().log_string()));
        self.output.line(plan.describe());
        self.output.line(format!(
            "if you encounter any issues, check the provider console or run 'kubeforge utils describe-stacks --region={} --cluster={}'",
            validated.region(),
            validated.name()
        ));
        Ok(plan)
    }

    /// Print the normalised specification with the zones that would be used
    fn print_dry_run(&self, validated: &ValidatedSpec, zones: Vec<String>) -> Result<()> {
        let mut spec = validated.spec().clone();
        spec.availability_zones = zones;
        let yaml = ClusterSpecLoader::to_yaml(&spec)?;
        self.output.always(yaml.trim_end());
        Ok(())
    }

    /// Write the kubeconfig. Failures are warnings only.
    async fn write_credentials(
        &self,
        validated: &ValidatedSpec,
        path: PathBuf,
    ) -> Option<PathBuf> {
        let kubeconfig = &self.params.kubeconfig;
        if !kubeconfig.write {
            return None;
        }

        let written = async {
            let cluster = self
                .provider
                .control_plane
                .describe_cluster(validated.name())
                .await?;
            let request = KubeconfigRequest {
                path: path.clone(),
                context_name: KubeconfigRequest::default_context_name(
                    validated.name(),
                    validated.region(),
                ),
                cluster,
                region: validated.region().to_string(),
                set_context: kubeconfig.set_context,
                authenticator_role_arn: kubeconfig.authenticator_role_arn.clone(),
            };
            self.provider.credentials.write_kubeconfig(&request)
        }
        .await;

        match written {
            Ok(path) => {
                self.output
                    .line(format!("saved kubeconfig as {:?}", path.display().to_string()));
                Some(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "unable to write kubeconfig");
                self.output.line(format!(
                    "unable to write kubeconfig {}, please retry with 'kubeforge utils write-kubeconfig --cluster={}': {e}",
                    path.display(),
                    validated.name()
                ));
                None
            }
        }
    }

    /// Authorise and wait for node groups; returns false when any failed
    async fn await_nodes(
        &self,
        spec: &ClusterSpec,
        only: Option<&[String]>,
        report: &mut ProvisionReport,
    ) -> bool {
        report.enter(Stage::AuthorizeAndAwaitNodes);
        let options = WaitOptions::new(self.params.wait_timeout, self.poll_interval);
        let readiness = build_readiness_plan(spec, only, &self.provider.kube, options);
        if readiness.tree.is_empty() {
            return true;
        }

        self.output.line(readiness.tree.describe());
        let node_groups = readiness.node_groups();
        let ReadinessOutcome { ready, failures } = readiness.execute().await;

        for name in &ready {
            self.output.line(format!("nodegroup {name:?} has all nodes ready"));
        }
        report.ready_node_groups.extend(ready);

        if failures.is_empty() {
            return true;
        }
        tracing::warn!(
            node_groups = ?node_groups,
            failed = failures.len(),
            "some nodegroups did not become ready"
        );
        report.fail(Stage::AuthorizeAndAwaitNodes, failures);
        false
    }

    async fn lock_down(&self, spec: &ClusterSpec) -> Result<()> {
        self.output
            .line("disabling public endpoint access for the cluster");
        let endpoints = ClusterEndpoints {
            private_access: true,
            public_access: false,
        };
        self.provider
            .control_plane
            .update_endpoint_access(&spec.metadata.name, endpoints)
            .await
            .map_err(|e| {
                Error::provider(
                    "disable public endpoint access",
                    format!("error disabling public endpoint access for the cluster: {e}"),
                )
            })
    }

    fn finish(&self, report: &mut ProvisionReport, spec: &ClusterSpec) {
        report.enter(Stage::Done);
        self.output
            .line(format!("{} is ready", spec.metadata.log_string()));
    }
}
