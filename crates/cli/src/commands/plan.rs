//! `kubeforge plan`: build the creation plan without touching a provider
//!
//! Uses the offline provider, so the network must be resolvable from the
//! spec and flags alone (explicit zones, or a dry run with explicit zones).

use kubeforge_config::{validate, ClusterSpecLoader, CreateParams};
use kubeforge_core::{Error, OutputSink, Result};
use kubeforge_provider::ClusterProvider;
use kubeforge_provision::{
    build_cluster_plan, resolve_network, NetworkResolution, PlanFeatures, ProvisionWorkflow,
};
use std::path::Path;

pub async fn execute(config_file: &Path, params: CreateParams, output: &OutputSink) -> Result<()> {
    let spec = ClusterSpecLoader::from_path(config_file)?;
    let provider = ClusterProvider::offline();

    if params.dry_run {
        let workflow = ProvisionWorkflow::new(provider, params, output.clone());
        return workflow.run(spec).await?.into_result().map(|_| ());
    }

    let validated = validate(spec)?;
    let network = match resolve_network(validated.spec(), &params, provider.network.as_ref()).await? {
        NetworkResolution::Resolved(network) => network,
        NetworkResolution::DryRun { mode, .. } => {
            return Err(Error::configuration(format!(
                "network resolution ({mode}) stopped before producing a network"
            )))
        }
    };
    tracing::debug!(mode = %network.mode, zones = ?network.availability_zones, "network resolved");

    let features = PlanFeatures::new(&params, &provider);
    let plan = build_cluster_plan(&validated, &network, features, &provider)?;

    output.line(format!("availability zones: {}", network.availability_zones.join(", ")));
    output.line(plan.describe());
    if !plan.deferred_addons.is_empty() {
        output.line(format!(
            "after nodes are ready: {}",
            plan.deferred_addons.describe()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SPEC: &str = "metadata:
  name: demo
  region: us-west-2
nodeGroups:
  - name: ng-1
managedNodeGroups:
  - name: mng-1
addons:
  - name: vpc-cni
  - name: coredns
";

    fn spec_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SPEC.as_bytes()).unwrap();
        file
    }

    fn zones() -> Vec<String> {
        vec!["us-west-2a".to_string(), "us-west-2b".to_string()]
    }

    #[tokio::test]
    async fn describes_plan_with_explicit_zones() {
        let file = spec_file();
        let (output, captured) = OutputSink::buffer();
        let params = CreateParams {
            zones: zones(),
            ..Default::default()
        };

        execute(file.path(), params, &output).await.unwrap();

        let text = captured.contents();
        assert!(text.contains("availability zones: us-west-2a, us-west-2b"));
        assert!(text.contains("create cluster control plane \"demo\""));
        assert!(text.contains("create managed nodegroup \"mng-1\""));
        assert!(text.contains("after nodes are ready: create addons"));
    }

    #[tokio::test]
    async fn dry_run_prints_the_effective_spec() {
        let file = spec_file();
        let (output, captured) = OutputSink::buffer();
        let params = CreateParams {
            zones: zones(),
            dry_run: true,
            ..Default::default()
        };

        execute(file.path(), params, &output).await.unwrap();

        let text = captured.contents();
        assert!(text.contains("availabilityZones:"));
        assert!(!text.contains("create cluster control plane"));
    }

    #[tokio::test]
    async fn zones_are_required_without_a_provider() {
        let file = spec_file();

        let err = execute(file.path(), CreateParams::default(), &OutputSink::discard())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider { .. }));
    }
}
