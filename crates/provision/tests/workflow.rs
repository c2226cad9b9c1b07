//! End-to-end workflow scenarios against a recording fake provider

use async_trait::async_trait;
use kubeforge_config::{
    Addon, ClusterEndpoints, ClusterMeta, ClusterSpec, CreateParams, FargateProfile, FluxSpec,
    GitOpsSpec, ManagedNodeGroup, NodeGroup, NodeGroupBase, PrivateClusterSpec,
};
use kubeforge_core::{Error, OutputSink, Result};
use kubeforge_provider::{
    AddonApi, ClusterDescription, ClusterProvider, ControlPlaneApi, CredentialWriter,
    GitOpsInstaller, KubeClient, KubeconfigRequest, NetworkApi, NetworkLayout, StackManager,
    Subnet,
};
use kubeforge_provision::{NetworkMode, ProvisionWorkflow, Stage};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Records every call and fails the operations it is told to fail
#[derive(Default)]
struct FakeCloud {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl FakeCloud {
    fn failing(operations: &[&str]) -> Self {
        Self {
            failing: operations.iter().map(|op| op.to_string()).collect(),
            ..Default::default()
        }
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().push(call.clone());
        if self.failing.contains(&call) {
            Err(Error::provider(call, "injected failure"))
        } else {
            Ok(())
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn position(&self, call: &str) -> usize {
        self.calls()
            .iter()
            .position(|recorded| recorded == call)
            .unwrap_or_else(|| panic!("{call} was never called"))
    }
}

#[async_trait]
impl NetworkApi for FakeCloud {
    async fn available_zones(&self, region: &str) -> Result<Vec<String>> {
        self.record(format!("available_zones {region}"))?;
        Ok(["a", "b", "c", "d"]
            .iter()
            .map(|zone| format!("{region}{zone}"))
            .collect())
    }

    async fn describe_subnets(&self, ids: &[String]) -> Result<Vec<Subnet>> {
        self.record(format!("describe_subnets {}", ids.join(",")))?;
        Ok(Vec::new())
    }

    async fn import_cluster_network(&self, source_cluster: &str) -> Result<NetworkLayout> {
        self.record(format!("import_cluster_network {source_cluster}"))?;
        Ok(NetworkLayout::default())
    }
}

#[async_trait]
impl StackManager for FakeCloud {
    fn supports_combined_stack(&self) -> bool {
        false
    }

    async fn stack_exists(&self, _stack_name: &str) -> Result<bool> {
        Ok(false)
    }

    async fn create_cluster_stack(&self, spec: &ClusterSpec, _node_groups: &[NodeGroup]) -> Result<()> {
        self.record(format!("create_cluster_stack {}", spec.metadata.name))
    }

    async fn create_node_group_stack(&self, _spec: &ClusterSpec, node_group: &NodeGroup) -> Result<()> {
        self.record(format!("create_node_group_stack {}", node_group.base.name))
    }

    async fn create_managed_node_group(
        &self,
        _spec: &ClusterSpec,
        node_group: &ManagedNodeGroup,
    ) -> Result<()> {
        self.record(format!("create_managed_node_group {}", node_group.base.name))
    }
}

#[async_trait]
impl ControlPlaneApi for FakeCloud {
    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterDescription> {
        self.record(format!("describe_cluster {cluster}"))?;
        Ok(ClusterDescription {
            name: cluster.to_string(),
            endpoint: "https://example.invalid".to_string(),
            certificate_authority_data: "Y2E=".to_string(),
            version: "1.21".to_string(),
        })
    }

    async fn update_endpoint_access(&self, cluster: &str, endpoints: ClusterEndpoints) -> Result<()> {
        self.record(format!(
            "update_endpoint_access {cluster} public={}",
            endpoints.public_access
        ))
    }

    async fn associate_oidc_provider(&self, cluster: &str) -> Result<()> {
        self.record(format!("associate_oidc_provider {cluster}"))
    }

    async fn create_fargate_profile(&self, _cluster: &str, profile: &FargateProfile) -> Result<()> {
        self.record(format!("create_fargate_profile {}", profile.name))
    }
}

#[async_trait]
impl AddonApi for FakeCloud {
    async fn create_addon(&self, _cluster: &str, addon: &Addon, _timeout: Duration) -> Result<()> {
        self.record(format!("create_addon {}", addon.name))
    }
}

#[async_trait]
impl KubeClient for FakeCloud {
    async fn authorize_node_group(&self, _cluster: &str, node_group: &NodeGroup) -> Result<()> {
        self.record(format!("authorize_node_group {}", node_group.base.name))
    }

    async fn ready_node_count(&self, _cluster: &str, node_group: &str) -> Result<u32> {
        self.record(format!("ready_node_count {node_group}"))?;
        Ok(10)
    }
}

impl CredentialWriter for FakeCloud {
    fn write_kubeconfig(&self, request: &KubeconfigRequest) -> Result<PathBuf> {
        self.record(format!("write_kubeconfig {}", request.context_name))?;
        Ok(request.path.clone())
    }
}

#[async_trait]
impl GitOpsInstaller for FakeCloud {
    async fn install_flux(&self, cluster: &str, _flux: &FluxSpec) -> Result<()> {
        self.record(format!("install_flux {cluster}"))
    }
}

fn provider(cloud: &Arc<FakeCloud>) -> ClusterProvider {
    ClusterProvider {
        network: cloud.clone(),
        stacks: cloud.clone(),
        control_plane: cloud.clone(),
        addons: cloud.clone(),
        kube: cloud.clone(),
        credentials: cloud.clone(),
        gitops: cloud.clone(),
    }
}

fn node_group_base(name: &str) -> NodeGroupBase {
    NodeGroupBase {
        name: name.to_string(),
        desired_capacity: Some(2),
        ..Default::default()
    }
}

/// One unmanaged and one managed node group, no add-ons, derived network
fn two_node_group_spec() -> ClusterSpec {
    ClusterSpec {
        metadata: ClusterMeta {
            name: "demo".to_string(),
            region: "us-west-2".to_string(),
            version: Some("1.21".to_string()),
            ..Default::default()
        },
        node_groups: vec![NodeGroup {
            base: node_group_base("ng-1"),
            ..Default::default()
        }],
        managed_node_groups: vec![ManagedNodeGroup {
            base: node_group_base("mng-1"),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn workflow(cloud: &Arc<FakeCloud>, params: CreateParams) -> (ProvisionWorkflow, kubeforge_core::CapturedOutput) {
    let (output, captured) = OutputSink::buffer();
    let workflow = ProvisionWorkflow::new(provider(cloud), params, output)
        .with_poll_interval(Duration::from_millis(1));
    (workflow, captured)
}

#[tokio::test]
async fn two_node_groups_are_created_and_become_ready() {
    let cloud = Arc::new(FakeCloud::default());
    let (workflow, output) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(two_node_group_spec()).await.unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(
        report.stages,
        vec![
            Stage::Validate,
            Stage::ResolveNetwork,
            Stage::BuildPlan,
            Stage::Execute,
            Stage::WriteCredentials,
            Stage::AuthorizeAndAwaitNodes,
            Stage::Done,
        ]
    );
    assert_eq!(report.network_mode, Some(NetworkMode::Derive));

    let mut ready = report.ready_node_groups.clone();
    ready.sort();
    assert_eq!(ready, vec!["mng-1", "ng-1"]);

    let control_plane = cloud.position("create_cluster_stack demo");
    assert!(control_plane < cloud.position("create_node_group_stack ng-1"));
    assert!(control_plane < cloud.position("create_managed_node_group mng-1"));
    assert!(cloud.position("authorize_node_group ng-1") < cloud.position("ready_node_count ng-1"));
    assert!(!cloud.calls().iter().any(|call| call.starts_with("update_endpoint_access")));
    assert_eq!(report.kubeconfig_path, Some(PathBuf::from("~/.kube/config")));

    let text = output.contents();
    assert!(text.contains("create cluster control plane \"demo\""));
    assert!(text.contains("2 parallel sub-tasks"));
}

#[tokio::test]
async fn failed_managed_node_group_leaves_unmanaged_group_working() {
    let cloud = Arc::new(FakeCloud::failing(&["create_managed_node_group mng-1"]));
    let (workflow, output) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(two_node_group_spec()).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed_stage, Some(Stage::Execute));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].task_name(),
        Some("create managed nodegroup \"mng-1\"")
    );

    let calls = cloud.calls();
    assert!(calls.contains(&"create_node_group_stack ng-1".to_string()));
    assert!(calls.contains(&"authorize_node_group ng-1".to_string()));
    assert!(calls.contains(&"ready_node_count ng-1".to_string()));
    assert!(!calls.contains(&"ready_node_count mng-1".to_string()));
    assert!(!calls.iter().any(|call| call.starts_with("write_kubeconfig")));
    assert_eq!(report.ready_node_groups, vec!["ng-1"]);

    let text = output.contents();
    assert!(text.contains("1 error(s) occurred"));
    assert!(text.contains("kubeforge delete cluster --region=us-west-2 --name=demo"));
}

#[tokio::test]
async fn salvage_readiness_failures_are_reported_with_creation_failures() {
    let cloud = Arc::new(FakeCloud::failing(&[
        "create_managed_node_group mng-1",
        "authorize_node_group ng-1",
    ]));
    let (workflow, output) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(two_node_group_spec()).await.unwrap();

    assert_eq!(report.failed_stage, Some(Stage::Execute));
    assert_eq!(report.failures.len(), 2);
    assert!(report.ready_node_groups.is_empty());

    let text = output.contents();
    assert!(text.contains("2 error(s) occurred"));
    assert!(text.contains("task 'create managed nodegroup \"mng-1\"' failed"));
    assert!(text.contains("task 'authorize nodegroup \"ng-1\" to join' failed"));
}

#[tokio::test]
async fn conflicting_network_inputs_fail_before_any_call() {
    let cloud = Arc::new(FakeCloud::default());
    let params = CreateParams {
        source_cluster: Some("legacy".to_string()),
        vpc_cidr: Some("10.0.0.0/16".to_string()),
        ..Default::default()
    };
    let (workflow, _) = workflow(&cloud, params);

    let err = workflow.run(two_node_group_spec()).await.unwrap_err();

    assert!(matches!(err, Error::ConfigurationConflict { .. }));
    assert!(err.to_string().contains("--vpc-from-cluster"));
    assert!(err.to_string().contains("--vpc-cidr"));
    assert!(cloud.calls().is_empty());
}

#[tokio::test]
async fn too_old_version_blocks_planning() {
    let cloud = Arc::new(FakeCloud::default());
    let mut spec = two_node_group_spec();
    spec.metadata.version = Some("1.16".to_string());
    spec.addons = vec![Addon::new("coredns")];
    let (workflow, _) = workflow(&cloud, CreateParams::default());

    let err = workflow.run(spec).await.unwrap_err();

    assert!(matches!(err, Error::CapabilityUnsupported { .. }));
    assert!(!cloud.calls().iter().any(|call| call.starts_with("create_")));
}

#[tokio::test]
async fn dry_run_prints_config_and_mutes_progress() {
    let cloud = Arc::new(FakeCloud::default());
    let params = CreateParams {
        dry_run: true,
        ..Default::default()
    };
    let (workflow, output) = workflow(&cloud, params);

    let report = workflow.run(two_node_group_spec()).await.unwrap();

    assert_eq!(
        report.stages,
        vec![Stage::Validate, Stage::ResolveNetwork, Stage::Done]
    );
    assert_eq!(cloud.calls(), vec!["available_zones us-west-2"]);

    let text = output.contents();
    assert!(text.contains("availabilityZones:"));
    assert!(text.contains("us-west-2c"));
    assert!(!text.contains("us-west-2d"));
    assert!(!text.contains("using Kubernetes version"));
}

#[tokio::test]
async fn addons_are_installed_around_node_groups() {
    let cloud = Arc::new(FakeCloud::default());
    let mut spec = two_node_group_spec();
    spec.addons = vec![Addon::new("vpc-cni"), Addon::new("coredns")];
    let (workflow, _) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(spec).await.unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert!(report.stages.contains(&Stage::RunDeferredAddOns));
    assert!(cloud.position("create_addon vpc-cni") < cloud.position("create_node_group_stack ng-1"));
    assert!(cloud.position("ready_node_count mng-1") < cloud.position("create_addon coredns"));
}

fn private_gitops_spec() -> ClusterSpec {
    let mut spec = two_node_group_spec();
    spec.node_groups[0].base.private_networking = true;
    spec.managed_node_groups[0].base.private_networking = true;
    spec.private_cluster = PrivateClusterSpec { enabled: true };
    spec.vpc.cluster_endpoints = ClusterEndpoints {
        private_access: true,
        public_access: true,
    };
    spec.gitops = Some(GitOpsSpec {
        flux: Some(FluxSpec {
            git_provider: "github".to_string(),
            repository: "fleet".to_string(),
            owner: "platform".to_string(),
            ..Default::default()
        }),
    });
    spec
}

#[tokio::test]
async fn gitops_bootstrap_ends_the_run_by_default() {
    let cloud = Arc::new(FakeCloud::default());
    let (workflow, output) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(private_gitops_spec()).await.unwrap();

    assert!(report.is_success());
    assert!(report.stages.contains(&Stage::GitOpsBootstrap));
    assert!(!report.stages.contains(&Stage::PrivateLockdown));
    assert!(!cloud.calls().iter().any(|call| call.starts_with("update_endpoint_access")));
    assert!(output.contents().contains("--continue-after-gitops"));
}

#[tokio::test]
async fn private_lockdown_is_the_last_mutation() {
    let cloud = Arc::new(FakeCloud::default());
    let params = CreateParams {
        continue_after_gitops: true,
        ..Default::default()
    };
    let (workflow, _) = workflow(&cloud, params);

    let report = workflow.run(private_gitops_spec()).await.unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.stages.last(), Some(&Stage::Done));
    assert!(report.stages.contains(&Stage::PrivateLockdown));
    assert_eq!(
        cloud.calls().last().map(String::as_str),
        Some("update_endpoint_access demo public=false")
    );
    assert!(cloud.position("install_flux demo") < cloud.position("update_endpoint_access demo public=false"));
}

#[tokio::test]
async fn kubeconfig_write_failure_is_only_a_warning() {
    let cloud = Arc::new(FakeCloud::failing(&["write_kubeconfig demo.us-west-2"]));
    let (workflow, output) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(two_node_group_spec()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.kubeconfig_path, None);
    assert!(output.contents().contains("unable to write kubeconfig"));
}

#[tokio::test]
async fn readiness_failure_is_reported_after_creation() {
    let cloud = Arc::new(FakeCloud::failing(&["authorize_node_group ng-1"]));
    let (workflow, _) = workflow(&cloud, CreateParams::default());

    let report = workflow.run(two_node_group_spec()).await.unwrap();

    assert_eq!(report.failed_stage, Some(Stage::AuthorizeAndAwaitNodes));
    assert_eq!(report.ready_node_groups, vec!["mng-1"]);
    assert!(!cloud.calls().contains(&"ready_node_count ng-1".to_string()));
    assert!(!report.stages.contains(&Stage::Done));
}
