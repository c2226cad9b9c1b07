//! Provider boundary for kubeforge
//!
//! Every external system the provisioning workflow touches is reached
//! through one of the traits in this crate. Implementations wrap real API
//! clients and own their retry behaviour; the workflow only sees success or
//! a [`kubeforge_core::Error`].
//!
//! With the `mock` feature enabled each trait also gets a `mockall` mock
//! (`MockNetworkApi`, `MockStackManager`, ...) for downstream tests.

mod offline;
mod types;

pub use offline::OfflineProvider;
pub use types::{ClusterDescription, KubeconfigRequest, NetworkLayout, Subnet};

use async_trait::async_trait;
use kubeforge_config::{
    Addon, ClusterEndpoints, ClusterSpec, FargateProfile, FluxSpec, ManagedNodeGroup, NodeGroup,
};
use kubeforge_core::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(any(test, feature = "mock"))]
use mockall::automock;

/// Read-only access to the provider's network resources
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Zones usable in `region`, in the provider's order
    async fn available_zones(&self, region: &str) -> Result<Vec<String>>;

    /// Resolve subnet IDs to their attributes.
    ///
    /// Fails if any ID does not exist.
    async fn describe_subnets(&self, ids: &[String]) -> Result<Vec<Subnet>>;

    /// Read the network used by another cluster so it can be shared
    async fn import_cluster_network(&self, source_cluster: &str) -> Result<NetworkLayout>;
}

/// Infrastructure stacks backing the control plane and node groups
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait StackManager: Send + Sync {
    /// Whether unmanaged node groups can be created inside the cluster stack
    fn supports_combined_stack(&self) -> bool;

    async fn stack_exists(&self, stack_name: &str) -> Result<bool>;

    /// Create the control plane stack, embedding `node_groups` when the
    /// stack mechanism supports it. Blocks until the stack is complete.
    async fn create_cluster_stack(&self, spec: &ClusterSpec, node_groups: &[NodeGroup])
        -> Result<()>;

    async fn create_node_group_stack(&self, spec: &ClusterSpec, node_group: &NodeGroup)
        -> Result<()>;

    async fn create_managed_node_group(
        &self,
        spec: &ClusterSpec,
        node_group: &ManagedNodeGroup,
    ) -> Result<()>;
}

/// Control plane configuration calls
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ControlPlaneApi: Send + Sync {
    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterDescription>;

    async fn update_endpoint_access(&self, cluster: &str, endpoints: ClusterEndpoints)
        -> Result<()>;

    async fn associate_oidc_provider(&self, cluster: &str) -> Result<()>;

    async fn create_fargate_profile(&self, cluster: &str, profile: &FargateProfile) -> Result<()>;
}

/// Managed add-on installation
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait AddonApi: Send + Sync {
    /// Install `addon` and wait up to `timeout` for it to become active
    async fn create_addon(&self, cluster: &str, addon: &Addon, timeout: Duration) -> Result<()>;
}

/// Calls made against the new cluster's Kubernetes API
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait KubeClient: Send + Sync {
    /// Allow the node group's instance role to join the cluster
    async fn authorize_node_group(&self, cluster: &str, node_group: &NodeGroup) -> Result<()>;

    /// Number of nodes in `node_group` currently reporting ready
    async fn ready_node_count(&self, cluster: &str, node_group: &str) -> Result<u32>;
}

/// Writes cluster credentials for local tooling
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait CredentialWriter: Send + Sync {
    /// Write the kubeconfig entry and return the path actually written
    fn write_kubeconfig(&self, request: &KubeconfigRequest) -> Result<PathBuf>;
}

/// Bootstraps a GitOps toolkit in the new cluster
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait GitOpsInstaller: Send + Sync {
    async fn install_flux(&self, cluster: &str, flux: &FluxSpec) -> Result<()>;
}

/// Bundle of every collaborator the provisioning workflow needs
#[derive(Clone)]
pub struct ClusterProvider {
    pub network: Arc<dyn NetworkApi>,
    pub stacks: Arc<dyn StackManager>,
    pub control_plane: Arc<dyn ControlPlaneApi>,
    pub addons: Arc<dyn AddonApi>,
    pub kube: Arc<dyn KubeClient>,
    pub credentials: Arc<dyn CredentialWriter>,
    pub gitops: Arc<dyn GitOpsInstaller>,
}

impl ClusterProvider {
    /// Provider whose every call fails; suitable for planning only
    pub fn offline() -> Self {
        let offline = Arc::new(OfflineProvider);
        Self {
            network: offline.clone(),
            stacks: offline.clone(),
            control_plane: offline.clone(),
            addons: offline.clone(),
            kube: offline.clone(),
            credentials: offline.clone(),
            gitops: offline,
        }
    }
}

impl std::fmt::Debug for ClusterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterProvider").finish_non_exhaustive()
    }
}

/// Name of the stack holding the control plane
pub fn cluster_stack_name(cluster: &str) -> String {
    format!("kubeforge-{cluster}-cluster")
}

/// Name of the stack holding one unmanaged node group
pub fn node_group_stack_name(cluster: &str, node_group: &str) -> String {
    format!("kubeforge-{cluster}-nodegroup-{node_group}")
}
