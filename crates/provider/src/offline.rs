//! Provider used when no cloud credentials are available

use crate::{
    AddonApi, ClusterDescription, ControlPlaneApi, CredentialWriter, GitOpsInstaller, KubeClient,
    KubeconfigRequest, NetworkApi, NetworkLayout, StackManager, Subnet,
};
use async_trait::async_trait;
use kubeforge_config::{
    Addon, ClusterEndpoints, ClusterSpec, FargateProfile, FluxSpec, ManagedNodeGroup, NodeGroup,
};
use kubeforge_core::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Rejects every call with a provider error naming the operation.
///
/// Lets the CLI describe plans without touching a cloud account.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

fn offline<T>(operation: &str) -> Result<T> {
    tracing::debug!(operation, "offline provider rejected call");
    Err(Error::provider(operation, "no cloud provider is configured"))
}

#[async_trait]
impl NetworkApi for OfflineProvider {
    async fn available_zones(&self, _region: &str) -> Result<Vec<String>> {
        offline("describe availability zones")
    }

    async fn describe_subnets(&self, _ids: &[String]) -> Result<Vec<Subnet>> {
        offline("describe subnets")
    }

    async fn import_cluster_network(&self, _source_cluster: &str) -> Result<NetworkLayout> {
        offline("import cluster network")
    }
}

#[async_trait]
impl StackManager for OfflineProvider {
    fn supports_combined_stack(&self) -> bool {
        false
    }

    async fn stack_exists(&self, _stack_name: &str) -> Result<bool> {
        offline("describe stack")
    }

    async fn create_cluster_stack(
        &self,
        _spec: &ClusterSpec,
        _node_groups: &[NodeGroup],
    ) -> Result<()> {
        offline("create cluster stack")
    }

    async fn create_node_group_stack(
        &self,
        _spec: &ClusterSpec,
        _node_group: &NodeGroup,
    ) -> Result<()> {
        offline("create nodegroup stack")
    }

    async fn create_managed_node_group(
        &self,
        _spec: &ClusterSpec,
        _node_group: &ManagedNodeGroup,
    ) -> Result<()> {
        offline("create managed nodegroup")
    }
}

#[async_trait]
impl ControlPlaneApi for OfflineProvider {
    async fn describe_cluster(&self, _cluster: &str) -> Result<ClusterDescription> {
        offline("describe cluster")
    }

    async fn update_endpoint_access(
        &self,
        _cluster: &str,
        _endpoints: ClusterEndpoints,
    ) -> Result<()> {
        offline("update cluster endpoints")
    }

    async fn associate_oidc_provider(&self, _cluster: &str) -> Result<()> {
        offline("associate IAM OIDC provider")
    }

    async fn create_fargate_profile(&self, _cluster: &str, _profile: &FargateProfile) -> Result<()> {
        offline("create Fargate profile")
    }
}

#[async_trait]
impl AddonApi for OfflineProvider {
    async fn create_addon(&self, _cluster: &str, _addon: &Addon, _timeout: Duration) -> Result<()> {
        offline("create addon")
    }
}

#[async_trait]
impl KubeClient for OfflineProvider {
    async fn authorize_node_group(&self, _cluster: &str, _node_group: &NodeGroup) -> Result<()> {
        offline("authorize nodegroup")
    }

    async fn ready_node_count(&self, _cluster: &str, _node_group: &str) -> Result<u32> {
        offline("list nodes")
    }
}

impl CredentialWriter for OfflineProvider {
    fn write_kubeconfig(&self, _request: &KubeconfigRequest) -> Result<PathBuf> {
        offline("write kubeconfig")
    }
}

#[async_trait]
impl GitOpsInstaller for OfflineProvider {
    async fn install_flux(&self, _cluster: &str, _flux: &FluxSpec) -> Result<()> {
        offline("install Flux")
    }
}
