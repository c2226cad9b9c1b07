//! Top-level cluster specification

use super::{
    Addon, FargateProfile, GitOpsSpec, ManagedNodeGroup, NodeGroup, NodeGroupKind, NodePool,
    VpcSpec,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired state of a managed Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    pub metadata: ClusterMeta,
    /// Zones the cluster must span; auto-selected when empty and the network is derived
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub vpc: VpcSpec,
    #[serde(default)]
    pub iam: IamSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_groups: Vec<NodeGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_node_groups: Vec<ManagedNodeGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fargate_profiles: Vec<FargateProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<Addon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitops: Option<GitOpsSpec>,
    #[serde(default)]
    pub private_cluster: PrivateClusterSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMeta {
    pub name: String,
    pub region: String,
    /// Release tag, `auto`, `latest`, or unset for the default release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ClusterMeta {
    /// `"cluster" "name" in "region" region`, used in log lines
    pub fn log_string(&self) -> String {
        format!("cluster {:?} in {:?} region", self.name, self.region)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IamSpec {
    /// Associate an IAM OIDC identity provider with the cluster
    #[serde(default, rename = "withOIDC")]
    pub with_oidc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateClusterSpec {
    #[serde(default)]
    pub enabled: bool,
}

impl ClusterSpec {
    /// All node groups, unmanaged first, in declaration order
    pub fn node_pools(&self) -> Vec<NodePool<'_>> {
        self.node_groups
            .iter()
            .map(|ng| NodePool {
                kind: NodeGroupKind::Unmanaged,
                base: &ng.base,
            })
            .chain(self.managed_node_groups.iter().map(|ng| NodePool {
                kind: NodeGroupKind::Managed,
                base: &ng.base,
            }))
            .collect()
    }

    /// Whether any subnet was given, either by ID or by CIDR
    pub fn has_any_subnets(&self) -> bool {
        !self.vpc.subnets.private.is_empty() || !self.vpc.subnets.public.is_empty()
    }

    /// Whether any node group asks for private-only networking
    pub fn has_private_node_groups(&self) -> bool {
        self.node_pools().iter().any(|pool| pool.base.private_networking)
    }

    /// Whether any node group needs public subnets
    pub fn has_public_node_groups(&self) -> bool {
        self.node_pools()
            .iter()
            .any(|pool| !pool.base.private_networking)
    }

    pub fn has_gitops_flux_configured(&self) -> bool {
        self.gitops
            .as_ref()
            .is_some_and(|gitops| gitops.flux.is_some())
    }

    /// Short description used when announcing what will be created
    pub fn log_string(&self) -> String {
        let mut parts = vec![self.metadata.log_string()];
        if !self.node_groups.is_empty() {
            parts.push(format!("{} nodegroup(s)", self.node_groups.len()));
        }
        if !self.managed_node_groups.is_empty() {
            parts.push(format!(
                "{} managed nodegroup(s)",
                self.managed_node_groups.len()
            ));
        }
        parts.join(" with ")
    }
}
