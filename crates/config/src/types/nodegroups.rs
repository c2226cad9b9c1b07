//! Node group configuration types

use kubeforge_core::DEFAULT_NODE_COUNT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Settings shared by unmanaged and managed node groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroupBase {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,
    /// Place nodes in private subnets only
    #[serde(default)]
    pub private_networking: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl NodeGroupBase {
    /// Number of nodes that must report ready before the group counts as up
    pub fn expected_ready_nodes(&self) -> u32 {
        self.min_size
            .or(self.desired_capacity)
            .unwrap_or(DEFAULT_NODE_COUNT)
    }
}

/// Node group created through a dedicated infrastructure stack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroup {
    #[serde(flatten)]
    pub base: NodeGroupBase,
    #[serde(default)]
    pub ami_family: AmiFamily,
}

/// Node group created through the provider's managed node group service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedNodeGroup {
    #[serde(flatten)]
    pub base: NodeGroupBase,
    #[serde(default)]
    pub ami_family: AmiFamily,
    #[serde(default)]
    pub spot: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmiFamily {
    #[default]
    AmazonLinux2,
    Bottlerocket,
    Ubuntu2004,
    WindowsServer2019FullContainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeGroupKind {
    Unmanaged,
    Managed,
}

impl fmt::Display for NodeGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeGroupKind::Unmanaged => write!(f, "nodegroup"),
            NodeGroupKind::Managed => write!(f, "managed nodegroup"),
        }
    }
}

/// Borrowed view over either node group flavour
#[derive(Debug, Clone, Copy)]
pub struct NodePool<'a> {
    pub kind: NodeGroupKind,
    pub base: &'a NodeGroupBase,
}

impl<'a> NodePool<'a> {
    /// Name borrowed from the underlying group, not from this view
    pub fn name(&self) -> &'a str {
        &self.base.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FargateProfile {
    pub name: String,
    #[serde(default)]
    pub selectors: Vec<FargateSelector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FargateSelector {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}
