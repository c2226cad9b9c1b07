//! Network configuration types

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcSpec {
    /// Existing VPC to place the cluster in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Global CIDR of a VPC that will be created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default)]
    pub subnets: SubnetsSpec,
    #[serde(default)]
    pub nat: NatMode,
    #[serde(default)]
    pub cluster_endpoints: ClusterEndpoints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetsSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private: Vec<SubnetSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public: Vec<SubnetSpec>,
}

impl SubnetsSpec {
    pub fn of(&self, topology: SubnetTopology) -> &[SubnetSpec] {
        match topology {
            SubnetTopology::Private => &self.private,
            SubnetTopology::Public => &self.public,
        }
    }

    pub fn of_mut(&mut self, topology: SubnetTopology) -> &mut Vec<SubnetSpec> {
        match topology {
            SubnetTopology::Private => &mut self.private,
            SubnetTopology::Public => &mut self.public,
        }
    }

    /// IDs of every subnet that was given by ID
    pub fn ids(&self, topology: SubnetTopology) -> Vec<String> {
        self.of(topology)
            .iter()
            .filter_map(|subnet| subnet.id.clone())
            .collect()
    }
}

/// A subnet, either requested (ID only) or fully resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

impl SubnetSpec {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubnetTopology {
    Private,
    Public,
}

impl SubnetTopology {
    pub const ALL: [SubnetTopology; 2] = [SubnetTopology::Private, SubnetTopology::Public];

    /// Flag that supplies subnet IDs of this topology
    pub fn flag(self) -> &'static str {
        match self {
            SubnetTopology::Private => "--vpc-private-subnets",
            SubnetTopology::Public => "--vpc-public-subnets",
        }
    }
}

impl fmt::Display for SubnetTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetTopology::Private => write!(f, "private"),
            SubnetTopology::Public => write!(f, "public"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NatMode {
    HighlyAvailable,
    #[default]
    Single,
    Disable,
}

/// Control-plane endpoint access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEndpoints {
    #[serde(default)]
    pub private_access: bool,
    #[serde(default = "default_public_access")]
    pub public_access: bool,
}

fn default_public_access() -> bool {
    true
}

impl Default for ClusterEndpoints {
    fn default() -> Self {
        Self {
            private_access: false,
            public_access: true,
        }
    }
}

impl ClusterEndpoints {
    pub fn private_only(&self) -> bool {
        self.private_access && !self.public_access
    }
}
