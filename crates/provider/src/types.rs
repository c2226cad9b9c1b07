//! Data returned by provider calls

use kubeforge_config::{SubnetsSpec, SubnetTopology};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Attributes of an existing subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub vpc_id: String,
    pub cidr: String,
    pub availability_zone: String,
}

/// Network layout read from another, already running cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLayout {
    pub vpc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    pub subnets: SubnetsSpec,
}

impl NetworkLayout {
    /// Distinct zones covered by subnets of any topology, sorted
    pub fn availability_zones(&self) -> Vec<String> {
        SubnetTopology::ALL
            .iter()
            .flat_map(|topology| self.subnets.of(*topology))
            .filter_map(|subnet| subnet.availability_zone.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Connection details of a created control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescription {
    pub name: String,
    pub endpoint: String,
    pub certificate_authority_data: String,
    pub version: String,
}

/// Everything a credential writer needs to produce a kubeconfig entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeconfigRequest {
    pub path: PathBuf,
    pub cluster: ClusterDescription,
    pub region: String,
    pub context_name: String,
    pub set_context: bool,
    pub authenticator_role_arn: Option<String>,
}

impl KubeconfigRequest {
    /// Context name in the `<cluster>.<region>` form
    pub fn default_context_name(cluster: &str, region: &str) -> String {
        format!("{cluster}.{region}")
    }
}
