//! Add-on configuration types

use serde::{Deserialize, Serialize};

/// Add-ons that must be running before nodes try to join the cluster.
///
/// Installing a pod networking add-on after nodes attempt to join leaves
/// them stuck in `NotReady`.
const PRE_NODE_GROUP_ADDONS: &[&str] = &["vpc-cni"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_role_arn: Option<String>,
    /// Overrides the built-in decision of whether this add-on must precede node groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_node_groups: Option<bool>,
}

impl Addon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether this add-on is installed ahead of node group creation
    pub fn installs_before_node_groups(&self) -> bool {
        self.before_node_groups
            .unwrap_or_else(|| PRE_NODE_GROUP_ADDONS.contains(&self.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn networking_addon_precedes_node_groups() {
        assert!(Addon::new("vpc-cni").installs_before_node_groups());
        assert!(!Addon::new("coredns").installs_before_node_groups());
    }

    #[test]
    fn explicit_override_wins() {
        let addon = Addon {
            before_node_groups: Some(true),
            ..Addon::new("aws-ebs-csi-driver")
        };
        assert!(addon.installs_before_node_groups());
    }
}
