//! Inputs that come from command-line flags rather than the spec file

use crate::SubnetTopology;
use kubeforge_core::{Error, Result, AUTO_KUBECONFIG_DIR, DEFAULT_KUBECONFIG_PATH, DEFAULT_WAIT_TIMEOUT};
use std::path::PathBuf;
use std::time::Duration;

/// Parameters of a single `create cluster` run
#[derive(Debug, Clone)]
pub struct CreateParams {
    /// Stop after network resolution and print the effective configuration
    pub dry_run: bool,
    /// Explicit availability zones (`--zones`)
    pub zones: Vec<String>,
    /// Existing private subnet IDs (`--vpc-private-subnets`)
    pub private_subnet_ids: Vec<String>,
    /// Existing public subnet IDs (`--vpc-public-subnets`)
    pub public_subnet_ids: Vec<String>,
    /// Cluster whose network is reused (`--vpc-from-cluster`)
    pub source_cluster: Option<String>,
    /// Set when `--vpc-cidr` was given explicitly
    pub vpc_cidr: Option<String>,
    /// Add a default Fargate profile for `default` and `kube-system`
    pub fargate: bool,
    /// Upper bound for each readiness wait
    pub wait_timeout: Duration,
    pub kubeconfig: KubeconfigParams,
    /// Keep going with the remaining stages after a GitOps bootstrap
    pub continue_after_gitops: bool,
}

impl Default for CreateParams {
    fn default() -> Self {
        Self {
            dry_run: false,
            zones: Vec::new(),
            private_subnet_ids: Vec::new(),
            public_subnet_ids: Vec::new(),
            source_cluster: None,
            vpc_cidr: None,
            fargate: false,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            kubeconfig: KubeconfigParams::default(),
            continue_after_gitops: false,
        }
    }
}

impl CreateParams {
    pub fn subnet_ids(&self, topology: SubnetTopology) -> &[String] {
        match topology {
            SubnetTopology::Private => &self.private_subnet_ids,
            SubnetTopology::Public => &self.public_subnet_ids,
        }
    }

    pub fn subnets_given_as_flags(&self) -> bool {
        !self.private_subnet_ids.is_empty() || !self.public_subnet_ids.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct KubeconfigParams {
    pub path: Option<PathBuf>,
    /// Derive the path from the cluster name (`--auto-kubeconfig`)
    pub auto_path: bool,
    pub set_context: bool,
    pub write: bool,
    pub authenticator_role_arn: Option<String>,
}

impl Default for KubeconfigParams {
    fn default() -> Self {
        Self {
            path: None,
            auto_path: false,
            set_context: true,
            write: true,
            authenticator_role_arn: None,
        }
    }
}

impl KubeconfigParams {
    /// Where credentials for `cluster_name` should be written
    pub fn resolve_path(&self, cluster_name: &str) -> Result<PathBuf> {
        match (&self.path, self.auto_path) {
            (Some(_), true) => Err(Error::conflict("--kubeconfig", "--auto-kubeconfig")),
            (_, true) => Ok(PathBuf::from(AUTO_KUBECONFIG_DIR).join(cluster_name)),
            (Some(path), false) => Ok(path.clone()),
            (None, false) => Ok(PathBuf::from(DEFAULT_KUBECONFIG_PATH)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_path_conflicts_with_explicit_path() {
        let params = KubeconfigParams {
            path: Some(PathBuf::from("/tmp/config")),
            auto_path: true,
            ..Default::default()
        };
        let err = params.resolve_path("demo").unwrap_err();
        assert!(matches!(
            err,
            Error::ConfigurationConflict { ref first, ref second }
                if first == "--kubeconfig" && second == "--auto-kubeconfig"
        ));
    }

    #[test]
    fn auto_path_uses_cluster_name() {
        let params = KubeconfigParams {
            auto_path: true,
            ..Default::default()
        };
        assert!(params.resolve_path("demo").unwrap().ends_with("clusters/demo"));
        assert_eq!(
            KubeconfigParams::default().resolve_path("demo").unwrap(),
            PathBuf::from(DEFAULT_KUBECONFIG_PATH)
        );
    }
}
