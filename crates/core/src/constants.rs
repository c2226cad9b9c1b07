/// Constants used throughout the kubeforge codebase
use std::time::Duration;

// Waiting
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(25 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

// Network defaults
pub const DEFAULT_VPC_CIDR: &str = "192.168.0.0/16";
pub const DEFAULT_ZONE_COUNT: usize = 3;
pub const MIN_REQUIRED_ZONES: usize = 2;
/// Number of equal blocks a VPC CIDR is split into when subnets are derived
pub const SUBNET_BLOCKS: usize = 8;

// Node groups
pub const DEFAULT_NODE_COUNT: u32 = 2;
pub const DEFAULT_FARGATE_PROFILE: &str = "fp-default";
pub const DEFAULT_FARGATE_NAMESPACES: &[&str] = &["default", "kube-system"];

// Credentials
pub const DEFAULT_KUBECONFIG_PATH: &str = "~/.kube/config";
pub const AUTO_KUBECONFIG_DIR: &str = "~/.kube/kubeforge/clusters";
