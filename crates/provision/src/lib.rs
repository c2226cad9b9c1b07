//! Cluster provisioning for kubeforge
//!
//! - [`network`] decides where the cluster network comes from.
//! - [`plan`] turns a validated specification into a task tree.
//! - [`readiness`] builds the per-node-group authorise-and-wait plan.
//! - [`workflow`] sequences the stages and reports the outcome.

pub mod network;
pub mod plan;
pub mod readiness;
pub mod report;
pub mod tasks;
pub mod workflow;

pub use network::{resolve_network, select_mode, NetworkMode, NetworkResolution, ResolvedNetwork};
pub use plan::{build_cluster_plan, ClusterPlan, PlanFeatures, PlanOutline};
pub use readiness::{build_readiness_plan, ReadinessOutcome, ReadinessPlan};
pub use report::{ProvisionReport, Stage};
pub use workflow::ProvisionWorkflow;
