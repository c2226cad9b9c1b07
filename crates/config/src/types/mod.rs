//! Specification types

mod addons;
mod cluster;
mod gitops;
mod network;
mod nodegroups;

pub use addons::Addon;
pub use cluster::{ClusterMeta, ClusterSpec, IamSpec, PrivateClusterSpec};
pub use gitops::{FluxSpec, GitOpsSpec};
pub use network::{ClusterEndpoints, NatMode, SubnetSpec, SubnetTopology, SubnetsSpec, VpcSpec};
pub use nodegroups::{
    AmiFamily, FargateProfile, FargateSelector, ManagedNodeGroup, NodeGroup, NodeGroupBase,
    NodeGroupKind, NodePool,
};
