//! Control plane and node group creation

use async_trait::async_trait;
use kubeforge_config::{ClusterSpec, ManagedNodeGroup, NodeGroup};
use kubeforge_core::Result;
use kubeforge_provider::{cluster_stack_name, node_group_stack_name, StackManager};
use kubeforge_task::Task;
use std::sync::Arc;

/// Create the control plane stack, optionally with embedded node groups
pub struct CreateClusterStackTask {
    spec: Arc<ClusterSpec>,
    node_groups: Vec<NodeGroup>,
    stacks: Arc<dyn StackManager>,
}

impl CreateClusterStackTask {
    pub fn new(spec: Arc<ClusterSpec>, node_groups: Vec<NodeGroup>, stacks: Arc<dyn StackManager>) -> Self {
        Self {
            spec,
            node_groups,
            stacks,
        }
    }
}

#[async_trait]
impl Task for CreateClusterStackTask {
    fn describe(&self) -> String {
        let name = &self.spec.metadata.name;
        if self.node_groups.is_empty() {
            format!("create cluster control plane {name:?}")
        } else {
            format!(
                "create cluster control plane {name:?} with {} nodegroup(s)",
                self.node_groups.len()
            )
        }
    }

    async fn run(&self) -> Result<()> {
        let stack = cluster_stack_name(&self.spec.metadata.name);
        if self.stacks.stack_exists(&stack).await? {
            tracing::info!(stack = %stack, "cluster stack already exists, skipping creation");
            return Ok(());
        }
        tracing::info!(stack = %stack, "creating cluster stack");
        self.stacks
            .create_cluster_stack(&self.spec, &self.node_groups)
            .await
    }
}

/// Create one unmanaged node group in its own stack
pub struct CreateNodeGroupStackTask {
    spec: Arc<ClusterSpec>,
    node_group: NodeGroup,
    stacks: Arc<dyn StackManager>,
}

impl CreateNodeGroupStackTask {
    pub fn new(spec: Arc<ClusterSpec>, node_group: NodeGroup, stacks: Arc<dyn StackManager>) -> Self {
        Self {
            spec,
            node_group,
            stacks,
        }
    }
}

#[async_trait]
impl Task for CreateNodeGroupStackTask {
    fn describe(&self) -> String {
        format!("create nodegroup {:?}", self.node_group.base.name)
    }

    async fn run(&self) -> Result<()> {
        let stack = node_group_stack_name(&self.spec.metadata.name, &self.node_group.base.name);
        if self.stacks.stack_exists(&stack).await? {
            tracing::info!(stack = %stack, "nodegroup stack already exists, skipping creation");
            return Ok(());
        }
        self.stacks
            .create_node_group_stack(&self.spec, &self.node_group)
            .await
    }
}

/// Create one managed node group through the managed service
pub struct CreateManagedNodeGroupTask {
    spec: Arc<ClusterSpec>,
    node_group: ManagedNodeGroup,
    stacks: Arc<dyn StackManager>,
}

impl CreateManagedNodeGroupTask {
    pub fn new(
        spec: Arc<ClusterSpec>,
        node_group: ManagedNodeGroup,
        stacks: Arc<dyn StackManager>,
    ) -> Self {
        Self {
            spec,
            node_group,
            stacks,
        }
    }
}

#[async_trait]
impl Task for CreateManagedNodeGroupTask {
    fn describe(&self) -> String {
        format!("create managed nodegroup {:?}", self.node_group.base.name)
    }

    async fn run(&self) -> Result<()> {
        let stack = node_group_stack_name(&self.spec.metadata.name, &self.node_group.base.name);
        if self.stacks.stack_exists(&stack).await? {
            tracing::info!(stack = %stack, "managed nodegroup stack already exists, skipping creation");
            return Ok(());
        }
        self.stacks
            .create_managed_node_group(&self.spec, &self.node_group)
            .await
    }
}
