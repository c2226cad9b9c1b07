//! Node join authorisation and readiness waits

use async_trait::async_trait;
use kubeforge_config::{NodeGroup, NodeGroupKind};
use kubeforge_core::Result;
use kubeforge_provider::KubeClient;
use kubeforge_task::Task;
use kubeforge_utils::{wait_until, WaitOptions};
use std::sync::Arc;

/// Let an unmanaged node group's instances join the cluster.
///
/// Managed node groups are authorised by the managed service itself.
pub struct AuthorizeNodeGroupTask {
    cluster: String,
    node_group: NodeGroup,
    kube: Arc<dyn KubeClient>,
}

impl AuthorizeNodeGroupTask {
    pub fn new(cluster: impl Into<String>, node_group: NodeGroup, kube: Arc<dyn KubeClient>) -> Self {
        Self {
            cluster: cluster.into(),
            node_group,
            kube,
        }
    }
}

#[async_trait]
impl Task for AuthorizeNodeGroupTask {
    fn describe(&self) -> String {
        format!("authorize nodegroup {:?} to join", self.node_group.base.name)
    }

    async fn run(&self) -> Result<()> {
        self.kube
            .authorize_node_group(&self.cluster, &self.node_group)
            .await
    }
}

/// Block until a node group reports enough ready nodes.
///
/// The task owns its deadline; hitting it fails the task with a timeout.
pub struct WaitForNodesTask {
    cluster: String,
    node_group: String,
    kind: NodeGroupKind,
    expected: u32,
    options: WaitOptions,
    kube: Arc<dyn KubeClient>,
}

impl WaitForNodesTask {
    pub fn new(
        cluster: impl Into<String>,
        node_group: impl Into<String>,
        kind: NodeGroupKind,
        expected: u32,
        options: WaitOptions,
        kube: Arc<dyn KubeClient>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            node_group: node_group.into(),
            kind,
            expected,
            options,
            kube,
        }
    }
}

#[async_trait]
impl Task for WaitForNodesTask {
    fn describe(&self) -> String {
        format!(
            "wait for {} node(s) of {} {:?} to become ready",
            self.expected, self.kind, self.node_group
        )
    }

    async fn run(&self) -> Result<()> {
        if self.expected == 0 {
            return Ok(());
        }

        let operation = format!("waiting for nodes of {} {:?}", self.kind, self.node_group);
        wait_until(&operation, self.options, move || async move {
            let ready = self
                .kube
                .ready_node_count(&self.cluster, &self.node_group)
                .await?;
            tracing::debug!(node_group = %self.node_group, ready, expected = self.expected, "polled node readiness");
            Ok(ready >= self.expected)
        })
        .await?;

        tracing::info!(
            node_group = %self.node_group,
            nodes = self.expected,
            "nodegroup has enough ready nodes"
        );
        Ok(())
    }
}
