//! Node readiness plan
//!
//! One sequential branch per node group (authorise, then wait), all
//! branches in parallel so a stuck group never delays the others.

use crate::tasks::{AuthorizeNodeGroupTask, WaitForNodesTask};
use indexmap::IndexMap;
use kubeforge_config::{ClusterSpec, NodeGroupKind};
use kubeforge_core::Error;
use kubeforge_provider::KubeClient;
use kubeforge_task::{Task, TaskGroup, TaskTree};
use kubeforge_utils::WaitOptions;
use std::collections::HashSet;
use std::sync::Arc;

pub struct ReadinessPlan {
    pub tree: TaskTree,
    /// Node group name to the names of its tasks
    tasks_by_group: IndexMap<String, Vec<String>>,
}

impl ReadinessPlan {
    pub fn node_groups(&self) -> Vec<String> {
        self.tasks_by_group.keys().cloned().collect()
    }

    /// Run the plan and split node groups into ready ones and failures
    pub async fn execute(self) -> ReadinessOutcome {
        let failures = self.tree.execute().await;
        ReadinessOutcome {
            ready: ready_groups(&self.tasks_by_group, &failures),
            failures,
        }
    }

    /// Node groups none of whose tasks appear in `failures`
    pub fn ready_node_groups(&self, failures: &[Error]) -> Vec<String> {
        ready_groups(&self.tasks_by_group, failures)
    }
}

/// Result of running a [`ReadinessPlan`]
#[derive(Debug)]
pub struct ReadinessOutcome {
    pub ready: Vec<String>,
    pub failures: Vec<Error>,
}

fn ready_groups(tasks_by_group: &IndexMap<String, Vec<String>>, failures: &[Error]) -> Vec<String> {
    let failed: HashSet<&str> = failures.iter().filter_map(Error::task_name).collect();
    tasks_by_group
        .iter()
        .filter(|(_, tasks)| !tasks.iter().any(|task| failed.contains(task.as_str())))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Build the readiness plan for every node group in `spec`, or only those
/// named in `only`
pub fn build_readiness_plan(
    spec: &ClusterSpec,
    only: Option<&[String]>,
    kube: &Arc<dyn KubeClient>,
    options: WaitOptions,
) -> ReadinessPlan {
    let cluster = spec.metadata.name.as_str();
    let selected = |name: &str| only.map_or(true, |names| names.iter().any(|n| n == name));

    let mut root = TaskGroup::parallel("authorize and wait for nodegroups");
    let mut tasks_by_group = IndexMap::new();

    for pool in spec.node_pools() {
        if !selected(pool.name()) {
            continue;
        }

        let mut branch = TaskGroup::sequential(format!("{} {:?}", pool.kind, pool.name()));
        let mut names = Vec::new();

        if pool.kind == NodeGroupKind::Unmanaged {
            if let Some(ng) = spec
                .node_groups
                .iter()
                .find(|ng| ng.base.name == pool.name())
            {
                let task = AuthorizeNodeGroupTask::new(cluster, ng.clone(), Arc::clone(kube));
                names.push(task.describe());
                branch.push_task(task);
            }
        }

        let wait = WaitForNodesTask::new(
            cluster,
            pool.name(),
            pool.kind,
            pool.base.expected_ready_nodes(),
            options,
            Arc::clone(kube),
        );
        names.push(wait.describe());
        branch.push_task(wait);

        tasks_by_group.insert(pool.name().to_string(), names);
        root.push(branch);
    }

    ReadinessPlan {
        tree: TaskTree::new(root),
        tasks_by_group,
    }
}
