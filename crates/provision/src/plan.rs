//! Plan Builder
//!
//! Turns a validated specification and its resolved network into a task
//! tree. The root is sequential:
//!
//! 1. the control plane stack (with embedded unmanaged node groups when the
//!    stack mechanism allows it),
//! 2. post-cluster-creation work: OIDC, Fargate profiles and the add-ons
//!    that must exist before nodes join,
//! 3. a parallel group with one creation task per remaining node group.
//!
//! Add-ons that do not gate node readiness are returned as a separate tree
//! that the workflow runs once nodes are ready.

use crate::network::ResolvedNetwork;
use crate::tasks::{
    AssociateOidcProviderTask, CreateAddonTask, CreateClusterStackTask, CreateFargateProfileTask,
    CreateManagedNodeGroupTask, CreateNodeGroupStackTask,
};
use indexmap::IndexMap;
use kubeforge_config::{
    ClusterSpec, CreateParams, FargateProfile, FargateSelector, Feature, ValidatedSpec,
};
use kubeforge_core::{Error, Result, DEFAULT_FARGATE_NAMESPACES, DEFAULT_FARGATE_PROFILE};
use kubeforge_provider::ClusterProvider;
use kubeforge_task::{Task, TaskGroup, TaskNode, TaskTree};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Switches that shape the plan but are not part of the specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanFeatures {
    /// Unmanaged node groups are created inside the control plane stack
    pub combined_cluster_stack: bool,
    /// Add the `fp-default` Fargate profile
    pub default_fargate_profile: bool,
    /// How long each add-on may take to become active
    pub addon_timeout: Duration,
}

impl PlanFeatures {
    pub fn new(params: &CreateParams, provider: &ClusterProvider) -> Self {
        Self {
            combined_cluster_stack: provider.stacks.supports_combined_stack(),
            default_fargate_profile: params.fargate,
            addon_timeout: params.wait_timeout,
        }
    }
}

impl Default for PlanFeatures {
    fn default() -> Self {
        Self {
            combined_cluster_stack: false,
            default_fargate_profile: false,
            addon_timeout: kubeforge_core::DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// A built plan: the tree to execute, the deferred add-ons and an outline
/// used to interpret failures afterwards
pub struct ClusterPlan {
    pub tree: TaskTree,
    pub deferred_addons: TaskTree,
    pub outline: PlanOutline,
    pub spec: Arc<ClusterSpec>,
}

impl ClusterPlan {
    pub fn describe(&self) -> String {
        self.tree.describe()
    }
}

/// Task names of a plan, grouped by the role they play
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOutline {
    /// Tasks that must all succeed before any node group is created
    pub prerequisites: Vec<String>,
    /// Node groups created by the control plane task itself
    pub embedded_node_groups: Vec<String>,
    /// Creation task name to node group name
    pub node_group_tasks: IndexMap<String, String>,
}

impl PlanOutline {
    /// Node groups whose creation is known to have completed despite
    /// `failures`.
    ///
    /// Empty when a prerequisite failed, since node groups were then never
    /// attempted.
    pub fn created_node_groups(&self, failures: &[Error]) -> Vec<String> {
        let failed: HashSet<&str> = failures.iter().filter_map(Error::task_name).collect();
        if self
            .prerequisites
            .iter()
            .any(|task| failed.contains(task.as_str()))
        {
            return Vec::new();
        }

        self.embedded_node_groups
            .iter()
            .cloned()
            .chain(
                self.node_group_tasks
                    .iter()
                    .filter(|(task, _)| !failed.contains(task.as_str()))
                    .map(|(_, node_group)| node_group.clone()),
            )
            .collect()
    }
}

/// Build the provisioning plan.
///
/// Fails with [`Error::CapabilityUnsupported`] before building anything when
/// the resolved version is too old for a requested feature.
pub fn build_cluster_plan(
    spec: &ValidatedSpec,
    network: &ResolvedNetwork,
    features: PlanFeatures,
    provider: &ClusterProvider,
) -> Result<ClusterPlan> {
    check_feature_support(spec, features)?;

    let mut effective = spec.spec().clone();
    effective.vpc = network.vpc.clone();
    effective.availability_zones = network.availability_zones.clone();
    let effective = Arc::new(effective);
    let cluster = effective.metadata.name.clone();

    let mut outline = PlanOutline::default();

    let embedded = if features.combined_cluster_stack {
        effective.node_groups.clone()
    } else {
        Vec::new()
    };
    outline.embedded_node_groups = embedded.iter().map(|ng| ng.base.name.clone()).collect();

    let control_plane =
        CreateClusterStackTask::new(Arc::clone(&effective), embedded, Arc::clone(&provider.stacks));
    outline.prerequisites.push(control_plane.describe());

    let mut tree = TaskTree::sequential(format!("create cluster {cluster:?}"));
    tree.append_task(control_plane);

    let post_cluster = post_cluster_tasks(&effective, features, provider);
    if !post_cluster.is_empty() {
        outline
            .prerequisites
            .extend(leaf_names(post_cluster.root()));
        tree.append(post_cluster);
    }

    let mut node_groups = TaskGroup::parallel("create nodegroups");
    if !features.combined_cluster_stack {
        for ng in &effective.node_groups {
            let task = CreateNodeGroupStackTask::new(
                Arc::clone(&effective),
                ng.clone(),
                Arc::clone(&provider.stacks),
            );
            outline
                .node_group_tasks
                .insert(task.describe(), ng.base.name.clone());
            node_groups.push_task(task);
        }
    }
    for ng in &effective.managed_node_groups {
        let task = CreateManagedNodeGroupTask::new(
            Arc::clone(&effective),
            ng.clone(),
            Arc::clone(&provider.stacks),
        );
        outline
            .node_group_tasks
            .insert(task.describe(), ng.base.name.clone());
        node_groups.push_task(task);
    }
    if !node_groups.is_empty() {
        tree.append(node_groups);
    }

    let mut deferred_addons = TaskTree::sequential("create addons");
    for addon in effective
        .addons
        .iter()
        .filter(|addon| !addon.installs_before_node_groups())
    {
        deferred_addons.append_task(CreateAddonTask::new(
            cluster.clone(),
            addon.clone(),
            features.addon_timeout,
            Arc::clone(&provider.addons),
        ));
    }

    tracing::debug!(
        tasks = tree.len(),
        deferred_addons = deferred_addons.len(),
        "built cluster plan"
    );

    Ok(ClusterPlan {
        tree,
        deferred_addons,
        outline,
        spec: effective,
    })
}

fn check_feature_support(spec: &ValidatedSpec, features: PlanFeatures) -> Result<()> {
    let version = spec.version();
    let cluster = spec.spec();

    if !cluster.managed_node_groups.is_empty() {
        Feature::ManagedNodeGroups.ensure_supported(version)?;
    }
    if !cluster.addons.is_empty() {
        Feature::Addons.ensure_supported(version)?;
    }
    if !cluster.fargate_profiles.is_empty() || features.default_fargate_profile {
        Feature::FargateProfiles.ensure_supported(version)?;
    }
    Ok(())
}

/// OIDC, Fargate profiles and pre-node-group add-ons, in that order
fn post_cluster_tasks(
    spec: &Arc<ClusterSpec>,
    features: PlanFeatures,
    provider: &ClusterProvider,
) -> TaskTree {
    let cluster = spec.metadata.name.as_str();
    let mut tree = TaskTree::sequential("post-cluster-creation");

    if spec.iam.with_oidc {
        tree.append_task(AssociateOidcProviderTask::new(
            cluster,
            Arc::clone(&provider.control_plane),
        ));
    }

    let mut profiles = spec.fargate_profiles.clone();
    if features.default_fargate_profile
        && !profiles
            .iter()
            .any(|profile| profile.name == DEFAULT_FARGATE_PROFILE)
    {
        profiles.push(default_fargate_profile());
    }
    if !profiles.is_empty() {
        let mut group = TaskGroup::parallel("create Fargate profiles");
        for profile in profiles {
            group.push_task(CreateFargateProfileTask::new(
                cluster,
                profile,
                Arc::clone(&provider.control_plane),
            ));
        }
        tree.append(group);
    }

    let mut addons = TaskGroup::sequential("create pre-nodegroup addons");
    for addon in spec
        .addons
        .iter()
        .filter(|addon| addon.installs_before_node_groups())
    {
        addons.push_task(CreateAddonTask::new(
            cluster,
            addon.clone(),
            features.addon_timeout,
            Arc::clone(&provider.addons),
        ));
    }
    if !addons.is_empty() {
        tree.append(addons);
    }

    tree
}

fn default_fargate_profile() -> FargateProfile {
    FargateProfile {
        name: DEFAULT_FARGATE_PROFILE.to_string(),
        selectors: DEFAULT_FARGATE_NAMESPACES
            .iter()
            .map(|namespace| FargateSelector {
                namespace: namespace.to_string(),
                ..Default::default()
            })
            .collect(),
    }
}

fn leaf_names(group: &TaskGroup) -> Vec<String> {
    group
        .children()
        .iter()
        .flat_map(|child| match child {
            TaskNode::Task(task) => vec![task.describe()],
            TaskNode::Group(group) => leaf_names(group),
        })
        .collect()
}
