//! Plan rendering for operators
//!
//! Produces a one-line description of a tree without running anything, e.g.
//!
//! ```text
//! create cluster "demo" (2 sequential tasks): { create cluster control plane "demo", node groups (2 parallel sub-tasks): { create nodegroup "ng-1", create managed nodegroup "mng-1" } }
//! ```

use crate::tree::{TaskGroup, TaskNode, TaskTree};

impl TaskTree {
    /// Render group kinds, labels and task names
    pub fn describe(&self) -> String {
        describe_group(self.root(), 0)
    }
}

impl TaskGroup {
    pub fn describe(&self) -> String {
        describe_group(self, 0)
    }
}

fn describe_group(group: &TaskGroup, depth: usize) -> String {
    let count = group.children().len();
    let noun = match (depth, count) {
        (0, 1) => "task",
        (0, _) => "tasks",
        (_, 1) => "sub-task",
        (_, _) => "sub-tasks",
    };

    if count == 0 {
        return if group.label().is_empty() {
            "no tasks".to_string()
        } else {
            format!("{} (no tasks)", group.label())
        };
    }

    let header = if group.label().is_empty() {
        format!("{count} {} {noun}", group.mode())
    } else {
        format!("{} ({count} {} {noun})", group.label(), group.mode())
    };

    let children = group
        .children()
        .iter()
        .map(|child| match child {
            TaskNode::Task(task) => task.describe(),
            TaskNode::Group(sub) => describe_group(sub, depth + 1),
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{header}: {{ {children} }}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnTask, Task};

    fn noop(name: &str) -> impl Task + 'static {
        FnTask::new(name, || async { Ok(()) })
    }

    #[test]
    fn renders_nested_groups() {
        let node_groups = TaskGroup::parallel("node groups")
            .with_task(noop("create nodegroup \"ng-1\""))
            .with_task(noop("create managed nodegroup \"mng-1\""));
        let tree = TaskTree::new(
            TaskGroup::sequential("create cluster \"demo\"")
                .with_task(noop("create cluster control plane \"demo\""))
                .with(node_groups),
        );

        assert_eq!(
            tree.describe(),
            "create cluster \"demo\" (2 sequential tasks): { create cluster control plane \"demo\", \
             node groups (2 parallel sub-tasks): { create nodegroup \"ng-1\", create managed nodegroup \"mng-1\" } }"
        );
    }

    #[test]
    fn unlabelled_and_empty_groups() {
        let tree = TaskTree::new(TaskGroup::parallel("").with_task(noop("only")));
        assert_eq!(tree.describe(), "1 parallel task: { only }");
        assert_eq!(TaskTree::sequential("").describe(), "no tasks");
        assert_eq!(TaskTree::sequential("addons").describe(), "addons (no tasks)");
    }

    #[test]
    fn describe_after_append_includes_subtree_label() {
        let mut tree = TaskTree::new(TaskGroup::sequential("").with_task(noop("a")));
        tree.append(TaskGroup::parallel("post-cluster extras").with_task(noop("b")));
        let description = tree.describe();
        assert!(description.contains("post-cluster extras (1 parallel sub-task): { b }"));
    }
}
