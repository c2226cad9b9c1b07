//! Task tree construction

use crate::task::{Task, TaskRef};
use std::fmt;
use std::sync::Arc;

/// How the children of a group are run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGroupMode {
    /// One after another; a failing child ends the group
    Sequential,
    /// All at once; the group ends when every child has finished
    Parallel,
}

impl fmt::Display for TaskGroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskGroupMode::Sequential => write!(f, "sequential"),
            TaskGroupMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// A node that is either a leaf task or a nested group
#[derive(Clone)]
pub enum TaskNode {
    Task(TaskRef),
    Group(TaskGroup),
}

impl TaskNode {
    /// Number of leaf tasks below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            TaskNode::Task(_) => 1,
            TaskNode::Group(group) => group.leaf_count(),
        }
    }

    /// Name used when reporting on this node
    pub fn name(&self) -> String {
        match self {
            TaskNode::Task(task) => task.describe(),
            TaskNode::Group(group) => group.label().to_string(),
        }
    }
}

impl From<TaskRef> for TaskNode {
    fn from(task: TaskRef) -> Self {
        TaskNode::Task(task)
    }
}

impl From<TaskGroup> for TaskNode {
    fn from(group: TaskGroup) -> Self {
        TaskNode::Group(group)
    }
}

impl fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskNode::Task(task) => f.debug_tuple("Task").field(&task.describe()).finish(),
            TaskNode::Group(group) => f.debug_tuple("Group").field(group).finish(),
        }
    }
}

/// An ordered collection of tasks and sub-groups run in one mode
#[derive(Clone, Debug)]
pub struct TaskGroup {
    mode: TaskGroupMode,
    label: String,
    children: Vec<TaskNode>,
}

impl TaskGroup {
    /// Build a group from its children. Pure construction, nothing runs.
    pub fn build(mode: TaskGroupMode, children: Vec<TaskNode>, label: impl Into<String>) -> Self {
        Self {
            mode,
            label: label.into(),
            children,
        }
    }

    pub fn sequential(label: impl Into<String>) -> Self {
        Self::build(TaskGroupMode::Sequential, Vec::new(), label)
    }

    pub fn parallel(label: impl Into<String>) -> Self {
        Self::build(TaskGroupMode::Parallel, Vec::new(), label)
    }

    /// Add a leaf task
    pub fn push_task(&mut self, task: impl Task + 'static) {
        self.children.push(TaskNode::Task(Arc::new(task)));
    }

    /// Add a child node (leaf or group)
    pub fn push(&mut self, node: impl Into<TaskNode>) {
        self.children.push(node.into());
    }

    /// Builder-style [`TaskGroup::push_task`]
    pub fn with_task(mut self, task: impl Task + 'static) -> Self {
        self.push_task(task);
        self
    }

    /// Builder-style [`TaskGroup::push`]
    pub fn with(mut self, node: impl Into<TaskNode>) -> Self {
        self.push(node);
        self
    }

    pub fn mode(&self) -> TaskGroupMode {
        self.mode
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[TaskNode] {
        &self.children
    }

    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(TaskNode::leaf_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }
}

/// A root group plus the running count of its leaf tasks
#[derive(Clone, Debug)]
pub struct TaskTree {
    root: TaskGroup,
    length: usize,
}

impl TaskTree {
    pub fn new(root: TaskGroup) -> Self {
        let length = root.leaf_count();
        Self { root, length }
    }

    /// Empty sequential tree
    pub fn sequential(label: impl Into<String>) -> Self {
        Self::new(TaskGroup::sequential(label))
    }

    /// Empty parallel tree
    pub fn parallel(label: impl Into<String>) -> Self {
        Self::new(TaskGroup::parallel(label))
    }

    /// Graft `subtree` as an additional child of the root group.
    ///
    /// Execution consumes the tree, so grafting is only possible before it
    /// runs.
    pub fn append(&mut self, subtree: impl Into<TaskTree>) {
        let subtree = subtree.into();
        self.length += subtree.length;
        self.root.children.push(TaskNode::Group(subtree.root));
    }

    /// Add a leaf task directly under the root group
    pub fn append_task(&mut self, task: impl Task + 'static) {
        self.length += 1;
        self.root.push_task(task);
    }

    /// Total number of leaf tasks
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn root(&self) -> &TaskGroup {
        &self.root
    }

    pub(crate) fn into_root(self) -> TaskGroup {
        self.root
    }
}

impl From<TaskGroup> for TaskTree {
    fn from(root: TaskGroup) -> Self {
        Self::new(root)
    }
}
