//! Task tree engine for kubeforge
//!
//! A provisioning plan is a tree of [`TaskGroup`]s whose leaves are
//! [`Task`]s. Sequential groups run their children in order and stop their
//! own branch at the first failure; parallel groups start every child at once
//! and wait for all of them. Executing a tree never stops early: the result
//! is the full list of failures, each tagged with the failing task's name.
//!
//! The engine knows nothing about what a task does.

pub mod describe;
pub mod executor;
pub mod task;
pub mod tree;

pub use executor::ExecutionResult;
pub use task::{FnTask, Task, TaskRef};
pub use tree::{TaskGroup, TaskGroupMode, TaskNode, TaskTree};
