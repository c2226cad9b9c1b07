//! Tree execution
//!
//! Execution walks the tree and hands every group to the strategy for its
//! mode. Failures are collected, never raised: a failing leaf ends only the
//! sequential branch it belongs to.

mod strategies;

use crate::task::TaskRef;
use crate::tree::{TaskNode, TaskTree};
use futures::future::BoxFuture;
use futures::FutureExt;
use kubeforge_core::Error;
use kubeforge_utils::tracing::{pipeline_span, task_completed, task_span};
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::Instrument;

pub use strategies::{create_strategy, GroupExecutionStrategy, ParallelStrategy, SequentialStrategy};

/// Failures of one tree execution, in tree order.
///
/// Empty means every leaf task succeeded.
pub type ExecutionResult = Vec<Error>;

impl TaskTree {
    /// Run every reachable task and return all failures.
    ///
    /// Does not return before every started task has finished. Consumes the
    /// tree so a plan cannot be extended or re-run once it has executed.
    pub async fn execute(self) -> ExecutionResult {
        let total = self.len();
        let span = pipeline_span(total);

        async move {
            tracing::info!(total_tasks = total, "starting task tree execution");
            let started = Instant::now();
            let errors = execute_node(TaskNode::Group(self.into_root())).await;

            if errors.is_empty() {
                tracing::info!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    "all tasks completed successfully"
                );
            } else {
                tracing::warn!(
                    failed = errors.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "task tree finished with failures"
                );
            }
            errors
        }
        .instrument(span)
        .await
    }
}

/// Execute one node, returning its failures
pub(crate) fn execute_node(node: TaskNode) -> BoxFuture<'static, ExecutionResult> {
    async move {
        match node {
            TaskNode::Task(task) => execute_task(task).await,
            TaskNode::Group(group) => {
                let strategy = create_strategy(group.mode());
                strategy.execute_group(group).await
            }
        }
    }
    .boxed()
}

async fn execute_task(task: TaskRef) -> ExecutionResult {
    let name = task.describe();
    let span = task_span(&name);

    async move {
        let started = Instant::now();
        tracing::debug!("task started");

        let result = match AssertUnwindSafe(task.run()).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(Error::provider(
                name.as_str(),
                format!("task panicked: {}", panic_message(panic.as_ref())),
            )),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                task_completed(&name, duration_ms, true);
                Vec::new()
            }
            Err(error) => {
                task_completed(&name, duration_ms, false);
                tracing::debug!(error = %error, "task error");
                vec![Error::task_failure(name, error)]
            }
        }
    }
    .instrument(span)
    .await
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
