//! Parallel execution strategy

use super::GroupExecutionStrategy;
use crate::executor::{execute_node, ExecutionResult};
use crate::tree::TaskGroup;
use async_trait::async_trait;
use kubeforge_core::Error;
use kubeforge_utils::tracing::group_span;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

/// Parallel execution strategy - all children start together.
///
/// Every child runs on its own tokio task, so a child blocked on a long poll
/// does not hold up its siblings. A failing child never cancels the others;
/// the group finishes once all of them have.
pub struct ParallelStrategy;

#[async_trait]
impl GroupExecutionStrategy for ParallelStrategy {
    async fn execute_group(&self, group: TaskGroup) -> ExecutionResult {
        let span = group_span(group.label(), "parallel", group.children().len());

        async move {
            let mut join_set = JoinSet::new();
            for (index, child) in group.children().iter().cloned().enumerate() {
                join_set.spawn(
                    async move { (index, execute_node(child).await) }.in_current_span(),
                );
            }

            let mut results: Vec<(usize, ExecutionResult)> =
                Vec::with_capacity(group.children().len());
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        tracing::error!(error = %e, "parallel branch did not complete");
                        results.push((usize::MAX, vec![aborted_branch(group.label(), &e)]));
                    }
                }
            }

            // Report in declaration order regardless of completion order
            results.sort_by_key(|(index, _)| *index);
            results.into_iter().flat_map(|(_, errors)| errors).collect()
        }
        .instrument(span)
        .await
    }
}

/// Failure recorded for a branch the runtime cancelled before it finished
fn aborted_branch(label: &str, error: &JoinError) -> Error {
    let reason = if error.is_cancelled() {
        "cancelled by the runtime"
    } else {
        "terminated unexpectedly"
    };
    Error::task_failure(
        label,
        Error::provider("parallel branch", format!("{reason}: {error}")),
    )
}
