//! Sequential execution strategy

use super::GroupExecutionStrategy;
use crate::executor::{execute_node, ExecutionResult};
use crate::tree::TaskGroup;
use async_trait::async_trait;
use kubeforge_utils::tracing::group_span;
use tracing::Instrument;

/// Sequential execution strategy - children run one after another.
///
/// The first failing child ends the group: later siblings never start. The
/// failure stays local to this branch.
pub struct SequentialStrategy;

#[async_trait]
impl GroupExecutionStrategy for SequentialStrategy {
    async fn execute_group(&self, group: TaskGroup) -> ExecutionResult {
        let span = group_span(group.label(), "sequential", group.children().len());

        async move {
            let children = group.children();
            for (index, child) in children.iter().enumerate() {
                let errors = execute_node(child.clone()).await;
                if !errors.is_empty() {
                    let skipped: Vec<String> =
                        children[index + 1..].iter().map(|node| node.name()).collect();
                    if !skipped.is_empty() {
                        tracing::warn!(
                            failed = %child.name(),
                            skipped = ?skipped,
                            "skipping remaining tasks in sequence"
                        );
                    }
                    return errors;
                }
            }
            Vec::new()
        }
        .instrument(span)
        .await
    }
}
