//! Task group execution strategies

use crate::executor::ExecutionResult;
use crate::tree::{TaskGroup, TaskGroupMode};
use async_trait::async_trait;

mod parallel;
mod sequential;

pub use parallel::ParallelStrategy;
pub use sequential::SequentialStrategy;

/// Trait for task group execution strategies
#[async_trait]
pub trait GroupExecutionStrategy: Send + Sync {
    /// Run the children of `group` and return their failures in child order
    async fn execute_group(&self, group: TaskGroup) -> ExecutionResult;
}

/// Create a strategy based on the group mode
pub fn create_strategy(mode: TaskGroupMode) -> Box<dyn GroupExecutionStrategy> {
    match mode {
        TaskGroupMode::Sequential => Box::new(SequentialStrategy),
        TaskGroupMode::Parallel => Box::new(ParallelStrategy),
    }
}
