//! The leaf unit of work

use async_trait::async_trait;
use kubeforge_core::Result;
use std::future::Future;
use std::sync::Arc;

/// A single operation against an external system.
///
/// Implementations must be safe to re-run in a later plan execution: check
/// whether the resource already exists before mutating anything.
#[async_trait]
pub trait Task: Send + Sync {
    /// Human-readable name used in plan descriptions and failure reports
    fn describe(&self) -> String;

    async fn run(&self) -> Result<()>;
}

/// Shared handle to a task stored in a tree
pub type TaskRef = Arc<dyn Task>;

/// Task backed by a closure
pub struct FnTask<F> {
    name: String,
    run: F,
}

impl<F, Fut> FnTask<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, run: F) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }
}

#[async_trait]
impl<F, Fut> Task for FnTask<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn run(&self) -> Result<()> {
        (self.run)().await
    }
}
