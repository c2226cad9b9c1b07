//! Managed add-on installation

use async_trait::async_trait;
use kubeforge_config::Addon;
use kubeforge_core::Result;
use kubeforge_provider::AddonApi;
use kubeforge_task::Task;
use std::sync::Arc;
use std::time::Duration;

/// Install one add-on and wait for it to become active
pub struct CreateAddonTask {
    cluster: String,
    addon: Addon,
    timeout: Duration,
    api: Arc<dyn AddonApi>,
}

impl CreateAddonTask {
    pub fn new(
        cluster: impl Into<String>,
        addon: Addon,
        timeout: Duration,
        api: Arc<dyn AddonApi>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            addon,
            timeout,
            api,
        }
    }
}

#[async_trait]
impl Task for CreateAddonTask {
    fn describe(&self) -> String {
        format!("create addon {:?}", self.addon.name)
    }

    async fn run(&self) -> Result<()> {
        self.api
            .create_addon(&self.cluster, &self.addon, self.timeout)
            .await
    }
}
