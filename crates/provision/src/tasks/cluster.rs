//! Post-cluster-creation configuration

use async_trait::async_trait;
use kubeforge_config::FargateProfile;
use kubeforge_core::Result;
use kubeforge_provider::ControlPlaneApi;
use kubeforge_task::Task;
use std::sync::Arc;

pub struct AssociateOidcProviderTask {
    cluster: String,
    control_plane: Arc<dyn ControlPlaneApi>,
}

impl AssociateOidcProviderTask {
    pub fn new(cluster: impl Into<String>, control_plane: Arc<dyn ControlPlaneApi>) -> Self {
        Self {
            cluster: cluster.into(),
            control_plane,
        }
    }
}

#[async_trait]
impl Task for AssociateOidcProviderTask {
    fn describe(&self) -> String {
        "associate IAM OIDC provider".to_string()
    }

    async fn run(&self) -> Result<()> {
        self.control_plane
            .associate_oidc_provider(&self.cluster)
            .await
    }
}

pub struct CreateFargateProfileTask {
    cluster: String,
    profile: FargateProfile,
    control_plane: Arc<dyn ControlPlaneApi>,
}

impl CreateFargateProfileTask {
    pub fn new(
        cluster: impl Into<String>,
        profile: FargateProfile,
        control_plane: Arc<dyn ControlPlaneApi>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            profile,
            control_plane,
        }
    }
}

#[async_trait]
impl Task for CreateFargateProfileTask {
    fn describe(&self) -> String {
        format!("create Fargate profile {:?}", self.profile.name)
    }

    async fn run(&self) -> Result<()> {
        let namespaces: Vec<&str> = self
            .profile
            .selectors
            .iter()
            .map(|selector| selector.namespace.as_str())
            .collect();
        tracing::info!(profile = %self.profile.name, ?namespaces, "creating Fargate profile");
        self.control_plane
            .create_fargate_profile(&self.cluster, &self.profile)
            .await
    }
}
