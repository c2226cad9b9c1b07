use kubeforge_config::{validate, ClusterSpecLoader};
use kubeforge_core::{OutputSink, Result};
use std::path::Path;

pub fn execute(config_file: &Path, output: &OutputSink) -> Result<()> {
    let spec = ClusterSpecLoader::from_path(config_file)?;
    let validated = validate(spec)?;
    tracing::debug!(cluster = %validated.name(), "spec is valid");

    let spec = validated.spec();
    output.line(format!("{} is valid", spec.metadata.log_string()));
    output.line(format!("Kubernetes version: {}", validated.version()));
    for pool in spec.node_pools() {
        output.line(format!(
            "  {} {:?}: {} node(s)",
            pool.kind,
            pool.name(),
            pool.base.expected_ready_nodes()
        ));
    }
    Ok(())
}
