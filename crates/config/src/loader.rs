//! Specification file loader
//!
//! Reads a cluster specification from YAML or JSON. The format is picked from
//! the file extension; anything that is not `.json` is parsed as YAML, which
//! also accepts JSON documents.

use crate::ClusterSpec;
use kubeforge_core::{Error, Result};
use std::path::Path;

/// Loads and renders [`ClusterSpec`] documents
pub struct ClusterSpecLoader;

impl ClusterSpecLoader {
    /// Load a specification from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<ClusterSpec> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read", e))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let spec = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }?;

        tracing::debug!(path = %path.display(), cluster = %spec.metadata.name, "loaded cluster specification");
        Ok(spec)
    }

    pub fn from_yaml_str(content: &str) -> Result<ClusterSpec> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<ClusterSpec> {
        Ok(serde_json::from_str(content)?)
    }

    /// Render a specification as YAML, used for dry-run output
    pub fn to_yaml(spec: &ClusterSpec) -> Result<String> {
        Ok(serde_yaml::to_string(spec)?)
    }
}
