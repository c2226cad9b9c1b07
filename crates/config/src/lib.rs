//! Cluster specification handling for kubeforge
//!
//! This crate owns the declarative description of a cluster (metadata,
//! network, node groups, add-ons, GitOps and private-cluster settings), the
//! supported version catalogue, validation, and loading a specification from
//! YAML or JSON. It never talks to a provider.

pub mod loader;
pub mod params;
pub mod types;
pub mod validation;
pub mod version;

pub use loader::ClusterSpecLoader;
pub use params::{CreateParams, KubeconfigParams};
pub use types::*;
pub use validation::{validate, ValidatedSpec};
pub use version::{Feature, KubeVersion};
