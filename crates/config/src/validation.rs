//! Specification validation

use crate::{ClusterEndpoints, ClusterSpec, KubeVersion};
use kubeforge_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][-a-zA-Z0-9]*$").expect("static name pattern is valid")
});

/// A specification that passed validation, with its version resolved.
///
/// Only [`validate`] constructs this type; it exposes the specification
/// read-only from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSpec {
    spec: ClusterSpec,
    version: KubeVersion,
}

impl ValidatedSpec {
    pub fn spec(&self) -> &ClusterSpec {
        &self.spec
    }

    pub fn version(&self) -> KubeVersion {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.spec.metadata.name
    }

    pub fn region(&self) -> &str {
        &self.spec.metadata.region
    }
}

/// Validate a specification and pin its version
pub fn validate(mut spec: ClusterSpec) -> Result<ValidatedSpec> {
    validate_name("cluster", &spec.metadata.name)?;
    if spec.metadata.region.trim().is_empty() {
        return Err(Error::validation("metadata.region must be set"));
    }

    let version = KubeVersion::resolve(spec.metadata.version.as_deref())?;
    spec.metadata.version = Some(version.to_string());

    validate_node_groups(&spec)?;
    validate_addons(&spec)?;
    validate_fargate_profiles(&spec)?;
    validate_endpoints(&spec.vpc.cluster_endpoints)?;
    validate_private_cluster(&spec)?;

    if spec.vpc.cluster_endpoints.private_only() {
        tracing::warn!(
            "cluster endpoint is private only; subsequent operations must run from within the cluster's network"
        );
    }

    Ok(ValidatedSpec { spec, version })
}

/// Check a resource name against the accepted pattern
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "{kind} name {name:?} is invalid; it must start with a letter and contain only letters, digits and '-'"
        )))
    }
}

fn validate_node_groups(spec: &ClusterSpec) -> Result<()> {
    let mut seen = HashSet::new();
    for pool in spec.node_pools() {
        validate_name(&pool.kind.to_string(), pool.name())?;
        if !seen.insert(pool.name()) {
            return Err(Error::validation(format!(
                "node group name {:?} is used more than once",
                pool.name()
            )));
        }

        let base = pool.base;
        if let (Some(min), Some(max)) = (base.min_size, base.max_size) {
            if min > max {
                return Err(Error::validation(format!(
                    "{} {:?}: minSize ({min}) is greater than maxSize ({max})",
                    pool.kind,
                    pool.name()
                )));
            }
        }
        if let Some(desired) = base.desired_capacity {
            let below_min = base.min_size.is_some_and(|min| desired < min);
            let above_max = base.max_size.is_some_and(|max| desired > max);
            if below_min || above_max {
                return Err(Error::validation(format!(
                    "{} {:?}: desiredCapacity ({desired}) must be within [minSize, maxSize]",
                    pool.kind,
                    pool.name()
                )));
            }
        }
    }
    Ok(())
}

fn validate_addons(spec: &ClusterSpec) -> Result<()> {
    let mut seen = HashSet::new();
    for addon in &spec.addons {
        if addon.name.trim().is_empty() {
            return Err(Error::validation("add-on name must be set"));
        }
        if !seen.insert(addon.name.as_str()) {
            return Err(Error::validation(format!(
                "add-on {:?} is listed more than once",
                addon.name
            )));
        }
    }
    Ok(())
}

fn validate_fargate_profiles(spec: &ClusterSpec) -> Result<()> {
    let mut seen = HashSet::new();
    for profile in &spec.fargate_profiles {
        validate_name("Fargate profile", &profile.name)?;
        if !seen.insert(profile.name.as_str()) {
            return Err(Error::validation(format!(
                "Fargate profile {:?} is listed more than once",
                profile.name
            )));
        }
        if profile.selectors.is_empty() {
            return Err(Error::validation(format!(
                "Fargate profile {:?} must have at least one selector",
                profile.name
            )));
        }
    }
    Ok(())
}

fn validate_endpoints(endpoints: &ClusterEndpoints) -> Result<()> {
    if !endpoints.private_access && !endpoints.public_access {
        return Err(Error::validation(
            "cluster endpoint must have public access, private access, or both enabled",
        ));
    }
    Ok(())
}

fn validate_private_cluster(spec: &ClusterSpec) -> Result<()> {
    if !spec.private_cluster.enabled {
        return Ok(());
    }
    if let Some(pool) = spec
        .node_pools()
        .into_iter()
        .find(|pool| !pool.base.private_networking)
    {
        return Err(Error::validation(format!(
            "private clusters require private networking for every node group, but {} {:?} uses public subnets",
            pool.kind,
            pool.name()
        )));
    }
    if spec.has_gitops_flux_configured() {
        tracing::warn!("GitOps bootstrap on a private cluster runs before public endpoint access is disabled");
    }
    Ok(())
}
