//! Kubernetes release catalogue and feature gating

use kubeforge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VERSION: KubeVersion = KubeVersion::new(1, 21);
pub const LATEST_VERSION: KubeVersion = KubeVersion::new(1, 22);

pub const SUPPORTED_VERSIONS: &[KubeVersion] = &[
    KubeVersion::new(1, 16),
    KubeVersion::new(1, 17),
    KubeVersion::new(1, 18),
    KubeVersion::new(1, 19),
    KubeVersion::new(1, 20),
    KubeVersion::new(1, 21),
    KubeVersion::new(1, 22),
];

pub const DEPRECATED_VERSIONS: &[KubeVersion] = &[
    KubeVersion::new(1, 10),
    KubeVersion::new(1, 11),
    KubeVersion::new(1, 12),
    KubeVersion::new(1, 13),
    KubeVersion::new(1, 14),
    KubeVersion::new(1, 15),
];

/// A `major.minor` control-plane release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KubeVersion {
    pub major: u32,
    pub minor: u32,
}

impl KubeVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_VERSIONS.contains(self)
    }

    pub fn is_deprecated(&self) -> bool {
        DEPRECATED_VERSIONS.contains(self)
    }

    /// Whether this release is `minimum` or newer
    pub fn at_least(&self, minimum: KubeVersion) -> bool {
        *self >= minimum
    }

    /// Resolve a requested release tag.
    ///
    /// Empty or `auto` selects the default release and `latest` the newest
    /// one. Deprecated and unknown releases are rejected with the list of
    /// supported values.
    pub fn resolve(requested: Option<&str>) -> Result<Self> {
        let requested = requested.map(str::trim).unwrap_or_default();
        let version = match requested {
            "" | "auto" => return Ok(DEFAULT_VERSION),
            "latest" => return Ok(LATEST_VERSION),
            other => other.parse::<KubeVersion>()?,
        };

        if version.is_supported() {
            return Ok(version);
        }
        if version.is_deprecated() {
            return Err(Error::validation(format!(
                "invalid version, {version} is no longer supported, supported values: {}",
                supported_list()
            )));
        }
        Err(Error::validation(format!(
            "invalid version {version}, supported values: {}",
            supported_list()
        )))
    }
}

fn supported_list() -> String {
    SUPPORTED_VERSIONS
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for KubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for KubeVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("invalid Kubernetes version {s:?}"));
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for KubeVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<KubeVersion> for String {
    fn from(value: KubeVersion) -> Self {
        value.to_string()
    }
}

/// Features that are only available from a given control-plane release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    ManagedNodeGroups,
    Addons,
    FargateProfiles,
}

impl Feature {
    pub fn min_version(self) -> KubeVersion {
        match self {
            Feature::ManagedNodeGroups => KubeVersion::new(1, 14),
            Feature::Addons => KubeVersion::new(1, 18),
            Feature::FargateProfiles => KubeVersion::new(1, 14),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::ManagedNodeGroups => "managed nodegroups",
            Feature::Addons => "cluster add-ons",
            Feature::FargateProfiles => "Fargate profiles",
        }
    }

    /// Fail with a capability error when `version` predates this feature
    pub fn ensure_supported(self, version: KubeVersion) -> Result<()> {
        if version.at_least(self.min_version()) {
            Ok(())
        } else {
            Err(Error::capability_unsupported(
                self.label(),
                self.min_version().to_string(),
                version.to_string(),
            ))
        }
    }
}
