//! Network resolution
//!
//! Decides where the cluster's subnets come from. Exactly one mode applies
//! per run, and combining inputs that belong to different modes is a
//! [`Error::ConfigurationConflict`] naming both flags. All conflict and
//! identifier checks run before the first provider call, and no mode ever
//! calls a mutating provider API: subnet creation is left to the cluster
//! stack.

use kubeforge_config::{ClusterSpec, CreateParams, SubnetSpec, SubnetTopology, SubnetsSpec, VpcSpec};
use kubeforge_core::{Error, Result, DEFAULT_VPC_CIDR, DEFAULT_ZONE_COUNT, MIN_REQUIRED_ZONES, SUBNET_BLOCKS};
use kubeforge_provider::NetworkApi;
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

const SOURCE_CLUSTER_FLAG: &str = "--vpc-from-cluster";
const SUBNET_FLAGS: &str = "--vpc-private-subnets/--vpc-public-subnets";
const ZONES_FLAG: &str = "--zones";
const CIDR_FLAG: &str = "--vpc-cidr";

const CUSTOM_NETWORKING_NOTICE: &str = "custom VPC/subnets will be used; if the resulting cluster \
    doesn't function as expected, make sure to review the configuration of VPC/subnets";

/// Where the cluster network comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMode {
    /// Create a dedicated network with subnets carved from a CIDR
    Derive,
    /// Reuse the network of another cluster
    ImportFromCluster { source: String },
    /// Use existing subnets referenced by ID
    ImportSubnets,
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Derive => write!(f, "derive"),
            NetworkMode::ImportFromCluster { source } => write!(f, "import from cluster {source:?}"),
            NetworkMode::ImportSubnets => write!(f, "import subnets"),
        }
    }
}

/// Fully resolved network for the plan builder
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNetwork {
    pub mode: NetworkMode,
    pub vpc: VpcSpec,
    pub availability_zones: Vec<String>,
}

impl ResolvedNetwork {
    /// Short human-readable summary of the VPC and its subnets
    pub fn subnet_info(&self) -> String {
        format!(
            "VPC ({}) and subnets (private:{:?} public:{:?})",
            self.vpc.id.as_deref().unwrap_or("new"),
            self.vpc.subnets.ids(SubnetTopology::Private),
            self.vpc.subnets.ids(SubnetTopology::Public),
        )
    }
}

/// Outcome of network resolution
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResolution {
    Resolved(ResolvedNetwork),
    /// Dry run: inputs were checked but nothing was looked up or allocated
    /// beyond zone selection
    DryRun {
        mode: NetworkMode,
        availability_zones: Vec<String>,
    },
}

impl NetworkResolution {
    pub fn mode(&self) -> &NetworkMode {
        match self {
            NetworkResolution::Resolved(network) => &network.mode,
            NetworkResolution::DryRun { mode, .. } => mode,
        }
    }

    pub fn availability_zones(&self) -> &[String] {
        match self {
            NetworkResolution::Resolved(network) => &network.availability_zones,
            NetworkResolution::DryRun {
                availability_zones, ..
            } => availability_zones,
        }
    }
}

/// Pick the resolution mode, rejecting inputs that belong to different modes.
///
/// Pure: no provider is consulted.
pub fn select_mode(spec: &ClusterSpec, params: &CreateParams) -> Result<NetworkMode> {
    let subnets_given = spec.has_any_subnets() || params.subnets_given_as_flags();
    let zones_given = !params.zones.is_empty();
    let cidr_given = params.vpc_cidr.is_some();

    if let Some(source) = &params.source_cluster {
        if zones_given {
            return Err(Error::conflict(SOURCE_CLUSTER_FLAG, ZONES_FLAG));
        }
        if cidr_given {
            return Err(Error::conflict(SOURCE_CLUSTER_FLAG, CIDR_FLAG));
        }
        if subnets_given {
            return Err(Error::conflict(SOURCE_CLUSTER_FLAG, SUBNET_FLAGS));
        }
        if source.trim().is_empty() {
            return Err(Error::validation("source cluster name must not be empty"));
        }
        return Ok(NetworkMode::ImportFromCluster {
            source: source.clone(),
        });
    }

    if !subnets_given {
        return Ok(NetworkMode::Derive);
    }

    if zones_given {
        return Err(Error::conflict(SUBNET_FLAGS, ZONES_FLAG));
    }
    if cidr_given {
        return Err(Error::conflict(SUBNET_FLAGS, CIDR_FLAG));
    }
    Ok(NetworkMode::ImportSubnets)
}

/// Resolve the cluster network for `spec`.
///
/// In dry-run mode only zones are resolved (derive mode); imports stop after
/// their inputs have been checked.
pub async fn resolve_network(
    spec: &ClusterSpec,
    params: &CreateParams,
    api: &dyn NetworkApi,
) -> Result<NetworkResolution> {
    let mode = select_mode(spec, params)?;
    tracing::info!(mode = %mode, "resolving cluster network");

    match mode {
        NetworkMode::Derive => derive(spec, params, api).await,
        NetworkMode::ImportFromCluster { source } => {
            import_from_cluster(spec, params, api, source).await
        }
        NetworkMode::ImportSubnets => import_subnets(spec, params, api).await,
    }
}

async fn derive(
    spec: &ClusterSpec,
    params: &CreateParams,
    api: &dyn NetworkApi,
) -> Result<NetworkResolution> {
    let zones = resolve_zones(spec, params, api).await?;
    if params.dry_run {
        return Ok(NetworkResolution::DryRun {
            mode: NetworkMode::Derive,
            availability_zones: zones,
        });
    }

    let cidr = params
        .vpc_cidr
        .clone()
        .or_else(|| spec.vpc.cidr.clone())
        .unwrap_or_else(|| DEFAULT_VPC_CIDR.to_string());
    let subnets = derive_subnets(&cidr, &zones)?;
    tracing::info!(cidr = %cidr, zones = ?zones, "subnets will be created in a new VPC");

    Ok(NetworkResolution::Resolved(ResolvedNetwork {
        mode: NetworkMode::Derive,
        vpc: VpcSpec {
            id: None,
            cidr: Some(cidr),
            subnets,
            ..spec.vpc.clone()
        },
        availability_zones: zones,
    }))
}

/// Zones from the flags, else from the spec, else picked from the region
async fn resolve_zones(
    spec: &ClusterSpec,
    params: &CreateParams,
    api: &dyn NetworkApi,
) -> Result<Vec<String>> {
    let explicit = if params.zones.is_empty() {
        &spec.availability_zones
    } else {
        &params.zones
    };

    if !explicit.is_empty() {
        if explicit.len() < MIN_REQUIRED_ZONES {
            return Err(Error::validation(format!(
                "only {} zones specified {:?}, {} are required (can be non-unique)",
                explicit.len(),
                explicit,
                MIN_REQUIRED_ZONES
            )));
        }
        return Ok(explicit.clone());
    }

    let available = api.available_zones(&spec.metadata.region).await?;
    if available.len() < MIN_REQUIRED_ZONES {
        return Err(Error::insufficient_resources(format!(
            "region {} offers {} availability zone(s), at least {} are required",
            spec.metadata.region,
            available.len(),
            MIN_REQUIRED_ZONES
        )));
    }

    let zones: Vec<String> = available.into_iter().take(DEFAULT_ZONE_COUNT).collect();
    tracing::info!(region = %spec.metadata.region, zones = ?zones, "selected availability zones");
    Ok(zones)
}

async fn import_from_cluster(
    spec: &ClusterSpec,
    params: &CreateParams,
    api: &dyn NetworkApi,
    source: String,
) -> Result<NetworkResolution> {
    if params.dry_run {
        return Ok(NetworkResolution::DryRun {
            mode: NetworkMode::ImportFromCluster { source },
            availability_zones: spec.availability_zones.clone(),
        });
    }

    let layout = api.import_cluster_network(&source).await?;
    check_private_node_groups(spec, &layout.subnets)?;

    tracing::info!(source = %source, "reusing network of another cluster");
    let network = ResolvedNetwork {
        availability_zones: layout.availability_zones(),
        vpc: VpcSpec {
            id: Some(layout.vpc_id),
            cidr: layout.cidr,
            subnets: layout.subnets,
            ..spec.vpc.clone()
        },
        mode: NetworkMode::ImportFromCluster { source },
    };
    tracing::info!("using {}", network.subnet_info());
    tracing::warn!("{CUSTOM_NETWORKING_NOTICE}");
    Ok(NetworkResolution::Resolved(network))
}

async fn import_subnets(
    spec: &ClusterSpec,
    params: &CreateParams,
    api: &dyn NetworkApi,
) -> Result<NetworkResolution> {
    let requested = requested_subnet_ids(spec, params)?;
    if params.dry_run {
        return Ok(NetworkResolution::DryRun {
            mode: NetworkMode::ImportSubnets,
            availability_zones: spec.availability_zones.clone(),
        });
    }

    let mut subnets = SubnetsSpec::default();
    let mut vpc_id = spec.vpc.id.clone();

    for (topology, ids) in requested {
        if ids.is_empty() {
            continue;
        }
        let described = api.describe_subnets(&ids).await?;

        for id in &ids {
            if !described.iter().any(|subnet| &subnet.id == id) {
                return Err(Error::insufficient_resources(format!(
                    "{topology} subnet {id} was not found"
                )));
            }
        }

        for subnet in described {
            match &vpc_id {
                Some(expected) if *expected != subnet.vpc_id => {
                    return Err(Error::validation(format!(
                        "subnet {} belongs to VPC {}, not {}",
                        subnet.id, subnet.vpc_id, expected
                    )));
                }
                Some(_) => {}
                None => vpc_id = Some(subnet.vpc_id.clone()),
            }
            subnets.of_mut(topology).push(SubnetSpec {
                id: Some(subnet.id),
                cidr: Some(subnet.cidr),
                availability_zone: Some(subnet.availability_zone),
            });
        }
    }

    if let Err(err) = check_sufficient_subnets(spec, &subnets) {
        tracing::error!("unable to use given subnets");
        return Err(err);
    }
    check_private_node_groups(spec, &subnets)?;

    let availability_zones = if spec.availability_zones.is_empty() {
        zones_of(&subnets, &SubnetTopology::ALL)
    } else {
        spec.availability_zones.clone()
    };

    // Imported subnets are authoritative, so no CIDR is carried over
    let network = ResolvedNetwork {
        mode: NetworkMode::ImportSubnets,
        vpc: VpcSpec {
            id: vpc_id,
            cidr: None,
            subnets,
            ..spec.vpc.clone()
        },
        availability_zones,
    };
    tracing::info!("using existing {}", network.subnet_info());
    tracing::warn!("{CUSTOM_NETWORKING_NOTICE}");
    Ok(NetworkResolution::Resolved(network))
}

/// Subnet IDs per topology from the spec file and the flags, deduplicated
fn requested_subnet_ids(
    spec: &ClusterSpec,
    params: &CreateParams,
) -> Result<Vec<(SubnetTopology, Vec<String>)>> {
    SubnetTopology::ALL
        .iter()
        .map(|&topology| {
            let from_spec = spec.vpc.subnets.of(topology);
            if from_spec.iter().any(|subnet| subnet.id.is_none()) {
                return Err(Error::validation(format!(
                    "{topology} subnets in the specification must be referenced by id"
                )));
            }

            let mut ids = spec.vpc.subnets.ids(topology);
            for id in params.subnet_ids(topology) {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
            Ok((topology, ids))
        })
        .collect()
}

fn zones_of(subnets: &SubnetsSpec, topologies: &[SubnetTopology]) -> Vec<String> {
    topologies
        .iter()
        .flat_map(|topology| subnets.of(*topology))
        .filter_map(|subnet| subnet.availability_zone.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Check that imported subnets can host the cluster.
///
/// Every topology in use (and the private topology whenever a node group
/// uses private networking) must span at least [`MIN_REQUIRED_ZONES`] zones
/// and cover every zone the specification names.
pub fn check_sufficient_subnets(spec: &ClusterSpec, subnets: &SubnetsSpec) -> Result<()> {
    let required: Vec<SubnetTopology> = SubnetTopology::ALL
        .into_iter()
        .filter(|&topology| {
            !subnets.of(topology).is_empty()
                || (topology == SubnetTopology::Private && spec.has_private_node_groups())
        })
        .collect();

    if required.is_empty() {
        return Err(Error::insufficient_resources("no subnets were given"));
    }

    for topology in required {
        let covered = zones_of(subnets, &[topology]);
        if covered.len() < MIN_REQUIRED_ZONES {
            return Err(Error::insufficient_resources(format!(
                "{topology} subnets cover {} availability zone(s) {:?}, at least {} are required",
                covered.len(),
                covered,
                MIN_REQUIRED_ZONES
            )));
        }

        let missing: Vec<&String> = spec
            .availability_zones
            .iter()
            .filter(|zone| !covered.contains(zone))
            .collect();
        if !missing.is_empty() {
            return Err(Error::insufficient_resources(format!(
                "{topology} subnets do not cover availability zone(s) {missing:?}"
            )));
        }
    }
    Ok(())
}

/// Private node groups need private subnets
pub fn check_private_node_groups(spec: &ClusterSpec, subnets: &SubnetsSpec) -> Result<()> {
    if spec.has_private_node_groups() && subnets.private.is_empty() {
        return Err(Error::insufficient_resources(
            "node groups with private networking need private subnets, but none are available",
        ));
    }
    Ok(())
}

/// Split `cidr` into equal blocks and assign them to `zones`.
///
/// Zone `i` gets public block `i` and private block `i + zones.len()`.
pub fn derive_subnets(cidr: &str, zones: &[String]) -> Result<SubnetsSpec> {
    let max_zones = SUBNET_BLOCKS / 2;
    if zones.len() > max_zones {
        return Err(Error::insufficient_resources(format!(
            "{} availability zones need {} subnets, but {} provides only {}; use at most {} zones",
            zones.len(),
            zones.len() * 2,
            cidr,
            SUBNET_BLOCKS,
            max_zones
        )));
    }

    let (network, prefix) = parse_cidr(cidr)?;
    let block_bits = SUBNET_BLOCKS.trailing_zeros();
    let block_prefix = prefix + block_bits;
    if block_prefix > 32 {
        return Err(Error::validation(format!(
            "CIDR {cidr} is too small to split into {SUBNET_BLOCKS} subnets"
        )));
    }
    let block_size: u64 = 1 << (32 - block_prefix);
    let block = |index: usize| -> String {
        let start = u64::from(network) + block_size * index as u64;
        // start stays inside the original range, which fits in u32
        format!("{}/{}", Ipv4Addr::from(start as u32), block_prefix)
    };

    let mut subnets = SubnetsSpec::default();
    for (i, zone) in zones.iter().enumerate() {
        subnets.public.push(SubnetSpec {
            id: None,
            cidr: Some(block(i)),
            availability_zone: Some(zone.clone()),
        });
        subnets.private.push(SubnetSpec {
            id: None,
            cidr: Some(block(i + zones.len())),
            availability_zone: Some(zone.clone()),
        });
    }
    Ok(subnets)
}

/// Parse `a.b.c.d/len` into the masked network address and prefix length
fn parse_cidr(cidr: &str) -> Result<(u32, u32)> {
    let invalid = || Error::validation(format!("invalid CIDR {cidr:?}"));

    let (address, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    let address: Ipv4Addr = address.trim().parse().map_err(|_| invalid())?;
    let prefix: u32 = prefix.trim().parse().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }

    let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
    Ok((u32::from(address) & mask, prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeforge_config::{ClusterMeta, NodeGroup, NodeGroupBase};
    use kubeforge_provider::{MockNetworkApi, NetworkLayout, Subnet};

    fn zones(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn spec() -> ClusterSpec {
        ClusterSpec {
            metadata: ClusterMeta {
                name: "demo".to_string(),
                region: "us-west-2".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn private_node_group() -> NodeGroup {
        NodeGroup {
            base: NodeGroupBase {
                name: "ng-private".to_string(),
                private_networking: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn described(id: &str, zone: &str) -> Subnet {
        Subnet {
            id: id.to_string(),
            vpc_id: "vpc-123".to_string(),
            cidr: "10.0.0.0/24".to_string(),
            availability_zone: zone.to_string(),
        }
    }

    fn assert_conflict(err: Error, expected_first: &str, expected_second: &str) {
        match err {
            Error::ConfigurationConflict { first, second } => {
                assert_eq!(first, expected_first);
                assert_eq!(second, expected_second);
            }
            other => panic!("expected a configuration conflict, got {other:?}"),
        }
    }

    #[test]
    fn derive_is_selected_without_network_inputs() {
        assert_eq!(
            select_mode(&spec(), &CreateParams::default()).unwrap(),
            NetworkMode::Derive
        );
    }

    #[tokio::test]
    async fn source_cluster_with_cidr_conflicts_without_provider_calls() {
        let params = CreateParams {
            source_cluster: Some("other".to_string()),
            vpc_cidr: Some("10.0.0.0/16".to_string()),
            ..Default::default()
        };
        // no expectations: any call would panic
        let api = MockNetworkApi::new();

        let err = resolve_network(&spec(), &params, &api).await.unwrap_err();
        assert_conflict(err, "--vpc-from-cluster", "--vpc-cidr");
    }

    #[test]
    fn source_cluster_conflicts_with_zones_and_subnets() {
        let with_zones = CreateParams {
            source_cluster: Some("other".to_string()),
            zones: zones(&["a", "b"]),
            ..Default::default()
        };
        assert_conflict(
            select_mode(&spec(), &with_zones).unwrap_err(),
            "--vpc-from-cluster",
            "--zones",
        );

        let with_subnets = CreateParams {
            source_cluster: Some("other".to_string()),
            private_subnet_ids: zones(&["subnet-1"]),
            ..Default::default()
        };
        assert_conflict(
            select_mode(&spec(), &with_subnets).unwrap_err(),
            "--vpc-from-cluster",
            "--vpc-private-subnets/--vpc-public-subnets",
        );
    }

    #[test]
    fn subnets_conflict_with_zones_and_cidr() {
        let with_zones = CreateParams {
            public_subnet_ids: zones(&["subnet-1"]),
            zones: zones(&["a", "b"]),
            ..Default::default()
        };
        assert_conflict(
            select_mode(&spec(), &with_zones).unwrap_err(),
            "--vpc-private-subnets/--vpc-public-subnets",
            "--zones",
        );

        let mut from_file = spec();
        from_file.vpc.subnets.public.push(SubnetSpec::with_id("subnet-1"));
        let with_cidr = CreateParams {
            vpc_cidr: Some("10.0.0.0/16".to_string()),
            ..Default::default()
        };
        assert_conflict(
            select_mode(&from_file, &with_cidr).unwrap_err(),
            "--vpc-private-subnets/--vpc-public-subnets",
            "--vpc-cidr",
        );
    }

    #[tokio::test]
    async fn subnets_missing_a_required_zone_are_insufficient() {
        let mut spec = spec();
        spec.availability_zones = zones(&["us-west-2a", "us-west-2b", "us-west-2c"]);
        let params = CreateParams {
            public_subnet_ids: zones(&["subnet-a", "subnet-b"]),
            ..Default::default()
        };

        let mut api = MockNetworkApi::new();
        api.expect_describe_subnets().times(1).returning(|_| {
            Ok(vec![
                described("subnet-a", "us-west-2a"),
                described("subnet-b", "us-west-2b"),
            ])
        });
        api.expect_available_zones().never();
        api.expect_import_cluster_network().never();

        let err = resolve_network(&spec, &params, &api).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientResources { .. }), "{err:?}");
        assert!(err.to_string().contains("us-west-2c"));
    }

    #[tokio::test]
    async fn imported_subnets_resolve_vpc_and_zones() {
        let params = CreateParams {
            private_subnet_ids: zones(&["subnet-a", "subnet-b"]),
            public_subnet_ids: zones(&["subnet-c", "subnet-d"]),
            ..Default::default()
        };
        let mut api = MockNetworkApi::new();
        api.expect_describe_subnets()
            .times(2)
            .returning(|ids: &[String]| {
                Ok(ids
                    .iter()
                    .enumerate()
                    .map(|(i, id)| described(id, if i == 0 { "us-west-2a" } else { "us-west-2b" }))
                    .collect())
            });

        let resolution = resolve_network(&spec(), &params, &api).await.unwrap();
        let NetworkResolution::Resolved(network) = resolution else {
            panic!("expected a resolved network");
        };
        assert_eq!(network.mode, NetworkMode::ImportSubnets);
        assert_eq!(network.vpc.id.as_deref(), Some("vpc-123"));
        assert_eq!(network.vpc.cidr, None);
        assert_eq!(network.availability_zones, zones(&["us-west-2a", "us-west-2b"]));
        assert_eq!(network.vpc.subnets.private.len(), 2);
    }

    #[tokio::test]
    async fn subnets_from_different_vpcs_are_rejected() {
        let params = CreateParams {
            public_subnet_ids: zones(&["subnet-a", "subnet-b"]),
            ..Default::default()
        };
        let mut api = MockNetworkApi::new();
        api.expect_describe_subnets().returning(|_| {
            let mut other = described("subnet-b", "us-west-2b");
            other.vpc_id = "vpc-999".to_string();
            Ok(vec![described("subnet-a", "us-west-2a"), other])
        });

        let err = resolve_network(&spec(), &params, &api).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn dry_run_resolves_zones_but_allocates_nothing() {
        let params = CreateParams {
            dry_run: true,
            ..Default::default()
        };
        let mut api = MockNetworkApi::new();
        api.expect_available_zones()
            .times(1)
            .returning(|_| Ok(zones(&["us-west-2a", "us-west-2b", "us-west-2c", "us-west-2d"])));

        let resolution = resolve_network(&spec(), &params, &api).await.unwrap();
        assert_eq!(
            resolution,
            NetworkResolution::DryRun {
                mode: NetworkMode::Derive,
                availability_zones: zones(&["us-west-2a", "us-west-2b", "us-west-2c"]),
            }
        );
    }

    #[tokio::test]
    async fn dry_run_import_makes_no_provider_calls() {
        let params = CreateParams {
            dry_run: true,
            source_cluster: Some("other".to_string()),
            ..Default::default()
        };
        let api = MockNetworkApi::new();

        let resolution = resolve_network(&spec(), &params, &api).await.unwrap();
        assert_eq!(
            resolution.mode(),
            &NetworkMode::ImportFromCluster {
                source: "other".to_string()
            }
        );
    }

    #[tokio::test]
    async fn derive_rejects_a_single_explicit_zone() {
        let params = CreateParams {
            zones: zones(&["us-west-2a"]),
            ..Default::default()
        };
        let api = MockNetworkApi::new();

        let err = resolve_network(&spec(), &params, &api).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn region_with_one_zone_is_insufficient() {
        let mut api = MockNetworkApi::new();
        api.expect_available_zones()
            .returning(|_| Ok(zones(&["us-west-2a"])));

        let err = resolve_network(&spec(), &CreateParams::default(), &api)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientResources { .. }));
    }

    #[tokio::test]
    async fn cluster_import_without_private_subnets_rejects_private_node_groups() {
        let mut spec = spec();
        spec.node_groups.push(private_node_group());
        let params = CreateParams {
            source_cluster: Some("other".to_string()),
            ..Default::default()
        };
        let mut api = MockNetworkApi::new();
        api.expect_import_cluster_network()
            .withf(|source| source == "other")
            .returning(|_| {
                Ok(NetworkLayout {
                    vpc_id: "vpc-1".to_string(),
                    cidr: Some("10.0.0.0/16".to_string()),
                    subnets: SubnetsSpec {
                        private: Vec::new(),
                        public: vec![SubnetSpec::with_id("subnet-1")],
                    },
                })
            });

        let err = resolve_network(&spec, &params, &api).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientResources { .. }));
    }

    #[test]
    fn derived_subnets_split_cidr_into_eight_blocks() {
        let subnets = derive_subnets(DEFAULT_VPC_CIDR, &zones(&["a", "b", "c"])).unwrap();

        let public: Vec<_> = subnets.public.iter().filter_map(|s| s.cidr.clone()).collect();
        let private: Vec<_> = subnets.private.iter().filter_map(|s| s.cidr.clone()).collect();
        assert_eq!(
            public,
            vec!["192.168.0.0/19", "192.168.32.0/19", "192.168.64.0/19"]
        );
        assert_eq!(
            private,
            vec!["192.168.96.0/19", "192.168.128.0/19", "192.168.160.0/19"]
        );
        assert_eq!(subnets.private[2].availability_zone.as_deref(), Some("c"));
    }

    #[test]
    fn derived_subnets_reject_more_than_four_zones() {
        let err = derive_subnets(DEFAULT_VPC_CIDR, &zones(&["a", "b", "c", "d", "e"])).unwrap_err();
        assert!(matches!(err, Error::InsufficientResources { .. }));
        assert!(derive_subnets(DEFAULT_VPC_CIDR, &zones(&["a", "b", "c", "d"])).is_ok());
    }

    #[test]
    fn cidr_host_bits_are_masked() {
        assert_eq!(
            parse_cidr("10.1.2.3/16").unwrap(),
            (u32::from(Ipv4Addr::new(10, 1, 0, 0)), 16)
        );
        assert!(parse_cidr("10.0.0.0").is_err());
        assert!(parse_cidr("10.0.0.0/33").is_err());
        assert!(derive_subnets("10.0.0.0/30", &zones(&["a", "b"])).is_err());
    }
}
