use clap::{Args, Subcommand};
use kubeforge_config::CreateParams;
use kubeforge_core::{OutputSink, Result};
use std::path::PathBuf;

pub mod plan;
pub mod validate;

#[derive(Subcommand)]
pub enum Commands {
    /// Check a cluster spec file and resolve its Kubernetes version
    Validate {
        /// Path to the cluster spec (YAML or JSON)
        #[arg(short = 'f', long = "config-file")]
        config_file: PathBuf,
    },

    /// Show the tasks that creating the cluster would run
    Plan {
        /// Path to the cluster spec (YAML or JSON)
        #[arg(short = 'f', long = "config-file")]
        config_file: PathBuf,

        #[command(flatten)]
        flags: PlanFlags,
    },
}

/// Flags shared with cluster creation that influence the plan
#[derive(Args, Debug, Default)]
pub struct PlanFlags {
    /// Availability zones to use (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub zones: Vec<String>,

    /// Global CIDR for a new VPC
    #[arg(long = "vpc-cidr")]
    pub vpc_cidr: Option<String>,

    /// Existing private subnet IDs (comma separated)
    #[arg(long = "vpc-private-subnets", value_delimiter = ',')]
    pub private_subnets: Vec<String>,

    /// Existing public subnet IDs (comma separated)
    #[arg(long = "vpc-public-subnets", value_delimiter = ',')]
    pub public_subnets: Vec<String>,

    /// Reuse the network of another cluster
    #[arg(long = "vpc-from-cluster")]
    pub vpc_from_cluster: Option<String>,

    /// Add a default Fargate profile for the default and kube-system namespaces
    #[arg(long)]
    pub fargate: bool,

    /// Print the effective spec with resolved zones instead of the plan
    #[arg(long)]
    pub dry_run: bool,
}

impl PlanFlags {
    pub fn to_params(&self) -> CreateParams {
        CreateParams {
            dry_run: self.dry_run,
            zones: self.zones.clone(),
            private_subnet_ids: self.private_subnets.clone(),
            public_subnet_ids: self.public_subnets.clone(),
            source_cluster: self.vpc_from_cluster.clone(),
            vpc_cidr: self.vpc_cidr.clone(),
            fargate: self.fargate,
            ..Default::default()
        }
    }
}

impl Commands {
    pub async fn execute(self, output: &OutputSink) -> Result<()> {
        match self {
            Commands::Validate { config_file } => validate::execute(&config_file, output),
            Commands::Plan { config_file, flags } => {
                plan::execute(&config_file, flags.to_params(), output).await
            }
        }
    }
}
