//! Task variants used in provisioning plans
//!
//! Each variant wraps one provider call. Variants hold everything they need
//! (shared specification, provider handle) so the engine can run them on
//! any worker.

mod addons;
mod cluster;
mod nodes;
mod stacks;

pub use addons::CreateAddonTask;
pub use cluster::{AssociateOidcProviderTask, CreateFargateProfileTask};
pub use nodes::{AuthorizeNodeGroupTask, WaitForNodesTask};
pub use stacks::{CreateClusterStackTask, CreateManagedNodeGroupTask, CreateNodeGroupStackTask};
