//! Adapters binding [`diamond_upgrade`] to a live chain and to compiled
//! contract artifacts.
mod artifact;
pub mod config;
mod reader;

pub use artifact::{ArtifactError, ArtifactInterfaceProvider};
pub use config::UpgradeConfig;
pub use reader::{connect, ChainReader};
