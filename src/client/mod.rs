//! Klereo API client

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

pub mod klereo;
pub mod maintenance;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rate_limit;

pub use klereo::KlereoClient;
pub use maintenance::MaintenanceSchedule;
pub use models::{Credentials, Probe};

/// Read side of the Klereo API the Home Assistant bridge depends on
#[async_trait]
pub trait PoolSource: Send + Sync {
    /// Pools as `{pool_id: pool_nickname}`
    async fn get_pools(&self) -> Result<BTreeMap<String, String>>;

    /// Probes of one pool
    async fn get_pool_probes(&self, pool_id: &str) -> Result<Vec<Probe>>;
}
