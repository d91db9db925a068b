//! Mock pool source for testing
//!
//! Provides a mock implementation of [`PoolSource`] for unit testing the
//! bridge without a Klereo server.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::PoolSource;
use super::models::Probe;
use crate::error::{ApiError, Result};

/// Mock pool source.
///
/// Configure responses via builder methods, then hand it to the bridge.
#[derive(Default)]
pub struct MockPoolSource {
    /// Pools to return from get_pools; `None` simulates "no data"
    pools: Arc<Mutex<Option<BTreeMap<String, String>>>>,
    /// Probes per pool id
    probes: Arc<Mutex<HashMap<String, Vec<Probe>>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks calls for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub get_pools: usize,
    pub get_pool_probes: usize,
}

impl MockPoolSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(self, pool_id: &str, name: &str, probes: Vec<Probe>) -> Self {
        {
            let mut pools = self.pools.try_lock().expect("unshared mock");
            pools
                .get_or_insert_with(BTreeMap::new)
                .insert(pool_id.to_string(), name.to_string());
        }
        self.probes
            .try_lock()
            .expect("unshared mock")
            .insert(pool_id.to_string(), probes);
        self
    }

    /// Replace a pool's probes after construction
    pub async fn set_probes(&self, pool_id: &str, probes: Vec<Probe>) {
        self.probes.lock().await.insert(pool_id.to_string(), probes);
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }
}

/// Probe fixture
pub fn probe(logical_id: &str, name: &str, value: f64, unit: &str) -> Probe {
    Probe {
        logical_id: Some(logical_id.to_string()),
        name: Some(name.to_string()),
        filtered_value: Some(serde_json::json!(value)),
        unit: Some(unit.to_string()),
        probe_type: None,
    }
}

#[async_trait]
impl PoolSource for MockPoolSource {
    async fn get_pools(&self) -> Result<BTreeMap<String, String>> {
        self.call_count.lock().await.get_pools += 1;

        self.pools.lock().await.clone().ok_or_else(|| {
            ApiError::MaintenanceSuppressed { from: 130, to: 135 }.into()
        })
    }

    async fn get_pool_probes(&self, pool_id: &str) -> Result<Vec<Probe>> {
        self.call_count.lock().await.get_pool_probes += 1;

        self.probes
            .lock()
            .await
            .get(pool_id)
            .cloned()
            .ok_or_else(|| ApiError::protocol("GetPoolDetails.php", "unknown pool").into())
    }
}
