//! Home Assistant integration for Klereo pools
//!
//! Discovers pools and probes through a [`PoolSource`] and republishes them as
//! Home Assistant devices, sensor entities and states. Missing Klereo data is
//! never fatal: it just means there is nothing new to publish this round.

pub mod homeassistant;
pub mod mapping;
pub mod payloads;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::client::{PoolSource, Probe};
use crate::error::Result;
pub use homeassistant::HomeAssistantClient;
use mapping::{ProbeEntity, device_id};
use payloads::{DevicePayload, EntityPayload, StatePayload};

/// Outcome of a registration call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyRegistered,
}

/// Counters for one discovery or update pass
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncReport {
    pub pools_seen: usize,
    pub pools_registered: usize,
    pub sensors_registered: usize,
    pub states_updated: usize,
    pub failures: usize,
}

#[derive(Debug, Clone)]
struct RegisteredDevice {
    pool_name: String,
    registered_at: DateTime<Local>,
}

/// Publishes Klereo pools into Home Assistant
pub struct IntegrationBridge<P: PoolSource> {
    source: Arc<P>,
    hass: HomeAssistantClient,
    registered_devices: HashMap<String, RegisteredDevice>,
    /// Entity id to owning pool id
    registered_entities: HashMap<String, String>,
}

impl<P: PoolSource> IntegrationBridge<P> {
    pub fn new(source: Arc<P>, hass: HomeAssistantClient) -> Self {
        Self {
            source,
            hass,
            registered_devices: HashMap::new(),
            registered_entities: HashMap::new(),
        }
    }

    pub fn is_device_registered(&self, pool_id: &str) -> bool {
        self.registered_devices.contains_key(&device_id(pool_id))
    }

    pub fn is_entity_registered(&self, entity_id: &str) -> bool {
        self.registered_entities.contains_key(entity_id)
    }

    pub fn registered_entity_count(&self) -> usize {
        self.registered_entities.len()
    }

    /// Register a pool as a device. Known devices are a no-op.
    pub async fn register_device(&mut self, pool_id: &str, pool_name: &str) -> Result<Registration> {
        let device_id = device_id(pool_id);
        if self.registered_devices.contains_key(&device_id) {
            return Ok(Registration::AlreadyRegistered);
        }

        let payload = DevicePayload::new(pool_id, pool_name);
        if let Err(err) = self.hass.post("device_registry", &payload).await {
            error!("Failed to register device {}: {}", pool_name, err);
            return Err(err.into());
        }

        self.registered_devices.insert(
            device_id.clone(),
            RegisteredDevice {
                pool_name: pool_name.to_string(),
                registered_at: Local::now(),
            },
        );
        info!("Device registered: {} (ID: {})", pool_name, device_id);
        Ok(Registration::Created)
    }

    /// Register a probe as a sensor entity. Known entities are a no-op.
    pub async fn register_sensor_entity(&mut self, entity: &ProbeEntity) -> Result<Registration> {
        if self.registered_entities.contains_key(&entity.entity_id) {
            return Ok(Registration::AlreadyRegistered);
        }

        let payload = EntityPayload::from(entity);
        if let Err(err) = self.hass.post("entity_registry", &payload).await {
            error!("Failed to register sensor {}: {}", entity.name(), err);
            return Err(err.into());
        }

        self.registered_entities
            .insert(entity.entity_id.clone(), entity.pool_id.clone());
        info!("Sensor registered: {} (ID: {})", entity.name(), entity.entity_id);
        Ok(Registration::Created)
    }

    /// Push a probe reading, registering its entity first when unknown
    pub async fn update_sensor_state(&mut self, entity: &ProbeEntity) -> Result<()> {
        if !self.registered_entities.contains_key(&entity.entity_id) {
            self.register_sensor_entity(entity).await?;
        }

        let payload = StatePayload::new(entity, Local::now().to_rfc3339());
        let endpoint = format!("states/{}", entity.entity_id);
        if let Err(err) = self.hass.post(&endpoint, &payload).await {
            error!("Failed to update state {}: {}", entity.name(), err);
            return Err(err.into());
        }

        debug!(
            "State updated: {} = {}",
            entity.name(),
            entity.probe.value_display()
        );
        Ok(())
    }

    /// Discover all pools and register them with their sensors
    pub async fn discover_and_register_pools(&mut self) -> SyncReport {
        let mut report = SyncReport::default();

        let Some(pools) = self.fetch_pools().await else {
            return report;
        };

        for (pool_id, pool_name) in &pools {
            report.pools_seen += 1;

            if self.register_device(pool_id, pool_name).await.is_err() {
                report.failures += 1;
                continue;
            }
            report.pools_registered += 1;

            for entity in self.fetch_entities(pool_id).await {
                match self.register_sensor_entity(&entity).await {
                    Ok(Registration::Created) => report.sensors_registered += 1,
                    Ok(Registration::AlreadyRegistered) => {}
                    Err(_) => report.failures += 1,
                }
            }
        }

        info!(
            "Successfully registered {}/{} pools",
            report.pools_registered, report.pools_seen
        );
        report
    }

    /// Push the latest reading of every probe of every pool.
    ///
    /// Pools that appeared since the last discovery are registered on the way.
    pub async fn update_all_sensors(&mut self) -> SyncReport {
        let mut report = SyncReport::default();

        let Some(pools) = self.fetch_pools().await else {
            return report;
        };

        for (pool_id, pool_name) in &pools {
            report.pools_seen += 1;

            match self.register_device(pool_id, pool_name).await {
                Ok(Registration::Created) => report.pools_registered += 1,
                Ok(Registration::AlreadyRegistered) => {}
                Err(_) => {
                    report.failures += 1;
                    continue;
                }
            }

            for entity in self.fetch_entities(pool_id).await {
                let known = self.is_entity_registered(&entity.entity_id);
                match self.update_sensor_state(&entity).await {
                    Ok(()) => {
                        report.states_updated += 1;
                        if !known {
                            report.sensors_registered += 1;
                        }
                    }
                    Err(_) => report.failures += 1,
                }
            }
        }

        debug!("Updated {} sensors", report.states_updated);
        report
    }

    /// Test the Home Assistant connection. Never fails.
    pub async fn test_ha_connection(&self) -> bool {
        match self.hass.get("config").await {
            Ok(_) => {
                info!("Home Assistant connection test successful");
                true
            }
            Err(err) => {
                error!("Home Assistant connection test failed: {}", err);
                false
            }
        }
    }

    /// Pool name and registration time per registered device id
    pub fn registered_devices(&self) -> impl Iterator<Item = (&str, &str, DateTime<Local>)> {
        self.registered_devices
            .iter()
            .map(|(id, d)| (id.as_str(), d.pool_name.as_str(), d.registered_at))
    }

    async fn fetch_pools(&self) -> Option<BTreeMap<String, String>> {
        match self.source.get_pools().await {
            Ok(pools) if pools.is_empty() => {
                warn!("No pools found");
                None
            }
            Ok(pools) => Some(pools),
            Err(err) if err.is_no_data() => {
                warn!("No pools found: {}", err);
                None
            }
            Err(err) => {
                error!("Failed to list pools: {}", err);
                None
            }
        }
    }

    async fn fetch_entities(&self, pool_id: &str) -> Vec<ProbeEntity> {
        let probes: Vec<Probe> = match self.source.get_pool_probes(pool_id).await {
            Ok(probes) => probes,
            Err(err) => {
                warn!("No probe data for pool {}: {}", pool_id, err);
                return Vec::new();
            }
        };

        probes
            .iter()
            .filter_map(|probe| {
                let entity = ProbeEntity::new(pool_id, probe);
                if entity.is_none() {
                    warn!("Skipping unnamed probe in pool {}", pool_id);
                }
                entity
            })
            .collect()
    }
}
