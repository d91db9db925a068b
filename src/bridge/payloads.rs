//! Request bodies for the Home Assistant registries

use serde::Serialize;
use serde_json::Value;

use super::mapping::{NAMESPACE, ProbeEntity, device_id};

/// Device-registry entry for one pool
#[derive(Debug, Serialize)]
pub struct DevicePayload {
    pub device_id: String,
    pub name: String,
    pub model: &'static str,
    pub manufacturer: &'static str,
    pub sw_version: &'static str,
    pub identifiers: Vec<[String; 2]>,
    pub via_device: String,
}

impl DevicePayload {
    pub fn new(pool_id: &str, pool_name: &str) -> Self {
        let device_id = device_id(pool_id);
        Self {
            identifiers: vec![[device_id.clone(), pool_id.to_string()]],
            device_id,
            name: format!("Klereo Pool: {}", pool_name),
            model: "Klereo Pool System",
            manufacturer: "Klereo",
            sw_version: env!("CARGO_PKG_VERSION"),
            via_device: format!("{}_addon", NAMESPACE),
        }
    }
}

/// Entity-registry entry for one probe
#[derive(Debug, Serialize)]
pub struct EntityPayload {
    pub entity_id: String,
    pub name: String,
    pub device_id: String,
    pub state_class: &'static str,
    pub unit_of_measurement: String,
    pub device_class: Option<&'static str>,
    pub icon: &'static str,
    pub unique_id: String,
}

impl From<&ProbeEntity> for EntityPayload {
    fn from(entity: &ProbeEntity) -> Self {
        Self {
            entity_id: entity.entity_id.clone(),
            name: entity.name().to_string(),
            device_id: entity.device_id.clone(),
            state_class: "measurement",
            unit_of_measurement: entity.unit().to_string(),
            device_class: entity.kind.device_class(),
            icon: entity.kind.icon(),
            unique_id: entity.unique_id.clone(),
        }
    }
}

/// State update for one probe
#[derive(Debug, Serialize)]
pub struct StatePayload {
    pub entity_id: String,
    pub state: Value,
    pub attributes: StateAttributes,
}

#[derive(Debug, Serialize)]
pub struct StateAttributes {
    pub unit_of_measurement: String,
    pub friendly_name: String,
    pub device_class: Option<&'static str>,
    pub last_updated: String,
}

impl StatePayload {
    /// A probe without a reading reports 0
    pub fn new(entity: &ProbeEntity, last_updated: String) -> Self {
        let state = match &entity.probe.filtered_value {
            Some(value) if !value.is_null() => value.clone(),
            _ => Value::from(0),
        };

        Self {
            entity_id: entity.entity_id.clone(),
            state,
            attributes: StateAttributes {
                unit_of_measurement: entity.unit().to_string(),
                friendly_name: entity.name().to_string(),
                device_class: entity.kind.device_class(),
                last_updated,
            },
        }
    }
}
