//! Klereo probe -> Home Assistant naming and classification

use crate::client::Probe;

/// Prefix shared by every id this bridge creates
pub const NAMESPACE: &str = "klereo";

/// Home Assistant device id for a pool
pub fn device_id(pool_id: &str) -> String {
    format!("{}_pool_{}", NAMESPACE, pool_id)
}

/// Lower-case, spaces and hyphens to underscores
pub fn sanitize(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

/// Home Assistant entity id for a pool probe
pub fn entity_id(pool_id: &str, probe_name: &str) -> String {
    format!("sensor.{}_{}_{}", NAMESPACE, pool_id, sanitize(probe_name))
}

/// What a probe measures, guessed from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Temperature,
    Ph,
    Chlorine,
    Redox,
    WaterLevel,
    Generic,
}

impl ProbeKind {
    /// Classify by substring of the lower-cased name. First match wins.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

        if has(&["temperature", "temp"]) {
            ProbeKind::Temperature
        } else if has(&["ph"]) {
            ProbeKind::Ph
        } else if has(&["chlorine", "cl"]) {
            ProbeKind::Chlorine
        } else if has(&["orp", "redox"]) {
            ProbeKind::Redox
        } else if has(&["level", "water"]) {
            ProbeKind::WaterLevel
        } else {
            ProbeKind::Generic
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ProbeKind::Temperature => "mdi:thermometer",
            ProbeKind::Ph => "mdi:ph",
            ProbeKind::Chlorine => "mdi:water-percent",
            ProbeKind::Redox => "mdi:alpha-r-circle",
            ProbeKind::WaterLevel => "mdi:waves",
            ProbeKind::Generic => "mdi:gauge",
        }
    }

    /// Only temperature has a matching Home Assistant device class
    pub fn device_class(self) -> Option<&'static str> {
        match self {
            ProbeKind::Temperature => Some("temperature"),
            _ => None,
        }
    }
}

/// A probe resolved to its Home Assistant identity
#[derive(Debug, Clone)]
pub struct ProbeEntity {
    pub pool_id: String,
    pub device_id: String,
    pub entity_id: String,
    pub unique_id: String,
    pub kind: ProbeKind,
    pub probe: Probe,
}

impl ProbeEntity {
    /// Resolve a probe. Probes without a name cannot be addressed and yield `None`.
    pub fn new(pool_id: &str, probe: &Probe) -> Option<Self> {
        let name = probe.name.as_deref().filter(|n| !n.is_empty())?;

        let unique_suffix = match probe.logical_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => sanitize(name),
        };

        Some(Self {
            pool_id: pool_id.to_string(),
            device_id: device_id(pool_id),
            entity_id: entity_id(pool_id, name),
            unique_id: format!("{}_{}_{}", NAMESPACE, pool_id, unique_suffix),
            kind: ProbeKind::from_name(name),
            probe: probe.clone(),
        })
    }

    pub fn name(&self) -> &str {
        self.probe.name.as_deref().unwrap_or_default()
    }

    pub fn unit(&self) -> &str {
        self.probe.unit.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_id() {
        assert_eq!(device_id("1234"), "klereo_pool_1234");
    }

    #[test]
    fn test_entity_id_sanitizes_name() {
        assert_eq!(
            entity_id("1234", "Water Temp-Sensor"),
            "sensor.klereo_1234_water_temp_sensor"
        );
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ProbeKind::from_name("Water Temperature"), ProbeKind::Temperature);
        assert_eq!(ProbeKind::from_name("pH"), ProbeKind::Ph);
        assert_eq!(ProbeKind::from_name("Chlorine"), ProbeKind::Chlorine);
        assert_eq!(ProbeKind::from_name("ORP"), ProbeKind::Redox);
        assert_eq!(ProbeKind::from_name("Level"), ProbeKind::WaterLevel);
        assert_eq!(ProbeKind::from_name("Pressure"), ProbeKind::Generic);
    }

    #[test]
    fn test_first_rule_wins() {
        // "water temp" hits the temperature rule before the water rule
        assert_eq!(ProbeKind::from_name("water temp"), ProbeKind::Temperature);
    }

    #[test]
    fn test_icons_and_device_class() {
        assert_eq!(ProbeKind::Temperature.icon(), "mdi:thermometer");
        assert_eq!(ProbeKind::Temperature.device_class(), Some("temperature"));
        assert_eq!(ProbeKind::Ph.icon(), "mdi:ph");
        assert_eq!(ProbeKind::Ph.device_class(), None);
        assert_eq!(ProbeKind::Generic.icon(), "mdi:gauge");
    }

    #[test]
    fn test_probe_entity() {
        let probe = Probe::from_value(json!({"logicalId": 3, "name": "Redox", "unit": "mV"}));
        let entity = ProbeEntity::new("A", &probe).unwrap();

        assert_eq!(entity.device_id, "klereo_pool_A");
        assert_eq!(entity.entity_id, "sensor.klereo_A_redox");
        assert_eq!(entity.unique_id, "klereo_A_3");
        assert_eq!(entity.kind, ProbeKind::Redox);
        assert_eq!(entity.unit(), "mV");
    }

    #[test]
    fn test_probe_entity_without_logical_id() {
        let probe = Probe::from_value(json!({"name": "Filter Pressure"}));
        let entity = ProbeEntity::new("A", &probe).unwrap();
        assert_eq!(entity.unique_id, "klereo_A_filter_pressure");
    }

    #[test]
    fn test_unnamed_probe_is_unaddressable() {
        let probe = Probe::from_value(json!({"logicalId": 1}));
        assert!(ProbeEntity::new("A", &probe).is_none());
    }
}
