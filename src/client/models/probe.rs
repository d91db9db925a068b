//! Probe (sensor) models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient_string;

/// A sensor reading extracted from a pool's detail blob.
///
/// Every field is optional; upstream payloads are not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    #[serde(rename = "logicalId", default, deserialize_with = "lenient_string")]
    pub logical_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Latest filtered reading, number or string as sent upstream
    #[serde(rename = "filteredValue", default)]
    pub filtered_value: Option<Value>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub probe_type: Option<String>,
}

impl Probe {
    /// Build from a raw probe element; non-object elements yield an empty probe.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The reading rendered for display or as a Home Assistant state
    pub fn value_display(&self) -> String {
        match &self.filtered_value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_to_none() {
        let probe = Probe::from_value(json!({}));
        assert_eq!(probe, Probe::default());
    }

    #[test]
    fn test_non_object_probe() {
        let probe = Probe::from_value(json!(42));
        assert_eq!(probe, Probe::default());
    }

    #[test]
    fn test_value_display() {
        let probe = Probe::from_value(json!({"filteredValue": 7.2}));
        assert_eq!(probe.value_display(), "7.2");

        let probe = Probe::from_value(json!({"filteredValue": "650"}));
        assert_eq!(probe.value_display(), "650");

        let probe = Probe::from_value(json!({"filteredValue": null}));
        assert_eq!(probe.value_display(), "");
    }
}
