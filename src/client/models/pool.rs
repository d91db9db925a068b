//! Pool index and detail models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Probe, lenient_string};

/// One entry of the pool index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSummary {
    /// Pool (system) ID
    #[serde(
        rename = "idSystem",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_system: Option<String>,

    /// User-facing pool name
    #[serde(
        rename = "poolNickname",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub pool_nickname: Option<String>,

    /// Remaining index fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PoolSummary {
    /// Build from a raw index element; non-object elements yield an empty summary.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// `(id, nickname)` when both are present and non-empty
    pub fn identity(&self) -> Option<(&str, &str)> {
        let id = self.id_system.as_deref().filter(|s| !s.is_empty())?;
        let name = self.pool_nickname.as_deref().filter(|s| !s.is_empty())?;
        Some((id, name))
    }
}

/// Detail blob for one pool. Only the probe list is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolDetail(pub Value);

impl PoolDetail {
    /// Probes listed in the detail blob.
    ///
    /// A missing or non-list `probes` field yields no probes.
    pub fn probes(&self) -> Vec<Probe> {
        self.0
            .get("probes")
            .and_then(Value::as_array)
            .map(|probes| probes.iter().cloned().map(Probe::from_value).collect())
            .unwrap_or_default()
    }
}
