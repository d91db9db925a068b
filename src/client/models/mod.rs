//! Klereo API data models

mod auth;
mod pool;
mod probe;

pub use auth::Credentials;
pub use pool::{PoolDetail, PoolSummary};
pub use probe::Probe;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept strings, numbers and booleans as an optional string.
///
/// Klereo sends ids as numbers in some payloads and strings in others.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
