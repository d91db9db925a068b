//! Keyed in-memory storage with per-entry expiry

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::CacheKey;
use crate::clock::Clock;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// In-memory cache storage.
///
/// Not synchronised; the owner wraps it in a lock when shared.
pub struct CacheStorage {
    entries: HashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl CacheStorage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Get cached data if valid. Expired entries are evicted on read.
    pub fn get(&mut self, key: &CacheKey) -> Option<Value> {
        let key = key.to_string();
        let now = self.clock.now();

        match self.entries.get(&key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                log::debug!("Cache entry {} expired", key);
                self.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store data with TTL, replacing any previous entry under the same key
    pub fn put(&mut self, key: &CacheKey, value: Value, ttl: Duration) {
        let now = self.clock.now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: now,
                expires_at,
            },
        );
    }

    /// Clear all cache entries
    pub fn clear_all(&mut self) -> ClearStats {
        let entries_removed = self.entries.len();
        self.entries.clear();
        ClearStats { entries_removed }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let valid: Vec<&CacheEntry> = self
            .entries
            .values()
            .filter(|e| e.expires_at > now)
            .collect();

        CacheStats {
            total_entries: self.entries.len(),
            valid_entries: valid.len(),
            expired_entries: self.entries.len() - valid.len(),
            oldest_entry: valid.iter().map(|e| e.created_at).min(),
            newest_entry: valid.iter().map(|e| e.created_at).max(),
        }
    }
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Statistics about cache state
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheTtl;
    use crate::clock::ManualClock;
    use serde_json::json;

    fn test_storage() -> (CacheStorage, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        let storage = CacheStorage::new(Arc::new(clock.clone()));
        (storage, clock)
    }

    #[test]
    fn test_put_get() {
        let (mut storage, _clock) = test_storage();
        storage.put(&CacheKey::Index, json!([{"idSystem": "A"}]), CacheTtl::INDEX);

        assert_eq!(
            storage.get(&CacheKey::Index),
            Some(json!([{"idSystem": "A"}]))
        );
    }

    #[test]
    fn test_value_lives_exactly_its_ttl() {
        let (mut storage, clock) = test_storage();
        let ttl = Duration::from_secs(90);
        storage.put(&CacheKey::JwtToken, json!("token"), ttl);

        clock.advance(Duration::from_secs(89));
        assert_eq!(storage.get(&CacheKey::JwtToken), Some(json!("token")));

        clock.advance(Duration::from_secs(1));
        assert_eq!(storage.get(&CacheKey::JwtToken), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let (mut storage, clock) = test_storage();
        storage.put(&CacheKey::JwtToken, json!("token"), Duration::from_secs(10));

        clock.advance(Duration::from_secs(11));
        assert_eq!(storage.stats().expired_entries, 1);

        assert!(storage.get(&CacheKey::JwtToken).is_none());
        assert_eq!(storage.stats().total_entries, 0);
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let (mut storage, _clock) = test_storage();
        storage.put(&CacheKey::Index, json!([]), Duration::from_secs(0));

        assert!(storage.get(&CacheKey::Index).is_none());
    }

    #[test]
    fn test_put_replaces_existing_token() {
        let (mut storage, _clock) = test_storage();
        storage.put(&CacheKey::JwtToken, json!("first"), CacheTtl::JWT);
        storage.put(&CacheKey::JwtToken, json!("second"), CacheTtl::JWT);

        assert_eq!(storage.get(&CacheKey::JwtToken), Some(json!("second")));
        assert_eq!(storage.stats().total_entries, 1);
    }

    #[test]
    fn test_pool_details_do_not_collide() {
        let (mut storage, _clock) = test_storage();
        storage.put(&CacheKey::pool_details("A"), json!({"pool": "A"}), CacheTtl::POOL_DETAILS);
        storage.put(&CacheKey::pool_details("B"), json!({"pool": "B"}), CacheTtl::POOL_DETAILS);

        assert_eq!(
            storage.get(&CacheKey::pool_details("A")),
            Some(json!({"pool": "A"}))
        );
        assert_eq!(
            storage.get(&CacheKey::pool_details("B")),
            Some(json!({"pool": "B"}))
        );
    }

    #[test]
    fn test_clear_all() {
        let (mut storage, _clock) = test_storage();
        storage.put(&CacheKey::JwtToken, json!("t"), CacheTtl::JWT);
        storage.put(&CacheKey::Index, json!([]), CacheTtl::INDEX);
        storage.put(&CacheKey::pool_details("A"), json!({}), CacheTtl::POOL_DETAILS);

        let stats = storage.clear_all();
        assert_eq!(stats.entries_removed, 3);
        assert!(storage.get(&CacheKey::JwtToken).is_none());
        assert!(storage.get(&CacheKey::Index).is_none());
    }

    #[test]
    fn test_stats() {
        let (mut storage, clock) = test_storage();
        storage.put(&CacheKey::JwtToken, json!("t"), CacheTtl::JWT);
        storage.put(&CacheKey::pool_details("A"), json!({}), CacheTtl::POOL_DETAILS);

        clock.advance(Duration::from_secs(10 * 60));

        let stats = storage.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.valid_entries, 1);
        assert_eq!(stats.expired_entries, 1);
        assert!(stats.oldest_entry.is_some());
    }
}
