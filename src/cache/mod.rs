//! In-memory cache for Klereo API responses
//!
//! One entry per logical resource, each with its own TTL. The cache is owned
//! by the client instance; nothing is persisted.

pub mod key;
pub mod storage;

use std::time::Duration;

/// Cache TTL configuration per resource
pub struct CacheTtl;

impl CacheTtl {
    // Token lifetime is fixed client-side, never read from the token itself
    pub const JWT: Duration = Duration::from_secs(55 * 60); // 55 min

    // Pool identity is stable
    pub const INDEX: Duration = Duration::from_secs(3 * 60 * 60 + 55 * 60); // 3 hr 55 min

    // Probe readings change often
    pub const POOL_DETAILS: Duration = Duration::from_secs(9 * 60 + 50); // 9 min 50 sec
}

pub use key::CacheKey;
pub use storage::{CacheStats, CacheStorage};
