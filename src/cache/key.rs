//! Cache keys for the Klereo resources

use std::fmt;

/// Logical resource a cache entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The bearer token returned by the login endpoint
    JwtToken,
    /// The pool index
    Index,
    /// Detail blob for one pool
    PoolDetails(String),
}

impl CacheKey {
    pub fn pool_details(pool_id: &str) -> Self {
        CacheKey::PoolDetails(pool_id.to_string())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::JwtToken => f.write_str("jwt_token"),
            CacheKey::Index => f.write_str("index"),
            CacheKey::PoolDetails(id) => write!(f, "pool_details_{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys() {
        assert_eq!(CacheKey::JwtToken.to_string(), "jwt_token");
        assert_eq!(CacheKey::Index.to_string(), "index");
    }

    #[test]
    fn test_pool_details_namespaced_per_pool() {
        let a = CacheKey::pool_details("1234");
        let b = CacheKey::pool_details("5678");

        assert_eq!(a.to_string(), "pool_details_1234");
        assert_ne!(a.to_string(), b.to_string());
    }
}
