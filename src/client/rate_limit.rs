//! Client-side request pacing for the Klereo API
//!
//! Klereo publishes no rate limits, but the backend is small. Requests from
//! one client are spaced out so a polling loop over many pools stays polite.

use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

/// Default pace: 2 requests per second
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 2;

/// Paces outbound requests to a fixed number per second.
pub struct RequestPacer {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    per_second: NonZeroU32,
}

impl RequestPacer {
    /// Create a pacer. Zero is treated as one request per second.
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            per_second,
        }
    }

    pub fn requests_per_second(&self) -> u32 {
        self.per_second.get()
    }

    /// Wait until the next request may go out.
    pub async fn wait(&self) {
        if self.limiter.check().is_err() {
            debug!("Pacing Klereo request ({} req/s)", self.per_second);
            self.limiter.until_ready().await;
        }
    }
}
