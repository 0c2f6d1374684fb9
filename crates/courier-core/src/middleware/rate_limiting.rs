//! Per-client token-bucket rate limiting.
//!
//! Each client key owns one bucket. A bucket starts full at `burst` tokens,
//! refills continuously at `refill_rate` tokens per second (capped at
//! `burst`), and spends one token per admitted request. A request that finds
//! less than one token is denied without altering the bucket beyond its
//! refill.
//!
//! Buckets are evicted on a one-shot timer armed when the bucket is created:
//! after `idle_eviction` elapses the entry is removed unconditionally, even
//! if the key is still active. The next request from that key simply
//! recreates a full bucket. Eviction therefore bounds memory at roughly one
//! bucket per distinct key seen in any eviction window.
//!
//! The registry is a single `Mutex<HashMap>`; every admission decision takes
//! the lock once, so decisions for the same key are strictly serialized and
//! can never jointly overspend a bucket. Sharding the registry by key hash
//! is the scaling path if the lock ever contends.

use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::debug;

/// Token bucket state for a single client key.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket rate limiter keyed by client identity.
///
/// Cloning is cheap; clones share the same bucket registry. Requires a
/// Tokio runtime: eviction timers are spawned tasks.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    burst: u32,
    refill_rate: f64,
    idle_eviction: Duration,
}

impl RateLimiter {
    /// Creates a limiter admitting `refill_rate` requests per second
    /// sustained, with bursts up to `burst`, evicting buckets
    /// `idle_eviction` after creation.
    #[must_use]
    pub fn new(refill_rate: f64, burst: u32, idle_eviction: Duration) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            burst,
            refill_rate,
            idle_eviction,
        }
    }

    /// Decides admission for one request from `key`.
    ///
    /// Returns `true` and spends one token if the key's bucket holds at
    /// least one token after refill; returns `false` otherwise. An unknown
    /// key gets a fresh full bucket (so its first request is always
    /// admitted) and an eviction timer.
    pub fn admit(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock();

        let bucket = match buckets.entry(key.to_string()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                self.schedule_eviction(key.to_string());
                entry.insert(TokenBucket {
                    tokens: f64::from(self.burst),
                    last_refill: now,
                })
            }
        };

        let elapsed = now.duration_since(bucket.last_refill);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.refill_rate).min(f64::from(self.burst));
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Arms the one-shot eviction timer for a newly created bucket.
    ///
    /// The removal is unconditional: activity after creation does not
    /// extend the bucket's life.
    fn schedule_eviction(&self, key: String) {
        let buckets = Arc::clone(&self.buckets);
        let idle = self.idle_eviction;
        tokio::spawn(async move {
            tokio::time::sleep(idle).await;
            buckets.lock().remove(&key);
            debug!(client = %key, "evicted rate limit bucket");
        });
    }

    /// Number of live buckets in the registry.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().len()
    }

    /// Current token balance for `key`, if a bucket exists.
    #[doc(hidden)]
    #[must_use]
    pub fn tokens(&self, key: &str) -> Option<f64> {
        self.buckets.lock().get(key).map(|b| b.tokens)
    }
}
