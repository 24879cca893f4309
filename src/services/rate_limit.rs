use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check. `retry_after_secs` is only meaningful
/// when `allowed` is false and is always at least 1 in that case.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub retry_after_secs: u64,
}

/// Injected limiter capability so handlers never depend on the concrete
/// store. The in-memory fixed window below is the only implementation
/// today; a shared cache could be swapped in without touching call sites.
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str) -> RateLimitDecision;
}

struct Bucket {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by client IP.
///
/// Process-local and best-effort: buckets reset on restart, and running
/// several instances under-enforces the limit proportionally. That is an
/// accepted limitation for this deployment, not something to fix here.
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn bucket_count(&self) -> usize {
        self.buckets.lock().unwrap().len()
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap();

        // Lazy eviction; unbounded growth across distinct keys is accepted.
        buckets.retain(|_, b| b.reset_at > now);

        match buckets.get_mut(key) {
            Some(bucket) if bucket.count < self.limit => {
                bucket.count += 1;
                RateLimitDecision {
                    allowed: true,
                    retry_after_secs: 0,
                }
            }
            Some(bucket) => RateLimitDecision {
                allowed: false,
                retry_after_secs: bucket
                    .reset_at
                    .saturating_duration_since(now)
                    .as_secs()
                    .max(1),
            },
            None => {
                buckets.insert(
                    key.to_string(),
                    Bucket {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    retry_after_secs: 0,
                }
            }
        }
    }
}
