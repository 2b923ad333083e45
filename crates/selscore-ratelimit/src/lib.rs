//! Dual token-bucket rate limiting (C2).
//!
//! Each limiter key gets two buckets, a per-minute one and a per-hour one,
//! both refilled continuously (fractional tokens accrue between calls
//! rather than resetting on a fixed clock boundary). `acquire` never
//! blocks: a caller that cannot get a token is handed a
//! `retry_after_seconds` and decides for itself whether to wait, retry, or
//! fall back.

use dashmap::DashMap;
use selscore_core::config::{defaults, env};
use std::time::{Duration, Instant};

/// Configuration for one named limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub calls_per_minute: u32,
    pub calls_per_hour: u32,
    /// Bucket capacity is `max(calls_per_minute, burst_size)` so a burst
    /// allowance never shrinks the sustained per-minute rate.
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// The engine's single named limiter: outbound LLM calls.
    pub fn llm_default() -> Self {
        Self {
            calls_per_minute: defaults::RATE_LIMIT_CALLS_PER_MINUTE,
            calls_per_hour: defaults::RATE_LIMIT_CALLS_PER_HOUR,
            burst_size: defaults::RATE_LIMIT_BURST_SIZE,
        }
    }

    /// Same as [`Self::llm_default`] but reading env var overrides.
    pub fn llm_from_env() -> Self {
        Self {
            calls_per_minute: env::rate_limit_calls_per_minute(),
            calls_per_hour: env::rate_limit_calls_per_hour(),
            burst_size: env::rate_limit_burst_size(),
        }
    }
}

struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            refill_per_sec,
            tokens: capacity,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Try to take one token. Returns the seconds until a token will be
    /// available if denied.
    fn try_acquire(&mut self, now: Instant) -> Result<(), f64> {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let deficit = 1.0 - self.tokens;
            Err(deficit / self.refill_per_sec)
        }
    }

    /// Seconds until this bucket would hand out a token, without taking
    /// one. `0.0` if a token is already available.
    fn time_until_token(&mut self, now: Instant) -> f64 {
        self.refill(now);
        if self.tokens >= 1.0 {
            0.0
        } else {
            (1.0 - self.tokens) / self.refill_per_sec
        }
    }
}

struct DualBucket {
    minute: TokenBucket,
    hour: TokenBucket,
}

impl DualBucket {
    fn new(config: RateLimitConfig) -> Self {
        let burst_capacity = config.calls_per_minute.max(config.burst_size) as f64;
        Self {
            minute: TokenBucket::new(burst_capacity, config.calls_per_minute as f64 / 60.0),
            hour: TokenBucket::new(config.calls_per_hour as f64, config.calls_per_hour as f64 / 3600.0),
        }
    }

    fn try_acquire(&mut self) -> Result<(), f64> {
        let now = Instant::now();
        // Both buckets must have a token; refund the minute bucket if the
        // hour bucket is the one that's exhausted, so a denied call never
        // silently spends the cheaper budget. retry_after_seconds always
        // reflects the longer of the two waits, since a caller retrying
        // sooner than that would just be denied again.
        match self.minute.try_acquire(now) {
            Ok(()) => match self.hour.try_acquire(now) {
                Ok(()) => Ok(()),
                Err(retry_after) => {
                    self.minute.tokens = (self.minute.tokens + 1.0).min(self.minute.capacity);
                    Err(retry_after)
                }
            },
            Err(minute_retry_after) => {
                let hour_wait = self.hour.time_until_token(now);
                Err(minute_retry_after.max(hour_wait))
            }
        }
    }
}

/// A named, keyed rate limiter. One instance typically guards one external
/// collaborator (e.g. the LLM provider); keys within it partition by
/// caller or tenant when that granularity matters.
pub struct RateLimiter {
    name: &'static str,
    config: RateLimitConfig,
    buckets: DashMap<String, DualBucket>,
}

impl RateLimiter {
    pub fn new(name: &'static str, config: RateLimitConfig) -> Self {
        Self {
            name,
            config,
            buckets: DashMap::new(),
        }
    }

    /// The engine's single named LLM limiter, keyed by caller/tenant.
    pub fn llm(config: RateLimitConfig) -> Self {
        Self::new("llm", config)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Non-blocking acquire for `key`. Never awaits; on denial the caller
    /// gets the number of seconds until a token will be available.
    pub fn acquire(&self, key: &str) -> Result<(), f64> {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| DualBucket::new(self.config));
        bucket.try_acquire()
    }

    /// Drop buckets untouched for longer than `idle_for`, bounding memory
    /// growth from a long tail of one-shot keys.
    pub fn evict_idle(&self, idle_for: Duration) {
        let now = Instant::now();
        self.buckets.retain(|_key, bucket| {
            now.saturating_duration_since(bucket.minute.last_refill) < idle_for
        });
    }
}
