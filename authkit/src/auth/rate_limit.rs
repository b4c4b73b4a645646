//! Sliding-window rate limiting for login attempts
//!
//! Each identifier (email, IP address, ...) owns an ascending list of attempt
//! timestamps. On every attempt the list is filtered down to the entries
//! younger than the window, and the attempt is admitted only if fewer than
//! `max_attempts` remain. Admitted attempts are recorded, denied ones are not,
//! so exactly `max_attempts` attempts succeed inside any rolling window.
//!
//! # Concurrency
//!
//! State lives in a [`DashMap`]. The filter-check-append sequence for one
//! identifier runs while holding that identifier's entry, so two concurrent
//! attempts can never both observe the same pre-filter state. Identifiers in
//! different shards proceed in parallel.
//!
//! # Memory
//!
//! Identifiers are never dropped implicitly. Long-running hosts should call
//! [`LoginRateLimiter::purge_expired`] periodically to forget identifiers
//! with no attempt left inside the window.
//!
//! # Example
//!
//! ```
//! use authkit::auth::rate_limit::{LoginRateLimiter, RateLimitPolicy};
//! use std::time::Duration;
//!
//! let limiter = LoginRateLimiter::with_policy(RateLimitPolicy::new(3, Duration::from_secs(60)));
//!
//! for _ in 0..3 {
//!     assert!(limiter.attempt("user@example.com").allowed);
//! }
//!
//! let denied = limiter.attempt("user@example.com");
//! assert!(!denied.allowed);
//! assert_eq!(denied.message.as_deref(), Some("Too many attempts. Try again later."));
//! ```

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default number of attempts admitted per window
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default window length (1 minute)
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Message returned with every denial
pub const RATE_LIMIT_MESSAGE: &str = "Too many attempts. Try again later.";

/// Source of millisecond timestamps for the limiter
///
/// Timestamps only need to be comparable with each other, not with wall time.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_ms(&self) -> u64;
}

/// Monotonic clock counting milliseconds since its creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Admission limits for a limiter call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum admitted attempts per window
    pub max_attempts: u32,

    /// Length of the sliding window
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Creates a policy admitting `max_attempts` per `window`
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        RateLimitPolicy {
            max_attempts,
            window,
        }
    }

    /// Builds a policy from a window expressed in milliseconds
    pub fn from_millis(max_attempts: u32, window_ms: u64) -> Self {
        Self::new(max_attempts, Duration::from_millis(window_ms))
    }

    /// Window length in milliseconds
    pub fn window_ms(&self) -> u64 {
        u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_MS)
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitResult {
    /// Whether the attempt was admitted
    pub allowed: bool,

    /// Explanation, present only on denial
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RateLimitResult {
    /// Creates a result admitting the attempt
    pub fn allowed() -> Self {
        RateLimitResult {
            allowed: true,
            message: None,
        }
    }

    /// Creates a result denying the attempt
    pub fn denied() -> Self {
        RateLimitResult {
            allowed: false,
            message: Some(RATE_LIMIT_MESSAGE.to_string()),
        }
    }
}

/// In-memory login rate limiter
///
/// Construct one per application (or per protected action) and share it by
/// reference; every instance keeps fully independent state.
#[derive(Debug)]
pub struct LoginRateLimiter<C: Clock = MonotonicClock> {
    /// Attempt timestamps per identifier, ascending
    attempts: DashMap<String, Vec<u64>>,

    /// Policy used by [`attempt`](Self::attempt) and [`purge_expired`](Self::purge_expired)
    policy: RateLimitPolicy,

    clock: C,
}

impl LoginRateLimiter<MonotonicClock> {
    /// Creates a limiter with the default policy (5 attempts per minute)
    pub fn new() -> Self {
        Self::with_policy(RateLimitPolicy::default())
    }

    /// Creates a limiter with a custom policy
    pub fn with_policy(policy: RateLimitPolicy) -> Self {
        Self::with_clock(policy, MonotonicClock::default())
    }
}

impl Default for LoginRateLimiter<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> LoginRateLimiter<C> {
    /// Creates a limiter reading time from `clock`
    pub fn with_clock(policy: RateLimitPolicy, clock: C) -> Self {
        LoginRateLimiter {
            attempts: DashMap::new(),
            policy,
            clock,
        }
    }

    /// The policy this limiter was built with
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Records an attempt for `identifier` under the limiter's own policy
    pub fn attempt(&self, identifier: &str) -> RateLimitResult {
        self.attempt_with(identifier, self.policy)
    }

    /// Records an attempt for `identifier` under an explicit policy
    ///
    /// Timestamps exactly `window` old have expired. The check runs before
    /// the current attempt is recorded, and a denied attempt is not recorded.
    pub fn attempt_with(&self, identifier: &str, policy: RateLimitPolicy) -> RateLimitResult {
        let window_ms = policy.window_ms();

        // Holding the entry serializes concurrent attempts on this identifier
        let mut stamps = self.attempts.entry(identifier.to_owned()).or_default();
        let now = self.clock.now_ms();

        stamps.retain(|&at| now.saturating_sub(at) < window_ms);

        if stamps.len() >= policy.max_attempts as usize {
            tracing::debug!(
                identifier,
                attempts = stamps.len(),
                max_attempts = policy.max_attempts,
                window_ms,
                "Login attempt denied"
            );
            return RateLimitResult::denied();
        }

        stamps.push(now);
        tracing::trace!(identifier, attempts = stamps.len(), "Login attempt admitted");

        RateLimitResult::allowed()
    }

    /// Forgets every recorded attempt for `identifier`
    ///
    /// Returns `true` if the identifier was tracked.
    pub fn reset(&self, identifier: &str) -> bool {
        self.attempts.remove(identifier).is_some()
    }

    /// Drops identifiers with no attempt left inside the limiter's window
    ///
    /// Returns the number of identifiers removed. Attempts made under a
    /// wider per-call policy may be forgotten early by this sweep.
    pub fn purge_expired(&self) -> usize {
        let window_ms = self.policy.window_ms();
        let now = self.clock.now_ms();
        let mut removed = 0;

        self.attempts.retain(|_, stamps| {
            let live = stamps
                .last()
                .is_some_and(|&newest| now.saturating_sub(newest) < window_ms);
            if !live {
                removed += 1;
            }
            live
        });

        if removed > 0 {
            tracing::debug!(removed, remaining = self.attempts.len(), "Purged expired rate limit entries");
        }

        removed
    }

    /// Number of identifiers currently tracked
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}

/// Process-wide limiter behind the free functions below
static GLOBAL_LIMITER: Lazy<LoginRateLimiter> = Lazy::new(LoginRateLimiter::new);

/// The process-wide limiter used by [`login_rate_limiter`]
pub fn global() -> &'static LoginRateLimiter {
    &GLOBAL_LIMITER
}

/// Records a login attempt in the process-wide limiter (5 attempts per minute)
pub fn login_rate_limiter(identifier: &str) -> RateLimitResult {
    GLOBAL_LIMITER.attempt(identifier)
}

/// Records a login attempt in the process-wide limiter with explicit limits
pub fn login_rate_limiter_with(identifier: &str, max_attempts: u32, window_ms: u64) -> RateLimitResult {
    GLOBAL_LIMITER.attempt_with(identifier, RateLimitPolicy::from_millis(max_attempts, window_ms))
}
