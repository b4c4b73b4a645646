//! Configuration management for authkit defaults
//!
//! Loads the hashing cost and login rate limit from environment variables
//! and provides a type-safe settings struct.
//!
//! # Environment Variables
//!
//! - `AUTHKIT_SALT_ROUNDS`: bcrypt cost factor (default: 10, range 4..=31)
//! - `AUTHKIT_MAX_LOGIN_ATTEMPTS`: attempts admitted per window (default: 5)
//! - `AUTHKIT_LOGIN_WINDOW_MS`: rate limit window in milliseconds (default: 60000)
//!
//! # Example
//!
//! ```no_run
//! use authkit::auth::rate_limit::LoginRateLimiter;
//! use authkit::config::Settings;
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! let limiter = LoginRateLimiter::with_policy(settings.rate_limit_policy());
//! # Ok(())
//! # }
//! ```

use crate::auth::password::{DEFAULT_SALT_ROUNDS, MAX_SALT_ROUNDS, MIN_SALT_ROUNDS};
use crate::auth::rate_limit::{RateLimitPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_MS};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

const SALT_ROUNDS_VAR: &str = "AUTHKIT_SALT_ROUNDS";
const MAX_ATTEMPTS_VAR: &str = "AUTHKIT_MAX_LOGIN_ATTEMPTS";
const WINDOW_MS_VAR: &str = "AUTHKIT_LOGIN_WINDOW_MS";

/// Complete authkit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Password hashing configuration
    pub hashing: HashingConfig,

    /// Login rate limit configuration
    pub rate_limit: RateLimitConfig,
}

/// Password hashing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// bcrypt cost factor
    pub salt_rounds: u32,
}

/// Login rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Attempts admitted per window
    pub max_attempts: u32,

    /// Window length in milliseconds
    pub window_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hashing: HashingConfig {
                salt_rounds: DEFAULT_SALT_ROUNDS,
            },
            rate_limit: RateLimitConfig {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                window_ms: DEFAULT_WINDOW_MS,
            },
        }
    }
}

impl Settings {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but unparseable or out of range.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    ///
    /// Missing keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let salt_rounds = parse_var(&lookup, SALT_ROUNDS_VAR, DEFAULT_SALT_ROUNDS)?;
        let max_attempts = parse_var(&lookup, MAX_ATTEMPTS_VAR, DEFAULT_MAX_ATTEMPTS)?;
        let window_ms = parse_var(&lookup, WINDOW_MS_VAR, DEFAULT_WINDOW_MS)?;

        if !(MIN_SALT_ROUNDS..=MAX_SALT_ROUNDS).contains(&salt_rounds) {
            anyhow::bail!(
                "{} must be between {} and {}, got {}",
                SALT_ROUNDS_VAR,
                MIN_SALT_ROUNDS,
                MAX_SALT_ROUNDS,
                salt_rounds
            );
        }

        if window_ms == 0 {
            anyhow::bail!("{} must be greater than zero", WINDOW_MS_VAR);
        }

        let settings = Self {
            hashing: HashingConfig { salt_rounds },
            rate_limit: RateLimitConfig {
                max_attempts,
                window_ms,
            },
        };

        tracing::debug!(?settings, "Loaded authkit settings");

        Ok(settings)
    }

    /// Rate limit policy described by these settings
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::from_millis(self.rate_limit.max_attempts, self.rate_limit.window_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
