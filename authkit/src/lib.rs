//! # authkit
//!
//! Small authentication-support toolkit: password hashing, password strength
//! validation and a per-identifier login rate limiter.
//!
//! ## Module Organization
//!
//! - `auth`: the three facilities ([`auth::password`], [`auth::validation`],
//!   [`auth::rate_limit`])
//! - `config`: environment-driven defaults
//!
//! The crate root re-exports the public surface under its stable names,
//! including the deprecated aliases kept for older callers.
//!
//! ## Example
//!
//! ```no_run
//! use authkit::{compare_password, hash_password, login_rate_limiter, validate_password};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let result = validate_password("StrongP@ss1");
//! assert!(result.is_valid());
//!
//! let hash = hash_password("StrongP@ss1")?;
//! assert!(compare_password("StrongP@ss1", &hash)?);
//!
//! assert!(login_rate_limiter("user@example.com").allowed);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;

pub use auth::password::{
    compare_password, compare_password_async, hash_password, hash_password_async,
    hash_password_with_rounds, PasswordError,
};
pub use auth::rate_limit::{
    login_rate_limiter, login_rate_limiter_with, LoginRateLimiter, RateLimitPolicy,
    RateLimitResult,
};
pub use auth::validation::{validate_password, ValidationResult};
pub use config::Settings;

/// Shorter name for [`compare_password`]
pub use auth::password::compare_password as compare;

/// Compares a plaintext password with a bcrypt hash
#[deprecated(note = "use `compare_password` instead")]
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, PasswordError> {
    compare_password(password, hashed_password)
}

/// Records a login attempt in the process-wide limiter
#[deprecated(note = "use `login_rate_limiter` instead")]
pub fn rate_limiter(identifier: &str) -> RateLimitResult {
    login_rate_limiter(identifier)
}

/// Records a login attempt in the process-wide limiter with explicit limits
#[deprecated(note = "use `login_rate_limiter_with` instead")]
pub fn rate_limiter_with(identifier: &str, max_attempts: u32, window_ms: u64) -> RateLimitResult {
    login_rate_limiter_with(identifier, max_attempts, window_ms)
}

/// Current version of the authkit library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
