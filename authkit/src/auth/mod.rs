//! Authentication support utilities
//!
//! # Modules
//!
//! - [`password`]: bcrypt password hashing and comparison
//! - [`validation`]: password strength rules
//! - [`rate_limit`]: sliding-window login rate limiting
//!
//! The three modules are independent of each other; none holds a reference
//! to another.
//!
//! # Example
//!
//! ```no_run
//! use authkit::auth::password::{compare_password, hash_password};
//! use authkit::auth::rate_limit::login_rate_limiter;
//! use authkit::auth::validation::validate_password;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let candidate = "Corr3ct-Horse!";
//! if validate_password(candidate).is_valid() {
//!     let hash = hash_password(candidate)?;
//!
//!     if login_rate_limiter("user@example.com").allowed {
//!         assert!(compare_password(candidate, &hash)?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod password;
pub mod rate_limit;
pub mod validation;
