//! Password hashing module using bcrypt
//!
//! This module hashes and verifies passwords with bcrypt, the adaptive hash
//! used by the stored credentials this toolkit has to interoperate with.
//!
//! # Security
//!
//! - **Algorithm**: bcrypt, `$2b$` variant
//! - **Cost**: 10 by default (2^10 key-expansion rounds), clamped into 4..=31
//! - **Salt**: 16 random bytes from the OS RNG, fresh for every call
//! - **Comparison**: constant-time, performed by the bcrypt primitive
//!
//! # Hash Format
//!
//! ```text
//! $2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy
//! \__/\_/\____________________/\_____________________________/
//! ver cost        salt (22)                digest (31)
//! ```
//!
//! Every artifact is exactly 60 characters. Artifacts tagged `$2a$`, `$2b$`
//! or `$2y$` are accepted for verification.
//!
//! # Example
//!
//! ```
//! use authkit::auth::password::{compare_password, hash_password_with_rounds};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password_with_rounds("super_secret_password_123", 4)?;
//!
//! assert!(compare_password("super_secret_password_123", &hash)?);
//! assert!(!compare_password("wrong_password", &hash)?);
//! # Ok(())
//! # }
//! ```

use bcrypt::{BcryptError, Version};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

/// Cost factor used when the caller does not pick one
pub const DEFAULT_SALT_ROUNDS: u32 = 10;

/// Smallest cost factor bcrypt accepts
pub const MIN_SALT_ROUNDS: u32 = 4;

/// Largest cost factor bcrypt accepts
pub const MAX_SALT_ROUNDS: u32 = 31;

/// Length of every bcrypt hash artifact
pub const HASH_LENGTH: usize = 60;

/// Salt length in raw bytes (22 characters once encoded)
const SALT_BYTES: usize = 16;

/// Characters of bcrypt's base-64 alphabet
const BCRYPT_ALPHABET: &[u8] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Version tags accepted when parsing an artifact
const ACCEPTED_VERSIONS: [&[u8]; 3] = [b"2a", b"2b", b"2y"];

/// Message for a missing argument when comparing
const BOTH_REQUIRED: &str = "Both password and hashedPassword are required";

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// A required argument was empty or malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// The bcrypt primitive (or the task running it) failed
    #[error("Failed to hash password: {0}")]
    HashError(String),
}

impl From<BcryptError> for PasswordError {
    fn from(err: BcryptError) -> Self {
        match err {
            BcryptError::CostNotAllowed(_)
            | BcryptError::InvalidCost(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidHash(_)
            | BcryptError::InvalidSaltLen(_)
            | BcryptError::InvalidBase64(_) => PasswordError::InvalidArgument(err.to_string()),
            other => PasswordError::HashError(other.to_string()),
        }
    }
}

/// Hashes a password with bcrypt at the default cost factor (10)
///
/// # Errors
///
/// Returns `PasswordError::InvalidArgument` if `password` is empty.
///
/// # Example
///
/// ```no_run
/// use authkit::auth::password::hash_password;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("my_password")?;
/// assert!(hash.starts_with("$2b$10$"));
/// # Ok(())
/// # }
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_rounds(password, DEFAULT_SALT_ROUNDS)
}

/// Hashes a password with bcrypt at the given cost factor
///
/// A fresh 16-byte salt is drawn from the OS RNG for every call, so hashing
/// the same password twice never yields the same artifact. Cost factors
/// outside 4..=31 are clamped into that range.
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `salt_rounds` - bcrypt cost factor (log2 of the key-expansion rounds)
///
/// # Returns
///
/// A 60-character `$2b$` artifact embedding cost, salt and digest
///
/// # Errors
///
/// Returns `PasswordError::InvalidArgument` if `password` is empty, or
/// `PasswordError::HashError` if bcrypt fails
pub fn hash_password_with_rounds(password: &str, salt_rounds: u32) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::InvalidArgument("Password is required".to_string()));
    }

    let cost = clamp_rounds(salt_rounds);

    let mut salt = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt);

    let parts = bcrypt::hash_with_salt(password, cost, salt)?;

    Ok(parts.format_for_version(Version::TwoB))
}

/// Compares a plaintext password against a stored bcrypt artifact
///
/// The artifact's own version, cost and salt are used to re-derive the
/// digest, and the comparison is constant-time.
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't. An artifact
/// that is not 60 characters long never matches, and neither does one whose
/// salt or digest carries non-canonical base-64 trailing bits.
///
/// # Errors
///
/// Returns `PasswordError::InvalidArgument` if either argument is empty, or
/// if a 60-character artifact is not a well-formed bcrypt hash
///
/// # Example
///
/// ```
/// use authkit::auth::password::{compare_password, hash_password_with_rounds};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password_with_rounds("correct_password", 4)?;
///
/// assert!(compare_password("correct_password", &hash)?);
/// assert!(!compare_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```
pub fn compare_password(password: &str, hashed_password: &str) -> Result<bool, PasswordError> {
    if password.is_empty() || hashed_password.is_empty() {
        return Err(PasswordError::InvalidArgument(BOTH_REQUIRED.to_string()));
    }

    if hashed_password.len() != HASH_LENGTH {
        return Ok(false);
    }

    if !is_hash_artifact(hashed_password) {
        return Err(PasswordError::InvalidArgument(
            "Invalid bcrypt hash format".to_string(),
        ));
    }

    match bcrypt::verify(password, hashed_password) {
        Ok(matched) => Ok(matched),
        Err(BcryptError::InvalidBase64(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Async variant of [`hash_password_with_rounds`]
///
/// bcrypt is CPU-bound and slow on purpose, so the work runs on tokio's
/// blocking pool instead of the calling task. The owned plaintext is wiped
/// once the hash has been derived.
pub async fn hash_password_async(password: String, salt_rounds: u32) -> Result<String, PasswordError> {
    let password = Zeroizing::new(password);

    tokio::task::spawn_blocking(move || hash_password_with_rounds(&password, salt_rounds))
        .await
        .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
}

/// Async variant of [`compare_password`], run on tokio's blocking pool
pub async fn compare_password_async(password: String, hashed_password: String) -> Result<bool, PasswordError> {
    let password = Zeroizing::new(password);

    tokio::task::spawn_blocking(move || compare_password(&password, &hashed_password))
        .await
        .map_err(|e| PasswordError::HashError(format!("Comparison task failed: {}", e)))?
}

/// Checks whether a string has the layout of a bcrypt artifact
///
/// `$<2a|2b|2y>$<2 digits>$<53 characters of ./A-Za-z0-9>`, 60 characters in
/// total. Only the layout is checked, not the cost range.
pub fn is_hash_artifact(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();

    bytes.len() == HASH_LENGTH
        && bytes[0] == b'$'
        && ACCEPTED_VERSIONS.contains(&&bytes[1..3])
        && bytes[3] == b'$'
        && bytes[4..6].iter().all(u8::is_ascii_digit)
        && bytes[6] == b'$'
        && bytes[7..].iter().all(|b| BCRYPT_ALPHABET.contains(b))
}

/// Extracts the cost factor embedded in a bcrypt artifact
///
/// Returns `None` if the artifact is malformed.
pub fn hash_cost(hashed_password: &str) -> Option<u32> {
    if !is_hash_artifact(hashed_password) {
        return None;
    }

    hashed_password[4..6].parse().ok()
}

/// Reports whether a stored artifact should be replaced on next login
///
/// True when the artifact is malformed or was produced at a cost other than
/// `salt_rounds` (after clamping).
pub fn needs_rehash(hashed_password: &str, salt_rounds: u32) -> bool {
    hash_cost(hashed_password) != Some(clamp_rounds(salt_rounds))
}

fn clamp_rounds(salt_rounds: u32) -> u32 {
    let cost = salt_rounds.clamp(MIN_SALT_ROUNDS, MAX_SALT_ROUNDS);

    if cost != salt_rounds {
        tracing::warn!(
            requested = salt_rounds,
            applied = cost,
            "bcrypt cost factor out of range, clamping"
        );
    }

    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keeps the suite fast; the default cost has its own test
    const TEST_ROUNDS: u32 = 4;

    #[test]
    fn test_hash_password() {
        let password = "TestPassword123!";
        let hash = hash_password_with_rounds(password, TEST_ROUNDS).expect("Hash should succeed");

        assert!(hash.starts_with("$2b$04$"));
        assert_eq!(hash.len(), HASH_LENGTH);
        assert_ne!(hash, password);
        assert!(is_hash_artifact(&hash));
    }

    #[test]
    fn test_hash_password_default_cost() {
        let hash = hash_password("TestPassword123!").expect("Hash should succeed");

        assert!(hash.starts_with("$2b$10$"));
        assert_eq!(hash_cost(&hash), Some(DEFAULT_SALT_ROUNDS));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let password = "same_password";

        let hash1 = hash_password_with_rounds(password, TEST_ROUNDS).expect("Hash 1 should succeed");
        let hash2 = hash_password_with_rounds(password, TEST_ROUNDS).expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
        assert_ne!(hash1[7..29], hash2[7..29]);
    }

    #[test]
    fn test_hash_password_empty() {
        let err = hash_password_with_rounds("", TEST_ROUNDS).unwrap_err();

        assert!(matches!(err, PasswordError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Password is required");
    }

    #[test]
    fn test_hash_password_clamps_cost() {
        let low = hash_password_with_rounds("password", 1).expect("Hash should succeed");
        assert_eq!(hash_cost(&low), Some(MIN_SALT_ROUNDS));

        let zero = hash_password_with_rounds("password", 0).expect("Hash should succeed");
        assert!(zero.starts_with("$2b$04$"));
    }

    #[test]
    fn test_compare_password_correct() {
        let password = "correct_password";
        let hash = hash_password_with_rounds(password, TEST_ROUNDS).expect("Hash should succeed");

        let result = compare_password(password, &hash).expect("Compare should succeed");
        assert!(result, "Correct password should match");
    }

    #[test]
    fn test_compare_password_incorrect() {
        let password = "correct_password";
        let hash = hash_password_with_rounds(password, TEST_ROUNDS).expect("Hash should succeed");

        let result = compare_password("wrong_password", &hash).expect("Compare should succeed");
        assert!(!result, "Wrong password should not match");

        let suffixed = format!("{}x", password);
        assert!(!compare_password(&suffixed, &hash).expect("Compare should succeed"));
    }

    #[test]
    fn test_compare_password_missing_arguments() {
        let hash = hash_password_with_rounds("password", TEST_ROUNDS).expect("Hash should succeed");

        let err = compare_password("", &hash).unwrap_err();
        assert_eq!(err.to_string(), "Both password and hashedPassword are required");

        let err = compare_password("pass", "").unwrap_err();
        assert!(matches!(err, PasswordError::InvalidArgument(_)));
    }

    #[test]
    fn test_compare_password_wrong_length_hash() {
        let result = compare_password("password", "invalid_hash").expect("Compare should succeed");
        assert!(!result, "Short artifact should never match");
    }

    #[test]
    fn test_compare_password_malformed_hash() {
        // Right length, unknown version tag
        let bogus = format!("$2x$10${}", "a".repeat(53));
        assert_eq!(bogus.len(), HASH_LENGTH);

        let err = compare_password("password", &bogus).unwrap_err();
        assert!(matches!(err, PasswordError::InvalidArgument(_)));
    }

    #[test]
    fn test_compare_password_non_canonical_salt_bits() {
        let hash = hash_password_with_rounds("password", TEST_ROUNDS).expect("Hash should succeed");

        // Last salt character only carries 2 significant bits; 'a' sets trailing ones
        let mut tampered = hash.into_bytes();
        tampered[28] = b'a';
        let tampered = String::from_utf8(tampered).expect("Artifact is ASCII");
        assert!(is_hash_artifact(&tampered));

        let result = compare_password("password", &tampered).expect("Compare should succeed");
        assert!(!result, "Non-canonical salt should never match");
    }

    #[test]
    fn test_compare_password_accepts_legacy_versions() {
        let hash = hash_password_with_rounds("legacy_password", TEST_ROUNDS).expect("Hash should succeed");

        for tag in ["2a", "2y"] {
            let legacy = format!("${}{}", tag, &hash[3..]);
            assert!(
                compare_password("legacy_password", &legacy).expect("Compare should succeed"),
                "${}$ artifact should verify",
                tag
            );
        }
    }

    #[test]
    fn test_hash_compare_roundtrip() {
        let passwords = vec![
            "simple",
            "with spaces",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
        ];

        for password in passwords {
            let hash = hash_password_with_rounds(password, TEST_ROUNDS).expect("Hash should succeed");
            let matched = compare_password(password, &hash).expect("Compare should succeed");
            assert!(matched, "Password '{}' should match", password);
        }
    }

    #[test]
    fn test_is_hash_artifact() {
        assert!(is_hash_artifact(
            "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"
        ));
        assert!(is_hash_artifact(
            "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"
        ));

        assert!(!is_hash_artifact(""));
        assert!(!is_hash_artifact("$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA"));
        assert!(!is_hash_artifact(
            "$2b$1x$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"
        ));
        assert!(!is_hash_artifact(
            "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lh+y"
        ));
        // Multi-byte input of the right byte length must not panic
        assert!(!is_hash_artifact(&"é".repeat(30)));
    }

    #[test]
    fn test_needs_rehash() {
        let hash = hash_password_with_rounds("password", TEST_ROUNDS).expect("Hash should succeed");

        assert!(!needs_rehash(&hash, TEST_ROUNDS));
        assert!(needs_rehash(&hash, DEFAULT_SALT_ROUNDS));
        assert!(needs_rehash("not-a-hash", TEST_ROUNDS));
    }

    #[tokio::test]
    async fn test_async_roundtrip() {
        let hash = hash_password_async("async_password".to_string(), TEST_ROUNDS)
            .await
            .expect("Hash should succeed");

        assert!(compare_password_async("async_password".to_string(), hash.clone())
            .await
            .expect("Compare should succeed"));
        assert!(!compare_password_async("other_password".to_string(), hash)
            .await
            .expect("Compare should succeed"));
    }

    #[tokio::test]
    async fn test_async_rejects_empty_password() {
        let result = hash_password_async(String::new(), TEST_ROUNDS).await;
        assert!(matches!(result, Err(PasswordError::InvalidArgument(_))));
    }
}
