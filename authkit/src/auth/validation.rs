//! Password strength validation
//!
//! Checks a candidate password against a fixed rule set and reports every
//! rule it breaks, in a stable order:
//!
//! 1. At least 8 characters long (UTF-16 code units, so an emoji counts twice)
//! 2. Contains an uppercase letter (`A-Z`)
//! 3. Contains a lowercase letter (`a-z`)
//! 4. Contains a digit (`0-9`)
//! 5. Contains one of `!@#$%^&*(),.?":{}|<>`
//!
//! An empty password short-circuits with a single "required" error.
//!
//! # Example
//!
//! ```
//! use authkit::auth::validation::validate_password;
//!
//! let result = validate_password("StrongP@ss1");
//! assert!(result.is_valid());
//! assert!(result.errors().is_empty());
//!
//! let result = validate_password("Weak1!");
//! assert!(!result.is_valid());
//! assert!(result.errors().iter().any(|e| e == "Password must be at least 8 characters"));
//! ```

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Minimum password length, counted in UTF-16 code units
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the special-character rule
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Reported alone when the password is empty
pub const PASSWORD_REQUIRED: &str = "Password is required";
/// Reported when the password is shorter than [`MIN_PASSWORD_LENGTH`]
pub const TOO_SHORT: &str = "Password must be at least 8 characters";
/// Reported when no `A-Z` character is present
pub const MISSING_UPPERCASE: &str = "Password must contain an uppercase letter";
/// Reported when no `a-z` character is present
pub const MISSING_LOWERCASE: &str = "Password must contain a lowercase letter";
/// Reported when no `0-9` character is present
pub const MISSING_NUMBER: &str = "Password must contain a number";
/// Reported when no character from [`SPECIAL_CHARACTERS`] is present
pub const MISSING_SPECIAL: &str = "Password must contain a special character";

/// Outcome of a password strength check
///
/// `is_valid()` is true exactly when `errors()` is empty. Serializes as
/// `{"valid": bool, "isValid": bool, "errors": [..]}` so existing consumers
/// reading either field name keep working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        ValidationResult { errors }
    }

    /// Whether the password passed every rule
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Same as [`is_valid`](Self::is_valid), under the older field name
    pub fn valid(&self) -> bool {
        self.is_valid()
    }

    /// Failed-rule messages, in rule order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consumes the result, returning the failed-rule messages
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

/// A single strength rule: predicate plus the message reported on failure
struct Rule {
    check: fn(&str) -> bool,
    message: &'static str,
}

const RULES: [Rule; 5] = [
    Rule {
        check: |p| p.encode_utf16().count() >= MIN_PASSWORD_LENGTH,
        message: TOO_SHORT,
    },
    Rule {
        check: |p| p.chars().any(|c| c.is_ascii_uppercase()),
        message: MISSING_UPPERCASE,
    },
    Rule {
        check: |p| p.chars().any(|c| c.is_ascii_lowercase()),
        message: MISSING_LOWERCASE,
    },
    Rule {
        check: |p| p.chars().any(|c| c.is_ascii_digit()),
        message: MISSING_NUMBER,
    },
    Rule {
        check: |p| p.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        message: MISSING_SPECIAL,
    },
];

/// Validates password strength
///
/// Never fails: weak or empty input is reported through the returned
/// [`ValidationResult`]. Pure, so the same input always gives the same result.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::from_errors(vec![PASSWORD_REQUIRED.to_string()]);
    }

    let errors = RULES
        .iter()
        .filter(|rule| !(rule.check)(password))
        .map(|rule| rule.message.to_string())
        .collect();

    ValidationResult::from_errors(errors)
}
