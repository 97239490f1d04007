//! Credential Hashing and Verification
//!
//! One-way password hashing with:
//! - Argon2id (memory-hard, recommended by OWASP)
//! - A fresh random salt per hash, embedded in the PHC output string
//! - Constant-time verification that never errors on mismatch
//! - Zeroization of clear text and peppered buffers
//!
//! ## Security Features
//! - The stored value never equals or reversibly derives from the plaintext
//! - Verification reads salt and cost back out of the stored hash, so cost
//!   changes do not break existing credentials
//! - Optional pepper (application-wide secret appended before hashing)

use std::fmt;
use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted at signup
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Clear text hashed once to give unknown-account logins the same cost
const DUMMY_PASSWORD: &str = "dummy-credential-for-timing-equalization";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing failed (bad parameters, resource exhaustion)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored value is not a PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone`
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Accept a new password, enforcing the signup policy.
    ///
    /// Unicode is NFKC-normalized before the policy is checked, and lengths
    /// are counted in code points.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::for_verification(raw);
        let normalized = candidate.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Space, tab and newline are allowed
        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Wrap a password presented at login. No policy is applied: a password
    /// that could never have been set simply fails verification.
    pub fn for_verification(raw: String) -> Self {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed credential in PHC string format
///
/// The string carries algorithm, version, cost parameters, salt and hash,
/// so verification needs nothing else.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    phc: String,
}

impl HashedPassword {
    /// Load a stored hash, rejecting anything that is not a PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    /// PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP baseline: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. For tests and local tooling only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// Hashes and verifies credentials with a fixed cost and optional pepper.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    pepper: Option<Zeroizing<Vec<u8>>>,
    dummy: OnceLock<Option<HashedPassword>>,
}

impl CredentialHasher {
    pub fn new(cost: HashCost, pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            pepper: pepper.map(Zeroizing::new),
            dummy: OnceLock::new(),
        })
    }

    fn pepper(&self) -> Option<&[u8]> {
        self.pepper.as_ref().map(|p| p.as_slice())
    }

    /// Hash with a freshly generated 128-bit salt.
    ///
    /// Two calls with the same password yield different strings that both
    /// verify.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let bytes = password.peppered(self.pepper());

        let hash = self
            .argon2
            .hash_password(&bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            phc: hash.to_string(),
        })
    }

    /// Constant-time check of `password` against `hashed`.
    ///
    /// Returns `false` for a mismatch and for an unparsable hash.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let parsed = match PasswordHash::new(&hashed.phc) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let bytes = password.peppered(self.pepper());
        self.argon2.verify_password(&bytes, &parsed).is_ok()
    }

    /// Spend one verification's worth of work against a fixed hash.
    ///
    /// Called when the account does not exist so the response time matches
    /// a wrong-password attempt. Always returns `false`.
    pub fn verify_dummy(&self, password: &ClearTextPassword) -> bool {
        let dummy = self.dummy.get_or_init(|| {
            self.hash(&ClearTextPassword::for_verification(DUMMY_PASSWORD.to_string()))
                .ok()
        });

        if let Some(dummy) = dummy {
            let _ = self.verify(password, dummy);
        }
        false
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            pepper: None,
            dummy: OnceLock::new(),
        }
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("params", self.argon2.params())
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(HashCost::minimal(), None).unwrap()
    }

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::for_verification(s.to_string())
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_unicode_password_counts_code_points() {
        assert!(ClearTextPassword::new("パスワード安全です!".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hashed = hasher.hash(&pw("TestPassword123!")).unwrap();

        assert!(hasher.verify(&pw("TestPassword123!"), &hashed));
        assert!(!hasher.verify(&pw("WrongPassword123!"), &hashed));
        assert!(!hasher.verify(&pw(""), &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let first = hasher.hash(&pw("same input")).unwrap();
        let second = hasher.hash(&pw("same input")).unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&pw("same input"), &first));
        assert!(hasher.verify(&pw("same input"), &second));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hashed = hasher().hash(&pw("plaintext-marker")).unwrap();
        assert!(!hashed.as_phc_string().contains("plaintext-marker"));
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_with_pepper() {
        let peppered = CredentialHasher::new(HashCost::minimal(), Some(b"pepper".to_vec())).unwrap();
        let plain = hasher();
        let hashed = peppered.hash(&pw("TestPassword123!")).unwrap();

        assert!(peppered.verify(&pw("TestPassword123!"), &hashed));
        assert!(!plain.verify(&pw("TestPassword123!"), &hashed));
    }

    #[test]
    fn test_verify_uses_cost_stored_in_hash() {
        let cheap = hasher();
        let hashed = cheap.hash(&pw("TestPassword123!")).unwrap();

        let default_cost = CredentialHasher::default();
        assert!(default_cost.verify(&pw("TestPassword123!"), &hashed));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = hasher();
        let hashed = hasher.hash(&pw("TestPassword123!")).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&pw("TestPassword123!"), &restored));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_verify_dummy_is_false() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy(&pw(DUMMY_PASSWORD)));
        assert!(!hasher.verify_dummy(&pw("anything")));
    }

    #[test]
    fn test_debug_redaction() {
        let password = pw("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hasher = CredentialHasher::new(HashCost::minimal(), Some(b"pep".to_vec())).unwrap();
        assert!(!format!("{:?}", hasher).contains("pep\""));
    }
}
