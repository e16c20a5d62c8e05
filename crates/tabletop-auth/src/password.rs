//! Password hashing.
//!
//! Argon2id with a random per-user salt. The derived key and the salt are
//! stored as two separate blobs. Rows hashed with PBKDF2-SHA256 by the
//! earlier desktop shop do not verify and need a password reset.

use crate::AuthError;
use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;

/// Minimum password length accepted by default.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// A derived key and the salt it was derived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

/// Password hasher configuration.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Salt length in bytes.
    pub salt_length: usize,
    /// Derived key length in bytes.
    pub output_length: usize,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            salt_length: 16,
            output_length: 32,
        }
    }
}

impl PasswordHasher {
    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, AuthError> {
        let mut salt = vec![0u8; self.salt_length];
        OsRng.fill_bytes(&mut salt);
        let hash = self.derive_key(password, &salt)?;
        Ok(PasswordHash { hash, salt })
    }

    /// Verify a password against a stored hash and salt.
    pub fn verify(&self, password: &str, hash: &[u8], salt: &[u8]) -> Result<bool, AuthError> {
        if hash.is_empty() || salt.is_empty() {
            return Ok(false);
        }
        let hasher = PasswordHasher {
            salt_length: salt.len(),
            output_length: hash.len(),
        };
        let computed = hasher.derive_key(password, salt)?;
        Ok(constant_time_compare(&computed, hash))
    }

    /// Validate password strength.
    pub fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
        if password.trim().is_empty() || password.chars().count() < min_length {
            return Err(AuthError::WeakPassword(format!(
                "password must be at least {} characters",
                min_length
            )));
        }
        Ok(())
    }

    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut out = vec![0u8; self.output_length];
        Argon2::default()
            .hash_password_into(password.as_bytes(), salt, &mut out)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(out)
    }
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
