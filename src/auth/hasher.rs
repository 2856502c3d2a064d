//! One-way secret hashing for passwords and recovery answers.
//!
//! ## Design
//! - PBKDF2-SHA256 through the PHC string format: algorithm, rounds, and
//!   salt travel inside the hash itself, so verification needs no
//!   parameter store and old records survive future cost bumps.
//! - Every call to [`hash`] draws a fresh random salt; equal secrets
//!   never produce equal strings.
//! - [`verify`] never errors. Malformed stored material is an
//!   authentication failure, not a crash.

use pbkdf2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Params, Pbkdf2,
};

use crate::auth::error::AuthError;

/// PBKDF2 work factor for interactive logins.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Derived key length in bytes.
const OUTPUT_LEN: usize = 32;

/// Hashes `secret` with a freshly generated salt and returns the PHC
/// string (`$pbkdf2-sha256$...`) to persist.
pub fn hash(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Pbkdf2
        .hash_password_customized(
            secret.as_bytes(),
            None,
            None,
            Params {
                rounds: PBKDF2_ROUNDS,
                output_length: OUTPUT_LEN,
            },
            salt.as_salt(),
        )
        .map_err(|err| AuthError::Hashing(err.to_string()))?;
    Ok(hashed.to_string())
}

/// Checks `secret` against a stored PHC string. The underlying comparison
/// is constant-time; a stored value that fails to parse counts as a
/// mismatch.
pub fn verify(stored: &str, secret: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    Pbkdf2.verify_password(secret.as_bytes(), &parsed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_hashes_to_distinct_strings() {
        let first = hash("Sup3rSecret!").unwrap();
        let second = hash("Sup3rSecret!").unwrap();
        assert_ne!(first, second);
        assert!(verify(&first, "Sup3rSecret!"));
        assert!(verify(&second, "Sup3rSecret!"));
    }

    #[test]
    fn hash_carries_algorithm_and_params() {
        let stored = hash("Sup3rSecret!").unwrap();
        assert!(stored.starts_with("$pbkdf2-sha256$"));
        assert!(stored.contains("i=100000"));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let stored = hash("Sup3rSecret!").unwrap();
        assert!(!verify(&stored, "sup3rsecret!"));
        assert!(!verify(&stored, ""));
    }

    #[test]
    fn malformed_stored_value_fails_closed() {
        assert!(!verify("", "Sup3rSecret!"));
        assert!(!verify("plaintext-left-by-an-old-version", "Sup3rSecret!"));
        assert!(!verify("$pbkdf2-sha256$broken", "Sup3rSecret!"));
    }
}
