//! Password credential hashing and verification.
//!
//! # Invariants
//! - New credentials are always stored as Argon2id PHC strings.
//! - Stored values that are not PHC strings are legacy plaintext and verify
//!   by exact byte equality until the next password change replaces them.
//! - Neither candidates nor stored credentials are ever logged.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PHC_PREFIX: &str = "$argon2";

#[derive(Debug)]
pub struct CredentialError(argon2::password_hash::Error);

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to hash credential: {}", self.0)
    }
}

impl Error for CredentialError {}

/// Hashes `password` into its stored form.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(CredentialError)?;
    Ok(hash.to_string())
}

/// Checks `candidate` against a stored credential.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    if !is_hashed(stored) {
        warn!("event=credential_verify module=credential status=legacy_plaintext");
        return stored.as_bytes() == candidate.as_bytes();
    }

    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

/// Returns whether `stored` is an Argon2 PHC string rather than plaintext.
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with(PHC_PREFIX)
}
