//! Argon2id password digests.
//!
//! Digests are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the parameters travel with the hash and verification never needs
//! configuration. Hashing is CPU bound; async callers go through
//! [`PasswordHash::derive_blocking`] and [`PasswordHash::verify_blocking`].

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::RngCore;
use tokio::task;
use zeroize::Zeroizing;

const SALT_LEN: usize = 16;

/// Errors raised while deriving or parsing a digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The stored value is not a PHC string.
    #[error("password hash must be a PHC string")]
    Malformed,
    /// Argon2 rejected the input or parameters.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying cause.
        message: String,
    },
}

/// Password digest in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derive an Argon2id digest for `password` with a fresh random salt.
    ///
    /// Blocks for the duration of the hash.
    pub fn derive(password: &str) -> Result<Self, PasswordHashError> {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt).map_err(hashing_error)?;
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(hashing_error)?;
        Ok(Self(phc.to_string()))
    }

    /// [`PasswordHash::derive`] on the blocking thread pool.
    pub async fn derive_blocking(password: &str) -> Result<Self, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || Self::derive(&password))
            .await
            .map_err(hashing_error)?
    }

    /// Parse a stored PHC string.
    pub fn parse(stored: &str) -> Result<Self, PasswordHashError> {
        PhcHash::new(stored).map_err(|_| PasswordHashError::Malformed)?;
        Ok(Self(stored.to_owned()))
    }

    /// The stored PHC string.
    pub fn encode(&self) -> String {
        self.0.clone()
    }

    /// Check `password` against the digest. Blocks for the duration of the
    /// hash.
    pub fn verify(&self, password: &str) -> bool {
        PhcHash::new(&self.0).is_ok_and(|phc| {
            Argon2::default()
                .verify_password(password.as_bytes(), &phc)
                .is_ok()
        })
    }

    /// [`PasswordHash::verify`] on the blocking thread pool.
    pub async fn verify_blocking(&self, password: &str) -> Result<bool, PasswordHashError> {
        let hash = self.clone();
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || hash.verify(&password))
            .await
            .map_err(hashing_error)
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

fn hashing_error(error: impl std::fmt::Display) -> PasswordHashError {
    PasswordHashError::Hashing {
        message: error.to_string(),
    }
}
