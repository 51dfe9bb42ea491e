/// Salted, adaptive password hashing (Argon2id with a fixed work factor)
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Memory cost in KiB
const MEMORY_COST_KIB: u32 = 19_456;
/// Number of passes
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Stored password hash is unreadable: {0}")]
    CorruptHash(String),
}

/// One-way password hashing. Nothing outside this type sees a plaintext
/// beyond the call that hands it in.
pub struct PasswordHasher;

impl PasswordHasher {
    fn argon2() -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Self::argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Check a plaintext against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable hash or an internal
    /// failure is an error. The comparison itself is constant time.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;

        match Self::argon2()?.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hashing(e.to_string())),
        }
    }
}
