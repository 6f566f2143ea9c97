//! Password hashing with Argon2id and a server-side pepper.

use super::errors::{AuthError, AuthResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Argon2id hasher with pepper
#[derive(Clone)]
pub struct CredentialHasher {
    pepper: String,
    /// Hash checked when no account matches, so unknown emails cost the same as wrong passwords
    decoy_hash: String,
}

impl CredentialHasher {
    /// Create a hasher with the given pepper
    pub fn new(pepper: String) -> AuthResult<Self> {
        let mut hasher = Self {
            pepper,
            decoy_hash: String::new(),
        };
        hasher.decoy_hash = hasher.hash("decoy-password-never-matches")?;
        Ok(hasher)
    }

    /// Hash password with Argon2id + pepper
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default()
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash. Argon2 compares digests in constant time.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let peppered = format!("{}{}", password, self.pepper);
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Burn one verification against the decoy hash
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy_hash);
    }
}
