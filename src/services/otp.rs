use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use thiserror::Error;

/// Errors that can occur while preparing a passcode for storage
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("passcode hashing failed: {0}")]
    Hash(String),
}

/// Generate a 6-digit one-time passcode
pub fn generate_passcode() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

/// Hash a passcode for storage; plaintext codes never touch the database
pub fn hash_passcode(passcode: &str) -> Result<String, OtpError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(passcode.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| OtpError::Hash(e.to_string()))
}

/// Check a submitted passcode against the stored hash
pub fn verify_passcode(passcode: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(passcode.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
