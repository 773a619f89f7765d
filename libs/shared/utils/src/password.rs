use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::Value;
use tracing::{instrument, warn};

#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

#[instrument(skip(password, hash))]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Checks `password` against the `password` column of an account row. A
/// missing or malformed stored hash counts as a mismatch.
pub fn password_matches(password: &str, account: &Value) -> bool {
    let hash = account["password"].as_str().unwrap_or_default();
    match verify_password(password, hash) {
        Ok(matched) => matched,
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

/// Removes the stored hash from an account row before it leaves the service.
pub fn without_password(mut account: Value) -> Value {
    if let Some(obj) = account.as_object_mut() {
        obj.remove("password");
    }
    account
}
