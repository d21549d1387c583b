use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use deadpool_postgres::Pool;
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// The generic login failure message. Deliberately identical for "no such
/// email" and "wrong password" so accounts cannot be enumerated.
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn argon2() -> Result<Argon2<'static>> {
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    ))
}

/// Hashes a password using Argon2id with a fresh per-record salt.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password as a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2()?
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a stored hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The PHC hash string to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// A hash of a throwaway password, verified against when the email lookup
/// misses so both authentication failure paths hash exactly once.
fn dummy_hash() -> Result<&'static str> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("healthpoint.dummy.password.v1")?;
    Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
}

/// Registers a new user.
///
/// The pre-checks report which field collided, matching the signup flow's
/// messages; a concurrent registration that slips past them is caught by
/// the unique constraints and surfaces as the same conflict.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `username` - The requested username.
/// * `email` - The user's email address.
/// * `password` - The plaintext password to hash and store.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn register(db: &Pool, username: &str, email: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", username);

    if user_repo::find_by_username(db, username).await?.is_some() {
        return Err(AppError::Conflict(user_repo::USERNAME_TAKEN.to_string()));
    }
    if user_repo::find_by_email(db, email).await?.is_some() {
        return Err(AppError::Conflict(user_repo::EMAIL_TAKEN.to_string()));
    }

    let hashed_password = hash_password(password)?;
    let user = user_repo::insert(db, username, email, &hashed_password).await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by email and password.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `email` - The user's email address.
/// * `password` - The plaintext password to check.
///
/// # Returns
///
/// A `Result` containing the authenticated `User`; every failure carries
/// the same generic message.
pub async fn authenticate(db: &Pool, email: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Authenticating email: {}", email);

    let Some(user) = user_repo::find_by_email(db, email).await? else {
        let _ = verify_password(password, dummy_hash()?);
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn hashes_are_salted_per_record() {
        let a = hash_password("SamePassword1!").expect("hashing should succeed");
        let b = hash_password("SamePassword1!").expect("hashing should succeed");
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }

    #[test]
    fn dummy_hash_is_stable_and_verifiable() {
        let first = dummy_hash().expect("dummy hash should build");
        let second = dummy_hash().expect("dummy hash should build");
        assert_eq!(first, second);
        assert!(!verify_password("anything", first).expect("verify should not error"));
    }
}
