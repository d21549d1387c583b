use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a user in the system.
///
/// Records are created by signup and never updated or deleted afterwards.
/// `username` and `email` are unique; uniqueness is enforced by the
/// database constraints, not by application-level checks alone.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's hashed password (Argon2id PHC string, per-record salt).
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}
