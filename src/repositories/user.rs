use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// Conflict message when the username is already registered.
pub const USERNAME_TAKEN: &str = "Username already exists. Please choose a different username.";
/// Conflict message when the email is already registered.
pub const EMAIL_TAKEN: &str = "Email already exists. Please log in.";

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Maps a unique-constraint violation back to the conflicting field.
///
/// The application pre-checks both fields for friendlier ordering, but the
/// constraint is what makes concurrent registrations safe: the losing racer
/// lands here and still receives a conflict, not a 500.
fn map_unique_violation(e: tokio_postgres::Error) -> AppError {
    if let Some(db_err) = e.as_db_error() {
        if db_err.code() == &SqlState::UNIQUE_VIOLATION {
            return match db_err.constraint() {
                Some("users_username_key") => AppError::Conflict(USERNAME_TAKEN.to_string()),
                Some("users_email_key") => AppError::Conflict(EMAIL_TAKEN.to_string()),
                _ => AppError::Conflict("Account already exists.".to_string()),
            };
        }
    }
    AppError::Database(e)
}

/// Inserts a new user record.
pub async fn insert(
    pool: &Pool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
            &[&username, &email, &password_hash],
        )
        .await
        .map_err(map_unique_violation)?;
    row_to_user(&row)
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
            &[&email],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Finds a user by their username.
pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
            &[&username],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}
