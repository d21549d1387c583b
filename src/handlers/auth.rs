use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use garde::Validate;
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    services::auth as auth_service,
    state::AppState,
    validation,
};

use redis::AsyncCommands;

/// The request payload for user registration.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(custom(validation::auth::username))]
    pub username: String,
    #[garde(custom(validation::auth::email))]
    pub email: String,
    #[garde(custom(validation::auth::password))]
    pub password: String,
    /// Optional confirmation; when present it must equal `password`.
    #[garde(skip)]
    pub confirm_password: Option<String>,
}

/// The request payload for user login.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// The response payload for registration and logout.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
}

/// Creates a secure cookie with the given name, value, and max age.
fn create_secure_cookie(name: String, value: String, max_age_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.clone(), value);

    let is_production =
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()) == "production";

    // The CSRF cookie must stay readable by the frontend for the
    // double-submit header.
    if name != "csrf_token" {
        cookie.set_http_only(true);
    }

    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_days * 86400));
    cookie.set_path("/");

    cookie
}

/// Handles user registration.
///
/// Registration never logs the user in: a successful signup leaves the
/// client anonymous and the session is created at login.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Register attempt for username: {}", payload.username);

    payload
        .validate()
        .map_err(|report| AppError::Validation(report.to_string()))?;

    if let Some(confirm) = payload.confirm_password.as_deref() {
        if confirm != payload.password {
            return Err(AppError::Validation("Passwords do not match!".to_string()));
        }
    }

    let user = auth_service::register(
        &state.db,
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;

    tracing::info!("✅ User registered: {}", user.id);

    let response = AuthResponse {
        success: true,
        message: "Signup successful! Please log in.".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(mut state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for email: {}", payload.email);

    payload
        .validate()
        .map_err(|report| AppError::Validation(report.to_string()))?;

    let user = auth_service::authenticate(&state.db, &payload.email, &payload.password).await?;

    let session_id = Uuid::new_v4();
    tracing::debug!("🔑 Generated session_id: {}", session_id);

    let session = Session {
        user_id: user.id,
        username: user.username.clone(),
        created_at: Utc::now(),
        expires_at: Utc::now() + chrono::Duration::days(state.config.session_duration_days),
    };

    let session_json = sonic_rs::to_string(&session)
        .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

    let expiration_seconds: u64 = (state.config.session_duration_days * 86400) as u64;
    let _: () = state
        .redis
        .set_ex(
            format!("session:{}", session_id),
            &session_json,
            expiration_seconds,
        )
        .await
        .map_err(|e| {
            tracing::error!("❌ Redis set_ex failed: {}", e);
            AppError::Redis(e)
        })?;

    tracing::info!("✅ Session saved to Redis: session:{}", session_id);

    cookies.add(create_secure_cookie(
        "session_id".to_string(),
        session_id.to_string(),
        state.config.session_duration_days,
    ));

    let csrf_token = crate::crypto::csrf::generate_csrf_token();
    let _: () = state
        .redis
        .set_ex(format!("csrf:{}", csrf_token), "valid", 3600)
        .await
        .map_err(|e| {
            tracing::error!("❌ Redis set_ex failed for CSRF: {}", e);
            AppError::Redis(e)
        })?;

    cookies.add(create_secure_cookie("csrf_token".to_string(), csrf_token, 1));

    tracing::info!("✅ User logged in: {}", user.id);

    let response = LoginResponse {
        success: true,
        message: format!("Welcome back, {}!", user.username),
        username: user.username,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles user logout.
#[axum::debug_handler]
pub async fn logout(
    State(mut state): State<AppState>,
    Extension(session): Extension<Session>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", session.user_id);

    let session_id = cookies
        .get("session_id")
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let _: () = state.redis.del(format!("session:{}", session_id)).await?;

    if let Some(csrf_cookie) = cookies.get("csrf_token") {
        let _: () = state
            .redis
            .del(format!("csrf:{}", csrf_cookie.value()))
            .await
            .unwrap_or(());
    }

    let mut session_cookie = Cookie::new("session_id", "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    let mut csrf_cookie = Cookie::new("csrf_token", "");
    csrf_cookie.set_max_age(Duration::seconds(0));
    csrf_cookie.set_path("/");
    cookies.remove(csrf_cookie);

    tracing::info!("✅ User logged out: {}", session.user_id);

    let response = AuthResponse {
        success: true,
        message: "Logged out successfully.".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
