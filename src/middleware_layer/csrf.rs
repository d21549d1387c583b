use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tower_cookies::Cookies;

use crate::{error::AppError, state::AppState};

use redis::AsyncCommands;

/// A middleware that verifies the CSRF double-submit token.
///
/// The cookie and the `x-csrf-token` header must carry the same token, and
/// the token must still be known to Redis. Token equality is checked in
/// constant time.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `req` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an error `AppError`.
pub async fn verify_csrf(
    State(mut state): State<AppState>,
    cookies: Cookies,
    req: Request,
    next: Next,
) -> Response {
    if req.method() == Method::GET
        || req.method() == Method::HEAD
        || req.method() == Method::OPTIONS
    {
        return next.run(req).await;
    }

    let csrf_token_cookie = match cookies.get("csrf_token") {
        Some(c) => c.value().to_string(),
        None => {
            tracing::warn!("❌ CSRF: csrf_token cookie not found");
            return AppError::Authentication("Missing CSRF token cookie".to_string())
                .into_response();
        }
    };

    let headers = req.headers();
    let csrf_token_header = match headers.get("x-csrf-token") {
        Some(token) => match token.to_str() {
            Ok(t) => t.to_string(),
            Err(_) => {
                tracing::warn!("❌ CSRF: header has an invalid format");
                return AppError::Authentication("Invalid CSRF token format".to_string())
                    .into_response();
            }
        },
        None => {
            tracing::warn!("❌ CSRF: x-csrf-token header not found");
            return AppError::Authentication("Missing CSRF token header".to_string())
                .into_response();
        }
    };

    let tokens_match: bool = csrf_token_cookie
        .as_bytes()
        .ct_eq(csrf_token_header.as_bytes())
        .into();
    if !tokens_match {
        tracing::warn!("❌ CSRF: tokens do not match");
        return AppError::Authentication("CSRF token mismatch".to_string()).into_response();
    }

    let csrf_key = format!("csrf:{}", csrf_token_cookie);

    match state.redis.get::<_, Option<String>>(&csrf_key).await {
        Ok(Some(_)) => {
            tracing::debug!("✅ CSRF token valid");
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!("❌ CSRF: token expired or unknown");
            AppError::Authentication("CSRF token expired or invalid".to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("❌ CSRF: Redis error: {}", e);
            AppError::Redis(e).into_response()
        }
    }
}
