//! End-to-end tests against a running server (with PostgreSQL and Redis
//! behind it). Start the stack, then run with `cargo test -- --ignored`.

use std::time::{SystemTime, UNIX_EPOCH};
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use serde_json::json;

static BASE_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("TEST_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
});

static REDIS_CLIENT: Lazy<redis::Client> = Lazy::new(|| {
    let url = std::env::var("TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string());
    redis::Client::open(url).unwrap()
});

async fn get_redis_conn() -> ConnectionManager {
    REDIS_CLIENT.get_connection_manager().await.unwrap()
}

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
}

impl TestContext {
    fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .unwrap(),
            base_url: BASE_URL.clone(),
        }
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const STRONG_PASSWORD: &str = "SecurePass123!@#";

    // Each test registers a few accounts; reset the per-IP counter so the
    // suite doesn't trip its own rate limit.
    async fn setup() {
        let mut con = get_redis_conn().await;
        let _: () = redis::cmd("DEL")
            .arg("rate_limit:register:127.0.0.1")
            .query_async(&mut con)
            .await
            .unwrap();
    }

    async fn register(
        context: &TestContext,
        username: &str,
        email: &str,
        password: &str,
    ) -> reqwest::Response {
        context
            .client
            .post(format!("{}/api/auth/register", context.base_url))
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
                "confirm_password": password
            }))
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a running server with PostgreSQL and Redis"]
    async fn registration_login_and_logout_roundtrip() {
        setup().await;
        let context = TestContext::new();
        let timestamp = TestContext::get_timestamp();
        let username = format!("testuser_{}", timestamp);
        let email = format!("testuser_{}@example.com", timestamp);

        // Registration succeeds and does NOT log the user in.
        let reg_response = register(&context, &username, &email, STRONG_PASSWORD).await;
        assert_eq!(reg_response.status().as_u16(), 201, "Registration failed");
        let reg_body: Value = reg_response.json().await.unwrap();
        assert_eq!(reg_body["message"], "Signup successful! Please log in.");

        // The advice endpoint is still closed before login.
        let advice_response = context
            .client
            .post(format!("{}/api/advice", context.base_url))
            .json(&json!({"symptoms": ["fever"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(advice_response.status().as_u16(), 401);

        // Login by email.
        let login_response = context
            .client
            .post(format!("{}/api/auth/login", context.base_url))
            .json(&json!({
                "email": email,
                "password": STRONG_PASSWORD
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(login_response.status().as_u16(), 200, "Login failed");

        let csrf_token = login_response
            .cookies()
            .find(|c| c.name() == "csrf_token")
            .map(|c| c.value().to_string())
            .expect("login must set a csrf_token cookie");

        let login_body: Value = login_response.json().await.unwrap();
        assert_eq!(login_body["username"], username.as_str());

        // Logout ends the session.
        let logout_response = context
            .client
            .post(format!("{}/api/auth/logout", context.base_url))
            .header("x-csrf-token", &csrf_token)
            .send()
            .await
            .unwrap();
        assert_eq!(logout_response.status().as_u16(), 200, "Logout failed");

        // And the protected surface is closed again.
        let after_logout = context
            .client
            .post(format!("{}/api/advice", context.base_url))
            .json(&json!({"symptoms": ["fever"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(after_logout.status().as_u16(), 401);
    }

    #[tokio::test]
    #[ignore = "requires a running server with PostgreSQL and Redis"]
    async fn duplicate_username_and_email_conflict() {
        setup().await;
        let context = TestContext::new();
        let timestamp = TestContext::get_timestamp();
        let username = format!("testuser_{}", timestamp);
        let email = format!("testuser_{}@example.com", timestamp);

        let first = register(&context, &username, &email, STRONG_PASSWORD).await;
        assert_eq!(first.status().as_u16(), 201);

        // Same username, fresh email.
        let second = register(
            &context,
            &username,
            &format!("other_{}@example.com", timestamp),
            STRONG_PASSWORD,
        )
        .await;
        assert_eq!(second.status().as_u16(), 409);
        let body: Value = second.json().await.unwrap();
        assert_eq!(
            body["error"],
            "Username already exists. Please choose a different username."
        );

        // Fresh username, same email.
        let third = register(
            &context,
            &format!("other_{}", timestamp),
            &email,
            STRONG_PASSWORD,
        )
        .await;
        assert_eq!(third.status().as_u16(), 409);
        let body: Value = third.json().await.unwrap();
        assert_eq!(body["error"], "Email already exists. Please log in.");
    }

    #[tokio::test]
    #[ignore = "requires a running server with PostgreSQL and Redis"]
    async fn concurrent_registration_has_a_single_winner() {
        setup().await;
        let timestamp = TestContext::get_timestamp();
        let username = format!("racer_{}", timestamp);
        let email = format!("racer_{}@example.com", timestamp);

        let a = TestContext::new();
        let b = TestContext::new();

        let (first, second) = tokio::join!(
            register(&a, &username, &email, STRONG_PASSWORD),
            register(&b, &username, &email, STRONG_PASSWORD),
        );

        let mut statuses = [first.status().as_u16(), second.status().as_u16()];
        statuses.sort_unstable();
        assert_eq!(
            statuses,
            [201, 409],
            "exactly one concurrent registration may win"
        );
    }

    #[tokio::test]
    #[ignore = "requires a running server with PostgreSQL and Redis"]
    async fn weak_password_and_bad_email_are_rejected() {
        setup().await;
        let context = TestContext::new();
        let timestamp = TestContext::get_timestamp();

        // No symbol.
        let weak = register(
            &context,
            &format!("weak_{}", timestamp),
            &format!("weak_{}@example.com", timestamp),
            "Abc12345",
        )
        .await;
        assert_eq!(weak.status().as_u16(), 400);

        // No TLD.
        let bad_email = register(
            &context,
            &format!("bademail_{}", timestamp),
            "someone@example",
            STRONG_PASSWORD,
        )
        .await;
        assert_eq!(bad_email.status().as_u16(), 400);

        // Mismatched confirmation.
        let mismatch = context
            .client
            .post(format!("{}/api/auth/register", context.base_url))
            .json(&json!({
                "username": format!("mismatch_{}", timestamp),
                "email": format!("mismatch_{}@example.com", timestamp),
                "password": STRONG_PASSWORD,
                "confirm_password": "Different123!@#"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(mismatch.status().as_u16(), 400);
    }

    #[tokio::test]
    #[ignore = "requires a running server with PostgreSQL and Redis"]
    async fn login_failures_are_generic() {
        setup().await;
        let context = TestContext::new();
        let timestamp = TestContext::get_timestamp();
        let username = format!("generic_{}", timestamp);
        let email = format!("generic_{}@example.com", timestamp);

        let reg = register(&context, &username, &email, STRONG_PASSWORD).await;
        assert_eq!(reg.status().as_u16(), 201);

        // Wrong password vs unknown email: same status, same message.
        let wrong_password = context
            .client
            .post(format!("{}/api/auth/login", context.base_url))
            .json(&json!({"email": email, "password": "WrongPass123!@#"}))
            .send()
            .await
            .unwrap();
        assert_eq!(wrong_password.status().as_u16(), 401);
        let wrong_body: Value = wrong_password.json().await.unwrap();

        let unknown_email = context
            .client
            .post(format!("{}/api/auth/login", context.base_url))
            .json(&json!({
                "email": format!("nobody_{}@example.com", timestamp),
                "password": STRONG_PASSWORD
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(unknown_email.status().as_u16(), 401);
        let unknown_body: Value = unknown_email.json().await.unwrap();

        assert_eq!(wrong_body["error"], unknown_body["error"]);
        assert_eq!(wrong_body["error"], "Invalid email or password.");
    }
}
