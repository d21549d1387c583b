use axum::{extract::State, response::IntoResponse, Extension, Json};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::session::Session,
    services::advice as advice_service,
    state::AppState,
};

/// The request payload for an advice prediction.
#[derive(Deserialize, Validate)]
pub struct AdviceRequest {
    #[garde(length(min = 1))]
    pub symptoms: Vec<String>,
}

/// The response payload carrying the advice text.
#[derive(Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// Handles an advice prediction request.
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<AdviceRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Please enter symptoms to get advice.".to_string()))?;

    tracing::info!("🩺 Advice request from user: {}", session.user_id);

    let advice = advice_service::get_advice(&state, &payload.symptoms).await?;

    Ok(Json(AdviceResponse { advice }))
}
