use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    services::hospitals as hospitals_service,
    state::AppState,
};

/// The request payload for a hospital search.
#[derive(Deserialize)]
pub struct HospitalSearchRequest {
    pub location: String,
    /// Search radius in meters; defaults to the configured radius.
    pub radius_m: Option<u32>,
    /// Cap on returned hospitals; defaults to the configured limit.
    pub limit: Option<usize>,
}

/// Handles a hospital search request.
#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<HospitalSearchRequest>,
) -> Result<impl IntoResponse> {
    let location = payload.location.trim();
    if location.is_empty() {
        return Err(AppError::Validation(
            "Please enter a location to search for hospitals.".to_string(),
        ));
    }

    let radius_m = payload.radius_m.unwrap_or(state.config.hospital_radius_m);
    let limit = payload.limit.unwrap_or(state.config.hospital_limit);

    tracing::info!(
        "🏥 Hospital search from user {} for '{}'",
        session.user_id,
        location
    );

    let result = hospitals_service::search(&state, location, radius_m, limit).await?;

    Ok(Json(result))
}
