//! # REST API for Guardian Management
//!
//! Endpoints for creating and retrieving guardian accounts.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::io::rest::error_response;
use crate::io::rest::mappers::GuardianMapper;
use crate::AppState;
use shared::CreateGuardianRequest;

/// Create a new guardian account record
pub async fn create_guardian(
    State(state): State<AppState>,
    Json(request): Json<CreateGuardianRequest>,
) -> impl IntoResponse {
    info!("POST /api/guardians - email: {}", request.email);

    let command = GuardianMapper::to_create_command(request);
    match state.guardian_service.create_guardian(command).await {
        Ok(guardian) => (
            StatusCode::CREATED,
            Json(GuardianMapper::to_guardian_response(
                guardian,
                "Guardian created successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create guardian: {}", e);
            error_response(e)
        }
    }
}

/// Get a guardian by ID
pub async fn get_guardian(
    State(state): State<AppState>,
    axum::extract::Path(guardian_id): axum::extract::Path<String>,
) -> impl IntoResponse {
    info!("GET /api/guardians/{}", guardian_id);

    match state.guardian_service.get_guardian(&guardian_id).await {
        Ok(guardian) => (StatusCode::OK, Json(GuardianMapper::to_dto(guardian))).into_response(),
        Err(e) => {
            error!("Failed to get guardian: {}", e);
            error_response(e)
        }
    }
}
