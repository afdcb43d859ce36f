//! # REST API for Check-in
//!
//! The single attendance toggle used by the check-in desk after a QR scan.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::domain::commands::checkin::ToggleCommand;
use crate::io::rest::mappers::RegistrantMapper;
use crate::io::rest::{actor_from_headers, error_response};
use crate::AppState;
use shared::ToggleAttendanceResponse;

/// Toggle a registrant between checked in and checked out
pub async fn toggle_attendance(
    State(state): State<AppState>,
    axum::extract::Path(registrant_id): axum::extract::Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("POST /api/registrants/{}/toggle", registrant_id);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    let command = ToggleCommand {
        registrant_id,
        actor,
    };
    match state.checkin_service.toggle(command).await {
        Ok(result) => (
            StatusCode::OK,
            Json(ToggleAttendanceResponse {
                registrant_id: result.registrant_id,
                attendance: RegistrantMapper::attendance_to_dto(result.attendance),
                success_message: result.message,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to toggle attendance: {}", e);
            error_response(e)
        }
    }
}
