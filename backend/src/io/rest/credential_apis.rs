//! # REST API for Credential Maintenance
//!
//! Reconciliation of pending credentials and the app-token SVG flow.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::io::rest::{actor_from_headers, error_response};
use crate::AppState;
use shared::{AppTokenCredentialRequest, AppTokenCredentialResponse, ReconcileResponse};

/// Re-run credential generation for rows left pending
pub async fn reconcile_credentials(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("POST /api/credentials/reconcile");

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    match state.registration_service.reconcile_pending(&actor).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ReconcileResponse {
                repaired: outcome.repaired,
                failed: outcome.failed,
                success_message: "Reconciliation complete".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to reconcile credentials: {}", e);
            error_response(e)
        }
    }
}

/// Render an inline SVG credential for the app-token flow
pub async fn app_token_credential(
    State(state): State<AppState>,
    Json(request): Json<AppTokenCredentialRequest>,
) -> impl IntoResponse {
    info!("POST /api/credentials/app-token - endpoint: {}", request.endpoint);

    match state
        .registration_service
        .app_token_credential(&request.endpoint, &request.token)
    {
        Ok(svg) => (StatusCode::OK, Json(AppTokenCredentialResponse { svg })).into_response(),
        Err(e) => {
            error!("Failed to encode app-token credential: {}", e);
            error_response(e)
        }
    }
}
