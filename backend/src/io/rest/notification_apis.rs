//! # REST API for Credential Delivery
//!
//! Admin-triggered email and SMS dispatch of stored credentials.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::domain::commands::notifications::{EmailCredentialsCommand, TextCredentialsCommand};
use crate::io::rest::{actor_from_headers, error_response};
use crate::AppState;
use shared::{EmailCredentialsRequest, NotificationResponse, TextCredentialsRequest};

/// Email credentials to every registrant stored under the given address
pub async fn email_credentials(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<EmailCredentialsRequest>,
) -> impl IntoResponse {
    info!("POST /api/notifications/email - to: {}", request.email);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    let command = EmailCredentialsCommand {
        actor,
        email: request.email,
    };
    match state.notification_service.email_credentials(command).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(NotificationResponse {
                matched: outcome.matched,
                dispatched: outcome.dispatched,
                success_message: "QR Code sent".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to email credentials: {}", e);
            error_response(e)
        }
    }
}

/// Text credentials to every registrant stored under the given phone number
pub async fn text_credentials(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TextCredentialsRequest>,
) -> impl IntoResponse {
    info!("POST /api/notifications/text - to: {}", request.phone);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    let command = TextCredentialsCommand {
        actor,
        phone: request.phone,
    };
    match state.notification_service.text_credentials(command).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(NotificationResponse {
                matched: outcome.matched,
                dispatched: outcome.dispatched,
                success_message: "QR Code sent".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to text credentials: {}", e);
            error_response(e)
        }
    }
}
