//! # REST API for Registrant Management
//!
//! Endpoints for creating, retrieving, updating, and deleting registrants,
//! plus the photo upload.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::domain::commands::registrations::AttachPhotoCommand;
use crate::io::rest::mappers::RegistrantMapper;
use crate::io::rest::{actor_from_headers, error_response};
use crate::AppState;
use shared::{CreateRegistrantRequest, UpdateRegistrantRequest};

/// Register a new registrant and issue their credential
pub async fn create_registrant(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRegistrantRequest>,
) -> impl IntoResponse {
    info!("POST /api/registrants - request: {:?}", request);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    let command = RegistrantMapper::to_register_command(request, actor);
    match state.registration_service.register(command).await {
        Ok(registrant) => (
            StatusCode::CREATED,
            Json(RegistrantMapper::to_registrant_response(
                registrant,
                "Registrant created successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create registrant: {}", e);
            error_response(e)
        }
    }
}

/// Get a registrant by ID
pub async fn get_registrant(
    State(state): State<AppState>,
    axum::extract::Path(registrant_id): axum::extract::Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("GET /api/registrants/{}", registrant_id);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    match state
        .registration_service
        .get_registrant(&registrant_id, &actor)
        .await
    {
        Ok(registrant) => {
            (StatusCode::OK, Json(RegistrantMapper::to_dto(registrant))).into_response()
        }
        Err(e) => {
            error!("Failed to get registrant: {}", e);
            error_response(e)
        }
    }
}

/// List registrants visible to the actor
pub async fn list_registrants(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("GET /api/registrants");

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    match state.registration_service.list_registrants(&actor).await {
        Ok(registrants) => {
            (StatusCode::OK, Json(RegistrantMapper::to_list_dto(registrants))).into_response()
        }
        Err(e) => {
            error!("Failed to list registrants: {}", e);
            error_response(e)
        }
    }
}

/// Update a registrant's descriptive fields
pub async fn update_registrant(
    State(state): State<AppState>,
    axum::extract::Path(registrant_id): axum::extract::Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateRegistrantRequest>,
) -> impl IntoResponse {
    info!("PUT /api/registrants/{} - request: {:?}", registrant_id, request);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    let command = RegistrantMapper::to_update_command(&registrant_id, request, actor);
    match state.registration_service.update_registrant(command).await {
        Ok(registrant) => (
            StatusCode::OK,
            Json(RegistrantMapper::to_registrant_response(
                registrant,
                "Registrant updated successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update registrant: {}", e);
            error_response(e)
        }
    }
}

/// Delete a registrant
pub async fn delete_registrant(
    State(state): State<AppState>,
    axum::extract::Path(registrant_id): axum::extract::Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("DELETE /api/registrants/{}", registrant_id);

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    match state
        .registration_service
        .delete_registrant(&registrant_id, &actor)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete registrant: {}", e);
            error_response(e)
        }
    }
}

/// Attach a photo from a raw body upload
pub async fn attach_photo(
    State(state): State<AppState>,
    axum::extract::Path(registrant_id): axum::extract::Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    info!(
        "POST /api/registrants/{}/photo - {} bytes",
        registrant_id,
        body.len()
    );

    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return error_response(e),
    };

    let command = AttachPhotoCommand {
        actor,
        registrant_id,
        bytes: body.to_vec(),
    };
    match state.registration_service.attach_photo(command).await {
        Ok(registrant) => (
            StatusCode::OK,
            Json(RegistrantMapper::to_registrant_response(
                registrant,
                "Photo attached successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to attach photo: {}", e);
            error_response(e)
        }
    }
}
