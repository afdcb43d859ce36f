//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the registration and check-in backend.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Actor construction from the identity headers set by the auth layer
//! - Error translation from domain to HTTP status codes
//! - CORS configuration for frontend integration
//!
//! ## Design Principles
//!
//! - **Thin Handlers**: Map the request, call one service, map the result
//! - **Error Transparency**: Validation failures carry the offending field;
//!   infrastructure failures return a generic body and log the detail
//! - **Domain Separation**: Pure translation layer without business logic

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::domain::actor::Actor;
use crate::domain::errors::DomainError;
use crate::domain::models::Role;
use shared::ErrorBody;

pub mod checkin_apis;
pub mod credential_apis;
pub mod guardian_apis;
pub mod mappers;
pub mod notification_apis;
pub mod registrant_apis;

pub use checkin_apis::*;
pub use credential_apis::*;
pub use guardian_apis::*;
pub use notification_apis::*;
pub use registrant_apis::*;

/// Build the acting identity from the headers installed by the auth layer
/// in front of this service. A missing id means the request never passed
/// that layer. An unknown role string falls back to the weakest role.
pub(crate) fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, DomainError> {
    let guardian_id = headers
        .get("x-guardian-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DomainError::Authorization("act without an identity".to_string()))?;

    let role = headers
        .get("x-guardian-role")
        .and_then(|value| value.to_str().ok())
        .and_then(Role::parse)
        .unwrap_or(Role::Guardian);

    Ok(Actor {
        guardian_id: guardian_id.to_string(),
        role,
    })
}

/// Map a domain error to its HTTP response. Caller mistakes keep their
/// message; infrastructure faults get a generic body so internals stay out
/// of responses (handlers log the detail).
pub(crate) fn error_response(error: DomainError) -> Response {
    match &error {
        DomainError::Validation { field, .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: error.to_string(),
                field: Some(field.clone()),
            }),
        )
            .into_response(),
        DomainError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: error.to_string(),
                field: None,
            }),
        )
            .into_response(),
        DomainError::Authorization(_) => (
            StatusCode::FORBIDDEN,
            Json(ErrorBody {
                error: error.to_string(),
                field: None,
            }),
        )
            .into_response(),
        DomainError::Persistence(_) | DomainError::Encoding(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "internal error".to_string(),
                field: None,
            }),
        )
            .into_response(),
        DomainError::Storage(_) | DomainError::Dispatch(_) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorBody {
                error: "upstream failure".to_string(),
                field: None,
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_actor_from_headers_reads_id_and_role() {
        let mut headers = HeaderMap::new();
        headers.insert("x-guardian-id", HeaderValue::from_static("guardian::a"));
        headers.insert("x-guardian-role", HeaderValue::from_static("admin"));

        let actor = actor_from_headers(&headers).expect("actor");
        assert_eq!(actor.guardian_id, "guardian::a");
        assert!(actor.is_admin());
    }

    #[test]
    fn test_actor_defaults_to_guardian_role() {
        let mut headers = HeaderMap::new();
        headers.insert("x-guardian-id", HeaderValue::from_static("guardian::a"));
        headers.insert("x-guardian-role", HeaderValue::from_static("superuser"));

        let actor = actor_from_headers(&headers).expect("actor");
        assert!(!actor.is_admin());
    }

    #[test]
    fn test_missing_identity_is_refused() {
        let headers = HeaderMap::new();
        assert!(actor_from_headers(&headers).is_err());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            error_response(DomainError::validation("age", "not a number")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(DomainError::NotFound("registrant::x".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(DomainError::Authorization("toggle attendance".to_string())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_response(DomainError::Persistence(anyhow::anyhow!("db gone"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_response(DomainError::Storage(anyhow::anyhow!("bucket gone"))).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
