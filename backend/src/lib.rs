//! # Rollcall Backend
//!
//! Event registration and check-in: the pipeline from a submitted form to a
//! stored registrant with an issued QR credential, plus everything operators
//! do with that registrant afterwards (check-in toggling, credential
//! delivery, reconciliation).
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (Database, object store)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with CORS and the asset route
//! - Coordinate between domain logic and data persistence

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::domain::email::{ConsoleEmailSender, EmailSender, SmtpEmailSender};
use crate::domain::images::MAX_UPLOAD_BYTES;
use crate::domain::sms::{ConsoleSmsSender, HttpSmsSender, SmsSender};
use crate::domain::{CheckinService, GuardianService, NotificationService, RegistrationService};
use crate::storage::{DbConnection, FsObjectStore, GuardianRepository, RegistrantRepository};

pub use domain::*;
pub use io::*;
pub use storage::*;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub registration_service: RegistrationService,
    pub checkin_service: CheckinService,
    pub notification_service: NotificationService,
    pub guardian_service: GuardianService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    let registrants = Arc::new(RegistrantRepository::new(db.clone()));
    let guardians = Arc::new(GuardianRepository::new(db));

    info!(
        "Setting up object store at {}",
        config.objects_root.display()
    );
    let objects = Arc::new(FsObjectStore::new(
        config.objects_root.clone(),
        &config.public_base_url,
    ));

    let email: Arc<dyn EmailSender> = match &config.email {
        Some(email_config) => Arc::new(SmtpEmailSender::new(email_config.clone())),
        None => {
            info!("No SMTP server configured, email goes to the log");
            Arc::new(ConsoleEmailSender)
        }
    };
    let sms: Arc<dyn SmsSender> = match &config.sms {
        Some(sms_config) => Arc::new(HttpSmsSender::new(sms_config.clone())),
        None => {
            info!("No SMS gateway configured, texts go to the log");
            Arc::new(ConsoleSmsSender)
        }
    };

    info!("Setting up domain services");
    let registration_service = RegistrationService::new(
        registrants.clone(),
        guardians.clone(),
        objects,
        config.style.clone(),
        config.cleanup_objects_on_delete,
    );
    let checkin_service = CheckinService::new(registrants.clone());
    let notification_service = NotificationService::new(
        registrants,
        email,
        sms,
        config.notifications.clone(),
    );
    let guardian_service = GuardianService::new(guardians);

    Ok(AppState {
        registration_service,
        checkin_service,
        notification_service,
        guardian_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/guardians", post(io::create_guardian))
        .route("/guardians/:guardian_id", get(io::get_guardian))
        .route(
            "/registrants",
            get(io::list_registrants).post(io::create_registrant),
        )
        .route(
            "/registrants/:registrant_id",
            get(io::get_registrant)
                .put(io::update_registrant)
                .delete(io::delete_registrant),
        )
        .route(
            "/registrants/:registrant_id/photo",
            // Slightly above the domain cap so an oversize upload reaches
            // the validation path instead of a bare 413.
            post(io::attach_photo).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1)),
        )
        .route(
            "/registrants/:registrant_id/toggle",
            post(io::toggle_attendance),
        )
        .route("/notifications/email", post(io::email_credentials))
        .route("/notifications/text", post(io::text_credentials))
        .route("/credentials/reconcile", post(io::reconcile_credentials))
        .route("/credentials/app-token", post(io::app_token_credential));

    // Define our main application router; stored objects are served from
    // the filesystem root the object store writes to.
    Router::new()
        .nest("/api", api_routes)
        .nest_service("/assets", ServeDir::new(config.objects_root.clone()))
        .layer(cors)
        .with_state(app_state)
}
