//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different backends without modification. The sqlite repositories are the
//! shipped implementation; tests can substitute their own.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{AttendanceStatus, CredentialStatus, Guardian, Registrant};

/// Interface for registrant persistence.
///
/// Attendance, credential state, and the photo URL are written through
/// dedicated single-column operations; `update_registrant` covers only the
/// descriptive fields. That split is what keeps the edit pipeline and the
/// check-in pipeline from trampling each other.
#[async_trait]
pub trait RegistrantStorage: Send + Sync {
    /// Store a new registrant
    async fn store_registrant(&self, registrant: &Registrant) -> Result<()>;

    /// Retrieve a specific registrant by ID
    async fn get_registrant(&self, registrant_id: &str) -> Result<Option<Registrant>>;

    /// List registrants owned by a guardian, ordered by name
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Registrant>>;

    /// List every registrant, ordered by name
    async fn list_all(&self) -> Result<Vec<Registrant>>;

    /// Update a registrant's descriptive fields
    async fn update_registrant(&self, registrant: &Registrant) -> Result<()>;

    /// Delete a registrant by ID
    async fn delete_registrant(&self, registrant_id: &str) -> Result<()>;

    /// Attach a credential URL and move the lifecycle status
    async fn set_credential(
        &self,
        registrant_id: &str,
        credential: &str,
        status: CredentialStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Flip the attendance column and nothing else
    async fn set_attendance(
        &self,
        registrant_id: &str,
        attendance: AttendanceStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Attach a photo URL
    async fn set_photo_url(
        &self,
        registrant_id: &str,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// All registrants whose stored email equals `email` (raw string match)
    async fn list_by_email(&self, email: &str) -> Result<Vec<Registrant>>;

    /// All registrants whose stored phone equals `phone` (raw string match)
    async fn list_by_phone(&self, phone: &str) -> Result<Vec<Registrant>>;

    /// Rows still waiting for a credential, oldest first
    async fn list_pending(&self) -> Result<Vec<Registrant>>;
}

/// Interface for guardian persistence.
#[async_trait]
pub trait GuardianStorage: Send + Sync {
    /// Store a new guardian
    async fn store_guardian(&self, guardian: &Guardian) -> Result<()>;

    /// Retrieve a specific guardian by ID
    async fn get_guardian(&self, guardian_id: &str) -> Result<Option<Guardian>>;

    /// Retrieve a guardian by unique email
    async fn get_guardian_by_email(&self, email: &str) -> Result<Option<Guardian>>;
}
