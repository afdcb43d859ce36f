//! Guardian account records.
//!
//! Registration leans on this service for the owner-exists check; the
//! authentication layer in front of the API owns passwords and sessions and
//! is not modeled here.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::guardians::CreateGuardianCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::{Guardian, Role};
use crate::domain::registration_service::{EMAIL_SHAPE, PHONE_SHAPE};
use crate::storage::GuardianStorage;

/// Service for managing guardian accounts
#[derive(Clone)]
pub struct GuardianService {
    guardians: Arc<dyn GuardianStorage>,
}

impl GuardianService {
    pub fn new(guardians: Arc<dyn GuardianStorage>) -> Self {
        Self { guardians }
    }

    /// Create a guardian. Emails are unique across guardians; the role
    /// defaults to `Guardian` when the command leaves it out.
    pub async fn create_guardian(
        &self,
        command: CreateGuardianCommand,
    ) -> Result<Guardian, DomainError> {
        info!("Creating guardian: {}", command.email);

        self.validate_create(&command)?;

        let email = command.email.trim();
        let existing = self
            .guardians
            .get_guardian_by_email(email)
            .await
            .map_err(DomainError::Persistence)?;
        if existing.is_some() {
            warn!("Guardian email already registered: {}", email);
            return Err(DomainError::validation("email", "already registered"));
        }

        let now = Utc::now();
        let guardian = Guardian {
            id: Guardian::generate_id(),
            name: command.name.trim().to_string(),
            email: email.to_string(),
            phone: command.phone.trim().to_string(),
            role: command.role.unwrap_or(Role::Guardian),
            created_at: now,
            updated_at: now,
        };

        self.guardians
            .store_guardian(&guardian)
            .await
            .map_err(DomainError::Persistence)?;

        info!("Created guardian: {} with ID: {}", guardian.email, guardian.id);

        Ok(guardian)
    }

    /// Get a guardian by ID.
    pub async fn get_guardian(&self, guardian_id: &str) -> Result<Guardian, DomainError> {
        self.guardians
            .get_guardian(guardian_id)
            .await
            .map_err(DomainError::Persistence)?
            .ok_or_else(|| {
                warn!("Guardian not found: {}", guardian_id);
                DomainError::NotFound(guardian_id.to_string())
            })
    }

    /// Get a guardian by email.
    pub async fn get_guardian_by_email(&self, email: &str) -> Result<Guardian, DomainError> {
        self.guardians
            .get_guardian_by_email(email)
            .await
            .map_err(DomainError::Persistence)?
            .ok_or_else(|| {
                warn!("Guardian not found for email: {}", email);
                DomainError::NotFound(email.to_string())
            })
    }

    fn validate_create(&self, command: &CreateGuardianCommand) -> Result<(), DomainError> {
        if command.name.trim().is_empty() {
            return Err(DomainError::validation("name", "required"));
        }

        let email = command.email.trim();
        if email.is_empty() {
            return Err(DomainError::validation("email", "required"));
        }
        if !EMAIL_SHAPE.is_match(email) {
            return Err(DomainError::validation("email", "invalid"));
        }

        let phone = command.phone.trim();
        if phone.is_empty() {
            return Err(DomainError::validation("phone", "required"));
        }
        if !PHONE_SHAPE.is_match(phone) {
            return Err(DomainError::validation("phone", "invalid"));
        }

        Ok(())
    }
}
