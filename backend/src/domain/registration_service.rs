//! The registration pipeline, from form intake to issued credential.
//!
//! `register` persists the row first and attaches the credential second, so
//! an object-store outage can never lose a registration. Rows left behind by
//! a failed attach stay `Pending` and are repaired by `reconcile_pending`.

use chrono::{NaiveDate, Utc};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::domain::actor::Actor;
use crate::domain::commands::registrations::{
    AttachPhotoCommand, ReconcileOutcome, RegisterCommand, UpdateRegistrantCommand,
};
use crate::domain::credential::{self, CredentialStyle};
use crate::domain::errors::DomainError;
use crate::domain::images;
use crate::domain::models::{AttendanceStatus, CredentialStatus, Registrant};
use crate::storage::{GuardianStorage, ObjectStore, RegistrantStorage};

/// Accepts anything of the form `local@domain.tld` without whitespace.
pub(crate) static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// North-American forms: `555-123-4567`, `(555) 123-4567`, `5551234567`.
pub(crate) static PHONE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\([0-9]{3}\)|[0-9]{3})[- ]?[0-9]{3}[- ]?[0-9]{4}$")
        .expect("phone pattern is valid")
});

/// Service for registrant intake, credential issue, and record upkeep
#[derive(Clone)]
pub struct RegistrationService {
    registrants: Arc<dyn RegistrantStorage>,
    guardians: Arc<dyn GuardianStorage>,
    objects: Arc<dyn ObjectStore>,
    style: CredentialStyle,
    cleanup_objects_on_delete: bool,
}

impl RegistrationService {
    pub fn new(
        registrants: Arc<dyn RegistrantStorage>,
        guardians: Arc<dyn GuardianStorage>,
        objects: Arc<dyn ObjectStore>,
        style: CredentialStyle,
        cleanup_objects_on_delete: bool,
    ) -> Self {
        Self {
            registrants,
            guardians,
            objects,
            style,
            cleanup_objects_on_delete,
        }
    }

    /// Register a new registrant and issue their check-in credential.
    ///
    /// The row is durable after the first persist; credential encode, upload,
    /// and the `Ready` flip happen after it. A failure in that tail returns
    /// the error to the caller but leaves the `Pending` row in place for
    /// `reconcile_pending`.
    pub async fn register(&self, command: RegisterCommand) -> Result<Registrant, DomainError> {
        info!(
            "Registering {} for guardian {}",
            command.name, command.actor.guardian_id
        );

        // Validate the whole form before touching storage
        let (age, dob) = self.validate_register(&command)?;

        let owner = self
            .guardians
            .get_guardian(&command.actor.guardian_id)
            .await
            .map_err(DomainError::Persistence)?;
        if owner.is_none() {
            warn!("Unknown guardian: {}", command.actor.guardian_id);
            return Err(DomainError::validation("owner", "unknown guardian"));
        }

        let now = Utc::now();
        let mut registrant = Registrant {
            id: Registrant::generate_id(),
            owner_id: command.actor.guardian_id.clone(),
            name: command.name.trim().to_string(),
            age,
            grade: command.grade.trim().to_string(),
            dob,
            email: command.email.trim().to_string(),
            phone: command.phone.trim().to_string(),
            medical_notes: optional_text(&command.medical_notes),
            photo_url: None,
            tshirt_size: optional_text(&command.tshirt_size),
            picture_consent: command.picture_consent.unwrap_or(true),
            needs_transportation: command.needs_transportation.unwrap_or(false),
            emergency_contact_name: optional_text(&command.emergency_contact_name),
            emergency_contact_phone: optional_text(&command.emergency_contact_phone),
            credential: None,
            credential_status: CredentialStatus::Pending,
            attendance: AttendanceStatus::Out,
            created_at: now,
            updated_at: now,
        };

        self.registrants
            .store_registrant(&registrant)
            .await
            .map_err(DomainError::Persistence)?;

        self.issue_credential(&mut registrant).await?;

        info!(
            "Registered {} with ID: {}",
            registrant.name, registrant.id
        );

        Ok(registrant)
    }

    /// Get a registrant, scoped to its owner unless the actor is an admin.
    pub async fn get_registrant(
        &self,
        registrant_id: &str,
        actor: &Actor,
    ) -> Result<Registrant, DomainError> {
        let registrant = self
            .registrants
            .get_registrant(registrant_id)
            .await
            .map_err(DomainError::Persistence)?
            .ok_or_else(|| {
                warn!("Registrant not found: {}", registrant_id);
                DomainError::NotFound(registrant_id.to_string())
            })?;

        if !actor.can_access(&registrant.owner_id) {
            warn!(
                "Guardian {} denied access to registrant {}",
                actor.guardian_id, registrant_id
            );
            return Err(DomainError::Authorization(
                "view this registrant".to_string(),
            ));
        }

        Ok(registrant)
    }

    /// List registrants: the actor's own, or every row for an admin.
    pub async fn list_registrants(&self, actor: &Actor) -> Result<Vec<Registrant>, DomainError> {
        let registrants = if actor.can_view_all() {
            self.registrants.list_all().await
        } else {
            self.registrants.list_by_owner(&actor.guardian_id).await
        }
        .map_err(DomainError::Persistence)?;

        info!(
            "Listed {} registrants for guardian {}",
            registrants.len(),
            actor.guardian_id
        );

        Ok(registrants)
    }

    /// Update a registrant's descriptive fields. Attendance and credential
    /// state are owned by their dedicated operations and never written here.
    pub async fn update_registrant(
        &self,
        command: UpdateRegistrantCommand,
    ) -> Result<Registrant, DomainError> {
        info!("Updating registrant: {}", command.registrant_id);

        let mut registrant = self
            .get_registrant(&command.registrant_id, &command.actor)
            .await?;

        self.apply_update(&mut registrant, &command)?;
        registrant.updated_at = Utc::now();

        self.registrants
            .update_registrant(&registrant)
            .await
            .map_err(DomainError::Persistence)?;

        info!("Updated registrant: {}", registrant.id);

        Ok(registrant)
    }

    /// Delete a registrant. With `cleanup_objects_on_delete` set, also
    /// best-effort delete the credential and photo objects; object-store
    /// failures are logged and never block the row delete.
    pub async fn delete_registrant(
        &self,
        registrant_id: &str,
        actor: &Actor,
    ) -> Result<(), DomainError> {
        info!("Deleting registrant: {}", registrant_id);

        let registrant = self.get_registrant(registrant_id, actor).await?;

        self.registrants
            .delete_registrant(registrant_id)
            .await
            .map_err(DomainError::Persistence)?;

        if self.cleanup_objects_on_delete {
            let credential_key = credential::credential_key(registrant_id);
            if let Err(e) = self.objects.delete(&credential_key).await {
                warn!("Failed to delete credential object {}: {}", credential_key, e);
            }
            if registrant.photo_url.is_some() {
                let photo_key = images::photo_key(registrant_id);
                if let Err(e) = self.objects.delete(&photo_key).await {
                    warn!("Failed to delete photo object {}: {}", photo_key, e);
                }
            }
        }

        info!("Deleted registrant: {}", registrant_id);

        Ok(())
    }

    /// Attach an uploaded photo: enforce the size cap, downscale to the
    /// display bounds, store under the registrant's photo key.
    pub async fn attach_photo(
        &self,
        command: AttachPhotoCommand,
    ) -> Result<Registrant, DomainError> {
        info!(
            "Attaching photo to registrant {} ({} bytes)",
            command.registrant_id,
            command.bytes.len()
        );

        let mut registrant = self
            .get_registrant(&command.registrant_id, &command.actor)
            .await?;

        if command.bytes.len() > images::MAX_UPLOAD_BYTES {
            return Err(DomainError::validation("photo", "exceeds upload limit"));
        }

        let scaled = images::scale_to_fit(
            &command.bytes,
            images::DEFAULT_MAX_WIDTH,
            images::DEFAULT_MAX_HEIGHT,
        )?;

        let key = images::photo_key(&registrant.id);
        let url = self
            .objects
            .put(&key, &scaled, "image/png")
            .await
            .map_err(DomainError::Storage)?;

        let now = Utc::now();
        self.registrants
            .set_photo_url(&registrant.id, &url, now)
            .await
            .map_err(DomainError::Persistence)?;

        registrant.photo_url = Some(url);
        registrant.updated_at = now;

        info!("Attached photo to registrant: {}", registrant.id);

        Ok(registrant)
    }

    /// Re-run credential issue for every row still `Pending`. Admin only.
    /// Failures are counted and logged per row; one bad row never stops the
    /// sweep.
    pub async fn reconcile_pending(&self, actor: &Actor) -> Result<ReconcileOutcome, DomainError> {
        if !actor.is_admin() {
            return Err(DomainError::Authorization(
                "reconcile credentials".to_string(),
            ));
        }

        let pending = self
            .registrants
            .list_pending()
            .await
            .map_err(DomainError::Persistence)?;

        info!("Reconciling {} pending credentials", pending.len());

        let mut outcome = ReconcileOutcome {
            repaired: 0,
            failed: 0,
        };
        for mut registrant in pending {
            match self.issue_credential(&mut registrant).await {
                Ok(()) => outcome.repaired += 1,
                Err(e) => {
                    warn!("Failed to reconcile registrant {}: {}", registrant.id, e);
                    outcome.failed += 1;
                }
            }
        }

        info!(
            "Reconcile complete: {} repaired, {} failed",
            outcome.repaired, outcome.failed
        );

        Ok(outcome)
    }

    /// Inline SVG credential for the app-token flow. Nothing is persisted
    /// or uploaded; the markup goes straight back to the caller.
    pub fn app_token_credential(
        &self,
        endpoint: &str,
        token: &str,
    ) -> Result<String, DomainError> {
        let payload = credential::app_token_payload(endpoint, token);
        credential::encode_svg(&payload, &self.style)
    }

    /// Encode, upload, and mark `Ready`. The model is updated in place so
    /// callers return the post-issue state without a re-read.
    async fn issue_credential(&self, registrant: &mut Registrant) -> Result<(), DomainError> {
        let png = credential::encode_png(&registrant.id, &self.style)?;
        let key = credential::credential_key(&registrant.id);

        let url = self
            .objects
            .put(&key, &png, "image/png")
            .await
            .map_err(DomainError::Storage)?;

        let now = Utc::now();
        self.registrants
            .set_credential(&registrant.id, &url, CredentialStatus::Ready, now)
            .await
            .map_err(DomainError::Persistence)?;

        registrant.credential = Some(url);
        registrant.credential_status = CredentialStatus::Ready;
        registrant.updated_at = now;

        Ok(())
    }

    /// Validate a registration form. Fields are checked in a fixed order and
    /// the first failure is the whole report.
    fn validate_register(
        &self,
        command: &RegisterCommand,
    ) -> Result<(i64, Option<NaiveDate>), DomainError> {
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

        let age = command.age.trim();
        if age.is_empty() {
            return Err(DomainError::validation("age", "required"));
        }
        let age: i64 = age
            .parse()
            .map_err(|_| DomainError::validation("age", "not a number"))?;

        if command.grade.trim().is_empty() {
            return Err(DomainError::validation("grade", "required"));
        }

        let phone = command.phone.trim();
        if phone.is_empty() {
            return Err(DomainError::validation("phone", "required"));
        }
        if !PHONE_SHAPE.is_match(phone) {
            return Err(DomainError::validation("phone", "invalid"));
        }

        let dob = parse_optional_dob(&command.dob)?;

        if let Some(contact_phone) = &command.emergency_contact_phone {
            let contact_phone = contact_phone.trim();
            if !contact_phone.is_empty() && !PHONE_SHAPE.is_match(contact_phone) {
                return Err(DomainError::validation("emergency_contact_phone", "invalid"));
            }
        }

        Ok((age, dob))
    }

    /// Validate and apply the provided fields of an update, in the same
    /// order as registration. Required fields cannot be blanked; optional
    /// text fields are cleared by an empty value.
    fn apply_update(
        &self,
        registrant: &mut Registrant,
        command: &UpdateRegistrantCommand,
    ) -> Result<(), DomainError> {
        if let Some(name) = &command.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name", "required"));
            }
            registrant.name = name.trim().to_string();
        }

        if let Some(email) = &command.email {
            let email = email.trim();
            if email.is_empty() {
                return Err(DomainError::validation("email", "required"));
            }
            if !EMAIL_SHAPE.is_match(email) {
                return Err(DomainError::validation("email", "invalid"));
            }
            registrant.email = email.to_string();
        }

        if let Some(age) = &command.age {
            let age = age.trim();
            if age.is_empty() {
                return Err(DomainError::validation("age", "required"));
            }
            registrant.age = age
                .parse()
                .map_err(|_| DomainError::validation("age", "not a number"))?;
        }

        if let Some(grade) = &command.grade {
            if grade.trim().is_empty() {
                return Err(DomainError::validation("grade", "required"));
            }
            registrant.grade = grade.trim().to_string();
        }

        if let Some(phone) = &command.phone {
            let phone = phone.trim();
            if phone.is_empty() {
                return Err(DomainError::validation("phone", "required"));
            }
            if !PHONE_SHAPE.is_match(phone) {
                return Err(DomainError::validation("phone", "invalid"));
            }
            registrant.phone = phone.to_string();
        }

        if let Some(dob) = &command.dob {
            if dob.trim().is_empty() {
                registrant.dob = None;
            } else {
                registrant.dob = Some(
                    NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d")
                        .map_err(|_| DomainError::validation("dob", "invalid date"))?,
                );
            }
        }

        if let Some(notes) = &command.medical_notes {
            registrant.medical_notes = optional_text(&Some(notes.clone()));
        }
        if let Some(size) = &command.tshirt_size {
            registrant.tshirt_size = optional_text(&Some(size.clone()));
        }
        if let Some(consent) = command.picture_consent {
            registrant.picture_consent = consent;
        }
        if let Some(transportation) = command.needs_transportation {
            registrant.needs_transportation = transportation;
        }
        if let Some(contact_name) = &command.emergency_contact_name {
            registrant.emergency_contact_name = optional_text(&Some(contact_name.clone()));
        }
        if let Some(contact_phone) = &command.emergency_contact_phone {
            let contact_phone = contact_phone.trim();
            if contact_phone.is_empty() {
                registrant.emergency_contact_phone = None;
            } else {
                if !PHONE_SHAPE.is_match(contact_phone) {
                    return Err(DomainError::validation("emergency_contact_phone", "invalid"));
                }
                registrant.emergency_contact_phone = Some(contact_phone.to_string());
            }
        }

        Ok(())
    }
}

/// Trimmed value, with empty collapsing to `None`.
fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_optional_dob(dob: &Option<String>) -> Result<Option<NaiveDate>, DomainError> {
    match dob.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| DomainError::validation("dob", "invalid date"))?,
        )),
        _ => Ok(None),
    }
}
