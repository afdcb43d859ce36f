//! Attendance toggling at the check-in desk.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::checkin::{ToggleCommand, ToggleResult};
use crate::domain::errors::DomainError;
use crate::domain::models::AttendanceStatus;
use crate::storage::RegistrantStorage;

/// Service for flipping registrants between checked in and checked out
#[derive(Clone)]
pub struct CheckinService {
    registrants: Arc<dyn RegistrantStorage>,
}

impl CheckinService {
    pub fn new(registrants: Arc<dyn RegistrantStorage>) -> Self {
        Self { registrants }
    }

    /// Toggle a registrant's attendance. Out flips to In and In flips to
    /// Out; there is no other transition. Only the attendance column is
    /// written.
    pub async fn toggle(&self, command: ToggleCommand) -> Result<ToggleResult, DomainError> {
        if !command.actor.can_toggle_attendance() {
            warn!(
                "Guardian {} denied attendance toggle for {}",
                command.actor.guardian_id, command.registrant_id
            );
            return Err(DomainError::Authorization("toggle attendance".to_string()));
        }

        let registrant = self
            .registrants
            .get_registrant(&command.registrant_id)
            .await
            .map_err(DomainError::Persistence)?
            .ok_or_else(|| {
                warn!("Registrant not found: {}", command.registrant_id);
                DomainError::NotFound(command.registrant_id.clone())
            })?;

        let next = registrant.attendance.toggled();
        self.registrants
            .set_attendance(&registrant.id, next, Utc::now())
            .await
            .map_err(DomainError::Persistence)?;

        let message = match next {
            AttendanceStatus::In => "Child checked in",
            AttendanceStatus::Out => "Child checked out",
        };

        info!("{}: {}", message, registrant.id);

        Ok(ToggleResult {
            registrant_id: registrant.id,
            attendance: next,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Actor;
    use crate::domain::commands::registrations::RegisterCommand;
    use crate::domain::credential::CredentialStyle;
    use crate::domain::models::{Guardian, Role};
    use crate::domain::registration_service::RegistrationService;
    use crate::storage::objects::MemoryObjectStore;
    use crate::storage::sqlite::{DbConnection, GuardianRepository, RegistrantRepository};
    use crate::storage::GuardianStorage;

    async fn setup_test() -> (CheckinService, RegistrationService, String) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        let registrants = Arc::new(RegistrantRepository::new(db.clone()));
        let guardians = Arc::new(GuardianRepository::new(db));

        let now = Utc::now();
        let guardian = Guardian {
            id: Guardian::generate_id(),
            name: "Pat Example".to_string(),
            email: "pat@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            role: Role::Guardian,
            created_at: now,
            updated_at: now,
        };
        guardians
            .store_guardian(&guardian)
            .await
            .expect("Failed to seed guardian");

        let registration = RegistrationService::new(
            registrants.clone(),
            guardians,
            Arc::new(MemoryObjectStore::new()),
            CredentialStyle::default(),
            false,
        );
        let checkin = CheckinService::new(registrants);

        (checkin, registration, guardian.id)
    }

    async fn register_alice(registration: &RegistrationService, guardian_id: &str) -> String {
        let registrant = registration
            .register(RegisterCommand {
                actor: Actor::guardian(guardian_id),
                name: "Alice".to_string(),
                age: "9".to_string(),
                grade: "4th".to_string(),
                dob: None,
                email: "parent@example.com".to_string(),
                phone: "555-123-4567".to_string(),
                medical_notes: None,
                tshirt_size: None,
                picture_consent: None,
                needs_transportation: None,
                emergency_contact_name: None,
                emergency_contact_phone: None,
            })
            .await
            .expect("Failed to register");
        registrant.id
    }

    #[tokio::test]
    async fn test_toggle_checks_in_then_out() {
        let (checkin, registration, guardian_id) = setup_test().await;
        let registrant_id = register_alice(&registration, &guardian_id).await;
        let staff = Actor::admin("guardian::staff");

        let first = checkin
            .toggle(ToggleCommand {
                registrant_id: registrant_id.clone(),
                actor: staff.clone(),
            })
            .await
            .expect("toggle in");
        assert_eq!(first.attendance, AttendanceStatus::In);
        assert_eq!(first.message, "Child checked in");

        let second = checkin
            .toggle(ToggleCommand {
                registrant_id: registrant_id.clone(),
                actor: staff,
            })
            .await
            .expect("toggle out");
        assert_eq!(second.attendance, AttendanceStatus::Out);
        assert_eq!(second.message, "Child checked out");
    }

    #[tokio::test]
    async fn test_toggle_requires_admin() {
        let (checkin, registration, guardian_id) = setup_test().await;
        let registrant_id = register_alice(&registration, &guardian_id).await;

        let err = checkin
            .toggle(ToggleCommand {
                registrant_id: registrant_id.clone(),
                actor: Actor::guardian(&guardian_id),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));

        // The denied call must not have written anything.
        let loaded = registration
            .get_registrant(&registrant_id, &Actor::guardian(&guardian_id))
            .await
            .expect("get");
        assert_eq!(loaded.attendance, AttendanceStatus::Out);
    }

    #[tokio::test]
    async fn test_toggle_missing_registrant_is_not_found() {
        let (checkin, _, _) = setup_test().await;

        let err = checkin
            .toggle(ToggleCommand {
                registrant_id: "registrant::missing".to_string(),
                actor: Actor::admin("guardian::staff"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_leaves_other_fields_alone() {
        let (checkin, registration, guardian_id) = setup_test().await;
        let registrant_id = register_alice(&registration, &guardian_id).await;

        checkin
            .toggle(ToggleCommand {
                registrant_id: registrant_id.clone(),
                actor: Actor::admin("guardian::staff"),
            })
            .await
            .expect("toggle");

        let loaded = registration
            .get_registrant(&registrant_id, &Actor::guardian(&guardian_id))
            .await
            .expect("get");
        assert_eq!(loaded.name, "Alice");
        assert!(loaded.credential.is_some());
        assert_eq!(loaded.attendance, AttendanceStatus::In);
    }
}
