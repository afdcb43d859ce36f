//! Domain-level command and result types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod registrations {
    use crate::domain::actor::Actor;

    /// Input for registering a new registrant. Form-valued fields (`age`,
    /// `dob`) stay raw strings here; validation decides whether they parse.
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub actor: Actor,
        pub name: String,
        pub age: String,
        pub grade: String,
        pub dob: Option<String>,
        pub email: String,
        pub phone: String,
        pub medical_notes: Option<String>,
        pub tshirt_size: Option<String>,
        pub picture_consent: Option<bool>,
        pub needs_transportation: Option<bool>,
        pub emergency_contact_name: Option<String>,
        pub emergency_contact_phone: Option<String>,
    }

    /// Partial update of a registrant's descriptive fields. Attendance and
    /// credential state have no spelling here on purpose.
    #[derive(Debug, Clone)]
    pub struct UpdateRegistrantCommand {
        pub actor: Actor,
        pub registrant_id: String,
        pub name: Option<String>,
        pub age: Option<String>,
        pub grade: Option<String>,
        pub dob: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub medical_notes: Option<String>,
        pub tshirt_size: Option<String>,
        pub picture_consent: Option<bool>,
        pub needs_transportation: Option<bool>,
        pub emergency_contact_name: Option<String>,
        pub emergency_contact_phone: Option<String>,
    }

    /// Raw photo upload for a registrant.
    #[derive(Debug, Clone)]
    pub struct AttachPhotoCommand {
        pub actor: Actor,
        pub registrant_id: String,
        pub bytes: Vec<u8>,
    }

    /// Result of re-running credential generation for rows left pending.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ReconcileOutcome {
        pub repaired: u32,
        pub failed: u32,
    }
}

pub mod checkin {
    use crate::domain::actor::Actor;
    use crate::domain::models::AttendanceStatus;

    /// Input for flipping a registrant's attendance.
    #[derive(Debug, Clone)]
    pub struct ToggleCommand {
        pub registrant_id: String,
        pub actor: Actor,
    }

    /// Result of a toggle. `message` is the operator-facing confirmation.
    #[derive(Debug, Clone)]
    pub struct ToggleResult {
        pub registrant_id: String,
        pub attendance: AttendanceStatus,
        pub message: String,
    }
}

pub mod notifications {
    use crate::domain::actor::Actor;

    /// Deliver credentials to every registrant whose stored email matches.
    #[derive(Debug, Clone)]
    pub struct EmailCredentialsCommand {
        pub actor: Actor,
        pub email: String,
    }

    /// Deliver credentials to every registrant whose stored phone matches.
    #[derive(Debug, Clone)]
    pub struct TextCredentialsCommand {
        pub actor: Actor,
        pub phone: String,
    }

    /// What a dispatch attempt did. A contact with no matches is a no-op,
    /// not an error.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DispatchOutcome {
        pub matched: usize,
        pub dispatched: bool,
    }

    /// One registrant's line in an outbound message.
    #[derive(Debug, Clone)]
    pub struct RegistrantSummary {
        pub label: String,
        pub credential_ref: String,
    }
}

pub mod guardians {
    use crate::domain::models::Role;

    /// Input for creating a guardian account record.
    #[derive(Debug, Clone)]
    pub struct CreateGuardianCommand {
        pub name: String,
        pub email: String,
        pub phone: String,
        /// Defaults to `Role::Guardian` when absent.
        pub role: Option<Role>,
    }
}
