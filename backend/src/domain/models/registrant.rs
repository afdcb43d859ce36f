use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A child registered for the event.
///
/// `credential` is `None` exactly while `credential_status` is `Pending`;
/// the registration pipeline attaches it right after the row is created, and
/// reconciliation repairs any row a crash left behind. `attendance` is only
/// ever written by the check-in service.
#[derive(Debug, Clone, PartialEq)]
pub struct Registrant {
    /// Stable ID in format "registrant::<uuid>"; also the QR payload.
    pub id: String,
    /// Owning guardian; immutable after creation.
    pub owner_id: String,
    pub name: String,
    pub age: i64,
    pub grade: String,
    pub dob: Option<NaiveDate>,
    /// Delivery email, stored exactly as entered.
    pub email: String,
    /// Delivery phone, stored exactly as entered.
    pub phone: String,
    pub medical_notes: Option<String>,
    pub photo_url: Option<String>,
    pub tshirt_size: Option<String>,
    pub picture_consent: bool,
    pub needs_transportation: bool,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    /// Public URL of the uploaded QR credential.
    pub credential: Option<String>,
    pub credential_status: CredentialStatus,
    pub attendance: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registrant {
    pub fn generate_id() -> String {
        format!("registrant::{}", Uuid::new_v4())
    }
}

/// Lifecycle of the QR credential attached to a registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Pending,
    Ready,
}

impl CredentialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialStatus::Pending => "pending",
            CredentialStatus::Ready => "ready",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(CredentialStatus::Pending),
            "ready" => Some(CredentialStatus::Ready),
            _ => None,
        }
    }
}

/// Whether a registrant is currently on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Out,
    In,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Out => "out",
            AttendanceStatus::In => "in",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "out" => Some(AttendanceStatus::Out),
            "in" => Some(AttendanceStatus::In),
            _ => None,
        }
    }

    /// The state a toggle moves to. Out and In are the only states, so the
    /// machine has no terminal position.
    pub fn toggled(&self) -> Self {
        match self {
            AttendanceStatus::Out => AttendanceStatus::In,
            AttendanceStatus::In => AttendanceStatus::Out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_has_registrant_prefix() {
        let id = Registrant::generate_id();
        assert!(id.starts_with("registrant::"));
        assert_ne!(id, Registrant::generate_id());
    }

    #[test]
    fn test_attendance_toggles_both_ways() {
        assert_eq!(AttendanceStatus::Out.toggled(), AttendanceStatus::In);
        assert_eq!(AttendanceStatus::In.toggled(), AttendanceStatus::Out);
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [CredentialStatus::Pending, CredentialStatus::Ready] {
            assert_eq!(CredentialStatus::parse(status.as_str()), Some(status));
        }
        for status in [AttendanceStatus::Out, AttendanceStatus::In] {
            assert_eq!(AttendanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CredentialStatus::parse("READY"), None);
    }
}
