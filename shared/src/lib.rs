use serde::{Deserialize, Serialize};

/// Registrant ID in format: "registrant::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registrant {
    pub id: String,
    /// ID of the guardian this registrant belongs to
    pub owner_id: String,
    /// Registrant name as entered on the registration form
    pub name: String,
    pub age: i64,
    pub grade: String,
    /// Date of birth (YYYY-MM-DD) if provided
    pub dob: Option<String>,
    /// Contact email used for credential delivery (stored exactly as entered)
    pub email: String,
    /// Contact phone used for credential delivery (stored exactly as entered)
    pub phone: String,
    pub medical_notes: Option<String>,
    /// Public URL of the registrant photo, if one was uploaded
    pub photo_url: Option<String>,
    pub tshirt_size: Option<String>,
    pub picture_consent: bool,
    pub needs_transportation: bool,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    /// Public URL of the check-in QR credential; None while still pending
    pub credential: Option<String>,
    pub credential_status: CredentialStatus,
    pub attendance: AttendanceStatus,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Lifecycle of the check-in credential attached to a registrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialStatus {
    /// Row exists but the credential has not been attached yet
    Pending,
    /// Credential generated, uploaded, and linked
    Ready,
}

/// Whether a registrant is currently checked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Out,
    In,
}

/// Role carried by a guardian account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Guardian,
    Admin,
}

/// Guardian ID in format: "guardian::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

/// Form-shaped registration request. `age` arrives as the raw form string and
/// is validated server-side ("not a number" rather than a deserialize failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRegistrantRequest {
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

/// Partial update of a registrant. Absent fields are left unchanged.
/// Attendance and credential state are never updatable through this request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateRegistrantRequest {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrantResponse {
    pub registrant: Registrant,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrantListResponse {
    pub registrants: Vec<Registrant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGuardianRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Defaults to Guardian when absent
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianResponse {
    pub guardian: Guardian,
    pub success_message: String,
}

/// Result of toggling a registrant's check-in state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleAttendanceResponse {
    pub registrant_id: String,
    pub attendance: AttendanceStatus,
    /// "Child checked in" or "Child checked out"
    pub success_message: String,
}

/// Request credential delivery to every registrant whose stored email matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCredentialsRequest {
    pub email: String,
}

/// Request credential delivery to every registrant whose stored phone matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCredentialsRequest {
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// Number of registrants that matched the contact value
    pub matched: usize,
    /// Whether a message was actually handed to the transport
    pub dispatched: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub repaired: u32,
    pub failed: u32,
    pub success_message: String,
}

/// Request an inline SVG credential for the app-token flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppTokenCredentialRequest {
    pub endpoint: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppTokenCredentialResponse {
    pub svg: String,
}

/// Error body returned by the REST layer. `field` is set for validation
/// failures so forms can highlight the offending input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub field: Option<String>,
}
