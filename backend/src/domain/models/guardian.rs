use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An account that owns registrants. Login and session handling live in the
/// auth layer in front of this service; only the identity and role are
/// modeled here.
#[derive(Debug, Clone, PartialEq)]
pub struct Guardian {
    /// Stable ID in format "guardian::<uuid>".
    pub id: String,
    pub name: String,
    /// Unique across guardians.
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guardian {
    pub fn generate_id() -> String {
        format!("guardian::{}", Uuid::new_v4())
    }
}

/// Capability tier of a guardian account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guardian,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guardian => "guardian",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "guardian" => Some(Role::Guardian),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}
