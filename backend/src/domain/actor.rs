//! The capability claim passed into scoped operations.
//!
//! The auth layer in front of this service decides who the caller is; the
//! domain only consumes the resulting claim. Services check capabilities
//! through these methods instead of comparing role strings inline.

use crate::domain::models::Role;

/// Identity plus role, constructed once at the interface boundary.
#[derive(Debug, Clone)]
pub struct Actor {
    pub guardian_id: String,
    pub role: Role,
}

impl Actor {
    pub fn guardian(guardian_id: &str) -> Self {
        Self {
            guardian_id: guardian_id.to_string(),
            role: Role::Guardian,
        }
    }

    pub fn admin(guardian_id: &str) -> Self {
        Self {
            guardian_id: guardian_id.to_string(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check-in toggles are an admin-desk operation.
    pub fn can_toggle_attendance(&self) -> bool {
        self.is_admin()
    }

    /// Admins see every registrant; guardians only their own.
    pub fn can_view_all(&self) -> bool {
        self.is_admin()
    }

    /// Credential delivery is triggered from the admin desk.
    pub fn can_send_credentials(&self) -> bool {
        self.is_admin()
    }

    /// Owner-scoped access with the admin bypass.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin() || self.guardian_id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guardian_scoped_to_own_rows() {
        let actor = Actor::guardian("guardian::a");
        assert!(actor.can_access("guardian::a"));
        assert!(!actor.can_access("guardian::b"));
        assert!(!actor.can_toggle_attendance());
        assert!(!actor.can_view_all());
        assert!(!actor.can_send_credentials());
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let actor = Actor::admin("guardian::staff");
        assert!(actor.can_access("guardian::someone-else"));
        assert!(actor.can_toggle_attendance());
        assert!(actor.can_view_all());
        assert!(actor.can_send_credentials());
    }
}
