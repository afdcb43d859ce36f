//! backend/src/io/rest/mappers/guardian_mapper.rs

use crate::domain::commands::guardians::CreateGuardianCommand;
use crate::domain::models::{Guardian as DomainGuardian, Role as DomainRole};
use shared::{CreateGuardianRequest, Guardian as SharedGuardian, GuardianResponse, Role};

/// Mapper to convert between shared Guardian DTOs and domain models.
pub struct GuardianMapper;

impl GuardianMapper {
    /// Converts a domain Guardian model to a shared Guardian DTO.
    pub fn to_dto(domain: DomainGuardian) -> SharedGuardian {
        SharedGuardian {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            phone: domain.phone,
            role: Self::role_to_dto(domain.role),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_create_command(request: CreateGuardianRequest) -> CreateGuardianCommand {
        CreateGuardianCommand {
            name: request.name,
            email: request.email,
            phone: request.phone,
            role: request.role.map(Self::role_to_domain),
        }
    }

    pub fn to_guardian_response(domain: DomainGuardian, message: &str) -> GuardianResponse {
        GuardianResponse {
            guardian: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn role_to_dto(role: DomainRole) -> Role {
        match role {
            DomainRole::Guardian => Role::Guardian,
            DomainRole::Admin => Role::Admin,
        }
    }

    pub fn role_to_domain(role: Role) -> DomainRole {
        match role {
            Role::Guardian => DomainRole::Guardian,
            Role::Admin => DomainRole::Admin,
        }
    }
}
