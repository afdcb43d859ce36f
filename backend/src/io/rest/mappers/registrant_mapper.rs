//! backend/src/io/rest/mappers/registrant_mapper.rs

use crate::domain::actor::Actor;
use crate::domain::commands::registrations::{RegisterCommand, UpdateRegistrantCommand};
use crate::domain::models::{
    AttendanceStatus as DomainAttendanceStatus, CredentialStatus as DomainCredentialStatus,
    Registrant as DomainRegistrant,
};
use shared::{
    AttendanceStatus, CreateRegistrantRequest, CredentialStatus, Registrant as SharedRegistrant,
    RegistrantListResponse, RegistrantResponse, UpdateRegistrantRequest,
};

/// Mapper to convert between shared Registrant DTOs and domain models.
pub struct RegistrantMapper;

impl RegistrantMapper {
    /// Converts a domain Registrant model to a shared Registrant DTO.
    pub fn to_dto(domain: DomainRegistrant) -> SharedRegistrant {
        SharedRegistrant {
            id: domain.id,
            owner_id: domain.owner_id,
            name: domain.name,
            age: domain.age,
            grade: domain.grade,
            dob: domain.dob.map(|d| d.format("%Y-%m-%d").to_string()),
            email: domain.email,
            phone: domain.phone,
            medical_notes: domain.medical_notes,
            photo_url: domain.photo_url,
            tshirt_size: domain.tshirt_size,
            picture_consent: domain.picture_consent,
            needs_transportation: domain.needs_transportation,
            emergency_contact_name: domain.emergency_contact_name,
            emergency_contact_phone: domain.emergency_contact_phone,
            credential: domain.credential,
            credential_status: Self::credential_status_to_dto(domain.credential_status),
            attendance: Self::attendance_to_dto(domain.attendance),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_register_command(request: CreateRegistrantRequest, actor: Actor) -> RegisterCommand {
        RegisterCommand {
            actor,
            name: request.name,
            age: request.age,
            grade: request.grade,
            dob: request.dob,
            email: request.email,
            phone: request.phone,
            medical_notes: request.medical_notes,
            tshirt_size: request.tshirt_size,
            picture_consent: request.picture_consent,
            needs_transportation: request.needs_transportation,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_phone: request.emergency_contact_phone,
        }
    }

    pub fn to_update_command(
        registrant_id: &str,
        request: UpdateRegistrantRequest,
        actor: Actor,
    ) -> UpdateRegistrantCommand {
        UpdateRegistrantCommand {
            actor,
            registrant_id: registrant_id.to_string(),
            name: request.name,
            age: request.age,
            grade: request.grade,
            dob: request.dob,
            email: request.email,
            phone: request.phone,
            medical_notes: request.medical_notes,
            tshirt_size: request.tshirt_size,
            picture_consent: request.picture_consent,
            needs_transportation: request.needs_transportation,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_phone: request.emergency_contact_phone,
        }
    }

    pub fn to_registrant_response(domain: DomainRegistrant, message: &str) -> RegistrantResponse {
        RegistrantResponse {
            registrant: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_list_dto(domain_registrants: Vec<DomainRegistrant>) -> RegistrantListResponse {
        RegistrantListResponse {
            registrants: domain_registrants.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn attendance_to_dto(status: DomainAttendanceStatus) -> AttendanceStatus {
        match status {
            DomainAttendanceStatus::Out => AttendanceStatus::Out,
            DomainAttendanceStatus::In => AttendanceStatus::In,
        }
    }

    fn credential_status_to_dto(status: DomainCredentialStatus) -> CredentialStatus {
        match status {
            DomainCredentialStatus::Pending => CredentialStatus::Pending,
            DomainCredentialStatus::Ready => CredentialStatus::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_to_dto_formats_dates() {
        let created = Utc.with_ymd_and_hms(2025, 6, 14, 10, 0, 0).single().expect("ts");
        let domain = DomainRegistrant {
            id: "registrant::abc".to_string(),
            owner_id: "guardian::def".to_string(),
            name: "Alice".to_string(),
            age: 9,
            grade: "4th".to_string(),
            dob: NaiveDate::from_ymd_opt(2016, 3, 1),
            email: "parent@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            medical_notes: None,
            photo_url: None,
            tshirt_size: None,
            picture_consent: false,
            needs_transportation: false,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            credential: None,
            credential_status: DomainCredentialStatus::Pending,
            attendance: DomainAttendanceStatus::Out,
            created_at: created,
            updated_at: created,
        };

        let dto = RegistrantMapper::to_dto(domain);
        assert_eq!(dto.dob.as_deref(), Some("2016-03-01"));
        assert_eq!(dto.created_at, "2025-06-14T10:00:00+00:00");
        assert_eq!(dto.credential_status, CredentialStatus::Pending);
        assert_eq!(dto.attendance, AttendanceStatus::Out);
    }
}
