use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{AttendanceStatus, CredentialStatus, Registrant};
use crate::storage::sqlite::db::DbConnection;
use crate::storage::traits::RegistrantStorage;

/// Repository for registrant operations
#[derive(Clone)]
pub struct RegistrantRepository {
    db: DbConnection,
}

impl RegistrantRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Registrant> {
        let credential_status: String = row.get("credential_status");
        let credential_status = CredentialStatus::parse(&credential_status)
            .ok_or_else(|| anyhow::anyhow!("unknown credential status: {credential_status}"))?;
        let attendance: String = row.get("attendance");
        let attendance = AttendanceStatus::parse(&attendance)
            .ok_or_else(|| anyhow::anyhow!("unknown attendance status: {attendance}"))?;

        Ok(Registrant {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            name: row.get("name"),
            age: row.get("age"),
            grade: row.get("grade"),
            dob: row.get("dob"),
            email: row.get("email"),
            phone: row.get("phone"),
            medical_notes: row.get("medical_notes"),
            photo_url: row.get("photo_url"),
            tshirt_size: row.get("tshirt_size"),
            picture_consent: row.get("picture_consent"),
            needs_transportation: row.get("needs_transportation"),
            emergency_contact_name: row.get("emergency_contact_name"),
            emergency_contact_phone: row.get("emergency_contact_phone"),
            credential: row.get("credential"),
            credential_status,
            attendance,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl RegistrantStorage for RegistrantRepository {
    async fn store_registrant(&self, registrant: &Registrant) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO registrants (
                id, owner_id, name, age, grade, dob, email, phone,
                medical_notes, photo_url, tshirt_size, picture_consent,
                needs_transportation, emergency_contact_name,
                emergency_contact_phone, credential, credential_status,
                attendance, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&registrant.id)
        .bind(&registrant.owner_id)
        .bind(&registrant.name)
        .bind(registrant.age)
        .bind(&registrant.grade)
        .bind(registrant.dob)
        .bind(&registrant.email)
        .bind(&registrant.phone)
        .bind(&registrant.medical_notes)
        .bind(&registrant.photo_url)
        .bind(&registrant.tshirt_size)
        .bind(registrant.picture_consent)
        .bind(registrant.needs_transportation)
        .bind(&registrant.emergency_contact_name)
        .bind(&registrant.emergency_contact_phone)
        .bind(&registrant.credential)
        .bind(registrant.credential_status.as_str())
        .bind(registrant.attendance.as_str())
        .bind(registrant.created_at)
        .bind(registrant.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_registrant(&self, registrant_id: &str) -> Result<Option<Registrant>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, name, age, grade, dob, email, phone,
                   medical_notes, photo_url, tshirt_size, picture_consent,
                   needs_transportation, emergency_contact_name,
                   emergency_contact_phone, credential, credential_status,
                   attendance, created_at, updated_at
            FROM registrants
            WHERE id = ?
            "#,
        )
        .bind(registrant_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Registrant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, age, grade, dob, email, phone,
                   medical_notes, photo_url, tshirt_size, picture_consent,
                   needs_transportation, emergency_contact_name,
                   emergency_contact_phone, credential, credential_status,
                   attendance, created_at, updated_at
            FROM registrants
            WHERE owner_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Registrant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, age, grade, dob, email, phone,
                   medical_notes, photo_url, tshirt_size, picture_consent,
                   needs_transportation, emergency_contact_name,
                   emergency_contact_phone, credential, credential_status,
                   attendance, created_at, updated_at
            FROM registrants
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_registrant(&self, registrant: &Registrant) -> Result<()> {
        // Descriptive fields only. Attendance, credential, and photo columns
        // have their own statements and are never written here.
        sqlx::query(
            r#"
            UPDATE registrants
            SET name = ?, age = ?, grade = ?, dob = ?, email = ?, phone = ?,
                medical_notes = ?, tshirt_size = ?, picture_consent = ?,
                needs_transportation = ?, emergency_contact_name = ?,
                emergency_contact_phone = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&registrant.name)
        .bind(registrant.age)
        .bind(&registrant.grade)
        .bind(registrant.dob)
        .bind(&registrant.email)
        .bind(&registrant.phone)
        .bind(&registrant.medical_notes)
        .bind(&registrant.tshirt_size)
        .bind(registrant.picture_consent)
        .bind(registrant.needs_transportation)
        .bind(&registrant.emergency_contact_name)
        .bind(&registrant.emergency_contact_phone)
        .bind(registrant.updated_at)
        .bind(&registrant.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_registrant(&self, registrant_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM registrants WHERE id = ?
            "#,
        )
        .bind(registrant_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn set_credential(
        &self,
        registrant_id: &str,
        credential: &str,
        status: CredentialStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE registrants
            SET credential = ?, credential_status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(credential)
        .bind(status.as_str())
        .bind(updated_at)
        .bind(registrant_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn set_attendance(
        &self,
        registrant_id: &str,
        attendance: AttendanceStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE registrants
            SET attendance = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(attendance.as_str())
        .bind(updated_at)
        .bind(registrant_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn set_photo_url(
        &self,
        registrant_id: &str,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE registrants
            SET photo_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(photo_url)
        .bind(updated_at)
        .bind(registrant_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Registrant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, age, grade, dob, email, phone,
                   medical_notes, photo_url, tshirt_size, picture_consent,
                   needs_transportation, emergency_contact_name,
                   emergency_contact_phone, credential, credential_status,
                   attendance, created_at, updated_at
            FROM registrants
            WHERE email = ?
            ORDER BY name ASC
            "#,
        )
        .bind(email)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_by_phone(&self, phone: &str) -> Result<Vec<Registrant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, age, grade, dob, email, phone,
                   medical_notes, photo_url, tshirt_size, picture_consent,
                   needs_transportation, emergency_contact_name,
                   emergency_contact_phone, credential, credential_status,
                   attendance, created_at, updated_at
            FROM registrants
            WHERE phone = ?
            ORDER BY name ASC
            "#,
        )
        .bind(phone)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_pending(&self) -> Result<Vec<Registrant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, age, grade, dob, email, phone,
                   medical_notes, photo_url, tshirt_size, picture_consent,
                   needs_transportation, emergency_contact_name,
                   emergency_contact_phone, credential, credential_status,
                   attendance, created_at, updated_at
            FROM registrants
            WHERE credential_status = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(CredentialStatus::Pending.as_str())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Guardian;
    use crate::domain::models::Role;
    use crate::storage::sqlite::repositories::GuardianRepository;
    use crate::storage::traits::GuardianStorage;
    use chrono::NaiveDate;

    async fn setup_test() -> (RegistrantRepository, String) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        let guardians = GuardianRepository::new(db.clone());

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

        (RegistrantRepository::new(db), guardian.id)
    }

    fn sample_registrant(owner_id: &str) -> Registrant {
        let now = Utc::now();
        Registrant {
            id: Registrant::generate_id(),
            owner_id: owner_id.to_string(),
            name: "Alice".to_string(),
            age: 9,
            grade: "4th".to_string(),
            dob: NaiveDate::from_ymd_opt(2016, 3, 1),
            email: "parent@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            medical_notes: Some("peanut allergy".to_string()),
            photo_url: None,
            tshirt_size: Some("YM".to_string()),
            picture_consent: true,
            needs_transportation: false,
            emergency_contact_name: Some("Uncle Bob".to_string()),
            emergency_contact_phone: Some("555-987-6543".to_string()),
            credential: None,
            credential_status: CredentialStatus::Pending,
            attendance: AttendanceStatus::Out,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_round_trip() {
        let (repo, owner_id) = setup_test().await;
        let registrant = sample_registrant(&owner_id);

        repo.store_registrant(&registrant).await.expect("store");

        let loaded = repo
            .get_registrant(&registrant.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.name, "Alice");
        assert_eq!(loaded.age, 9);
        assert_eq!(loaded.dob, NaiveDate::from_ymd_opt(2016, 3, 1));
        assert_eq!(loaded.credential, None);
        assert_eq!(loaded.credential_status, CredentialStatus::Pending);
        assert_eq!(loaded.attendance, AttendanceStatus::Out);
        assert!(loaded.picture_consent);
        assert!(!loaded.needs_transportation);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (repo, _) = setup_test().await;
        let loaded = repo.get_registrant("registrant::missing").await.expect("get");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_set_credential_moves_status() {
        let (repo, owner_id) = setup_test().await;
        let registrant = sample_registrant(&owner_id);
        repo.store_registrant(&registrant).await.expect("store");

        repo.set_credential(
            &registrant.id,
            "http://localhost:3000/assets/abc.png",
            CredentialStatus::Ready,
            Utc::now(),
        )
        .await
        .expect("set credential");

        let loaded = repo
            .get_registrant(&registrant.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(
            loaded.credential.as_deref(),
            Some("http://localhost:3000/assets/abc.png")
        );
        assert_eq!(loaded.credential_status, CredentialStatus::Ready);
    }

    #[tokio::test]
    async fn test_update_never_touches_attendance_or_credential() {
        let (repo, owner_id) = setup_test().await;
        let mut registrant = sample_registrant(&owner_id);
        repo.store_registrant(&registrant).await.expect("store");

        repo.set_credential(
            &registrant.id,
            "http://localhost:3000/assets/abc.png",
            CredentialStatus::Ready,
            Utc::now(),
        )
        .await
        .expect("set credential");
        repo.set_attendance(&registrant.id, AttendanceStatus::In, Utc::now())
            .await
            .expect("set attendance");

        // A full descriptive rewrite, including stale attendance/credential
        // values on the model, must not clobber the dedicated columns.
        registrant.name = "Alice Updated".to_string();
        registrant.attendance = AttendanceStatus::Out;
        registrant.credential = None;
        registrant.credential_status = CredentialStatus::Pending;
        registrant.updated_at = Utc::now();
        repo.update_registrant(&registrant).await.expect("update");

        let loaded = repo
            .get_registrant(&registrant.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.name, "Alice Updated");
        assert_eq!(loaded.attendance, AttendanceStatus::In);
        assert_eq!(loaded.credential_status, CredentialStatus::Ready);
        assert!(loaded.credential.is_some());
    }

    #[tokio::test]
    async fn test_list_by_owner_is_scoped() {
        let (repo, owner_id) = setup_test().await;
        let mut first = sample_registrant(&owner_id);
        first.name = "Alice".to_string();
        let mut second = sample_registrant(&owner_id);
        second.name = "Bob".to_string();
        repo.store_registrant(&first).await.expect("store");
        repo.store_registrant(&second).await.expect("store");

        let listed = repo.list_by_owner(&owner_id).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Alice");
        assert_eq!(listed[1].name, "Bob");

        let other = repo.list_by_owner("guardian::other").await.expect("list");
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_email_matches_raw_string() {
        let (repo, owner_id) = setup_test().await;
        let mut first = sample_registrant(&owner_id);
        first.email = "family@example.com".to_string();
        let mut second = sample_registrant(&owner_id);
        second.name = "Bob".to_string();
        second.email = "family@example.com".to_string();
        let mut third = sample_registrant(&owner_id);
        third.name = "Carol".to_string();
        third.email = "other@example.com".to_string();

        for registrant in [&first, &second, &third] {
            repo.store_registrant(registrant).await.expect("store");
        }

        let matched = repo.list_by_email("family@example.com").await.expect("list");
        assert_eq!(matched.len(), 2);

        // Raw string match only: a case-variant address is a different key.
        let case_variant = repo.list_by_email("Family@example.com").await.expect("list");
        assert!(case_variant.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_phone_matches_raw_string() {
        let (repo, owner_id) = setup_test().await;
        let mut formatted = sample_registrant(&owner_id);
        formatted.phone = "(555) 123-4567".to_string();
        let mut plain = sample_registrant(&owner_id);
        plain.name = "Bob".to_string();
        plain.phone = "5551234567".to_string();
        repo.store_registrant(&formatted).await.expect("store");
        repo.store_registrant(&plain).await.expect("store");

        // The two spellings reach the same handset but are distinct stored
        // values, so they match independently.
        let matched = repo.list_by_phone("(555) 123-4567").await.expect("list");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_list_pending_only_returns_pending_rows() {
        let (repo, owner_id) = setup_test().await;
        let pending = sample_registrant(&owner_id);
        let mut ready = sample_registrant(&owner_id);
        ready.name = "Bob".to_string();
        repo.store_registrant(&pending).await.expect("store");
        repo.store_registrant(&ready).await.expect("store");
        repo.set_credential(
            &ready.id,
            "http://localhost:3000/assets/b.png",
            CredentialStatus::Ready,
            Utc::now(),
        )
        .await
        .expect("set credential");

        let listed = repo.list_pending().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, pending.id);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (repo, owner_id) = setup_test().await;
        let registrant = sample_registrant(&owner_id);
        repo.store_registrant(&registrant).await.expect("store");

        repo.delete_registrant(&registrant.id).await.expect("delete");
        let loaded = repo.get_registrant(&registrant.id).await.expect("get");
        assert!(loaded.is_none());
    }
}
