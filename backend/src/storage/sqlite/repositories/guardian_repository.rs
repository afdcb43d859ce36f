use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{Guardian, Role};
use crate::storage::sqlite::db::DbConnection;
use crate::storage::traits::GuardianStorage;

/// Repository for guardian account operations
#[derive(Clone)]
pub struct GuardianRepository {
    db: DbConnection,
}

impl GuardianRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Guardian> {
        let role: String = row.get("role");
        let role =
            Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown guardian role: {role}"))?;

        Ok(Guardian {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            role,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl GuardianStorage for GuardianRepository {
    async fn store_guardian(&self, guardian: &Guardian) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO guardians (id, name, email, phone, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&guardian.id)
        .bind(&guardian.name)
        .bind(&guardian.email)
        .bind(&guardian.phone)
        .bind(guardian.role.as_str())
        .bind(guardian.created_at)
        .bind(guardian.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_guardian(&self, guardian_id: &str) -> Result<Option<Guardian>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, role, created_at, updated_at
            FROM guardians
            WHERE id = ?
            "#,
        )
        .bind(guardian_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_guardian_by_email(&self, email: &str) -> Result<Option<Guardian>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, role, created_at, updated_at
            FROM guardians
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn setup_test() -> GuardianRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        GuardianRepository::new(db)
    }

    fn sample_guardian(email: &str) -> Guardian {
        let now = Utc::now();
        Guardian {
            id: Guardian::generate_id(),
            name: "Pat Example".to_string(),
            email: email.to_string(),
            phone: "555-123-4567".to_string(),
            role: Role::Guardian,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_round_trip() {
        let repo = setup_test().await;
        let guardian = sample_guardian("pat@example.com");
        repo.store_guardian(&guardian).await.expect("store");

        let loaded = repo
            .get_guardian(&guardian.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.name, "Pat Example");
        assert_eq!(loaded.email, "pat@example.com");
        assert_eq!(loaded.role, Role::Guardian);
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = setup_test().await;
        let guardian = sample_guardian("pat@example.com");
        repo.store_guardian(&guardian).await.expect("store");

        let loaded = repo
            .get_guardian_by_email("pat@example.com")
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.id, guardian.id);

        let missing = repo
            .get_guardian_by_email("nobody@example.com")
            .await
            .expect("get");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = setup_test().await;
        repo.store_guardian(&sample_guardian("pat@example.com"))
            .await
            .expect("store");

        let duplicate = sample_guardian("pat@example.com");
        let result = repo.store_guardian(&duplicate).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_admin_role_round_trips() {
        let repo = setup_test().await;
        let mut guardian = sample_guardian("admin@example.com");
        guardian.role = Role::Admin;
        repo.store_guardian(&guardian).await.expect("store");

        let loaded = repo
            .get_guardian(&guardian.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.role, Role::Admin);
    }
}
