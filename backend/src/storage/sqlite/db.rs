use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create guardians table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guardians (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'guardian',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create registrants table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registrants (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                grade TEXT NOT NULL,
                dob TEXT,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                medical_notes TEXT,
                photo_url TEXT,
                tshirt_size TEXT,
                picture_consent INTEGER NOT NULL DEFAULT 1,
                needs_transportation INTEGER NOT NULL DEFAULT 0,
                emergency_contact_name TEXT,
                emergency_contact_phone TEXT,
                credential TEXT,
                credential_status TEXT NOT NULL DEFAULT 'pending',
                attendance TEXT NOT NULL DEFAULT 'out',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (owner_id) REFERENCES guardians (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for owner scoping
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_registrants_owner_id
            ON registrants(owner_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create indexes for contact lookup during credential delivery
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_registrants_email
            ON registrants(email);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_registrants_phone
            ON registrants(phone);
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for reconciliation scans
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_registrants_credential_status
            ON registrants(credential_status);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_setup_creates_tables() {
        let db = DbConnection::init_test().await.expect("test database");

        let rows = sqlx::query(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name IN ('guardians', 'registrants')
            ORDER BY name
            "#,
        )
        .fetch_all(db.pool())
        .await
        .expect("query sqlite_master");

        let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["guardians", "registrants"]);
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("test database");
        DbConnection::setup_schema(db.pool())
            .await
            .expect("second setup");
    }
}
