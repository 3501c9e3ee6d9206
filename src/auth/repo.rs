use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Admin account. Created by the seed binary, rarely mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: OffsetDateTime,
}

/// Employee account. Same lifecycle as [`Admin`]; also the source of the
/// worker list offered on the submission form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: OffsetDateTime,
}

impl Admin {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, password_hash, name, role, created_at
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(admin)
    }

    /// Idempotent insert used by the seed binary.
    pub async fn seed(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (email, password_hash, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .execute(db)
        .await?;
        Ok(())
    }
}

impl Employee {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, email, password_hash, name, role, created_at
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(employee)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, email, password_hash, name, role, created_at
            FROM employees
            ORDER BY name ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn seed(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (email, password_hash, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .execute(db)
        .await?;
        Ok(())
    }
}
