use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::services::{NewTicket, TicketPatch};

/// Ticket status. A flat enum, not a state machine: any status can be set
/// from any other via PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "work_status", rename_all = "lowercase")]
pub enum WorkStatus {
    Pending,
    Completed,
    Cancelled,
}

impl WorkStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A single work record. Image URLs point at the external media host and
/// are immutable once the ticket exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkTicket {
    pub id: Uuid,
    pub price: f64,
    pub worker_name: String,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub status: WorkStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl WorkTicket {
    /// Status defaults to completed; occurred_at falls back to the insert
    /// time when the submission did not carry a business date.
    pub async fn create(db: &PgPool, ticket: &NewTicket) -> anyhow::Result<WorkTicket> {
        let row = sqlx::query_as::<_, WorkTicket>(
            r#"
            INSERT INTO work_tickets (price, worker_name, description, image_urls, occurred_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, now()))
            RETURNING id, price, worker_name, description, image_urls, status,
                      occurred_at, created_at, updated_at
            "#,
        )
        .bind(ticket.price)
        .bind(&ticket.worker_name)
        .bind(&ticket.description)
        .bind(&ticket.image_urls)
        .bind(ticket.occurred_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<WorkTicket>> {
        let row = sqlx::query_as::<_, WorkTicket>(
            r#"
            SELECT id, price, worker_name, description, image_urls, status,
                   occurred_at, created_at, updated_at
            FROM work_tickets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Newest first. The id tie-break keeps the order total when two rows
    /// share a creation timestamp.
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<WorkTicket>> {
        let rows = sqlx::query_as::<_, WorkTicket>(
            r#"
            SELECT id, price, worker_name, description, image_urls, status,
                   occurred_at, created_at, updated_at
            FROM work_tickets
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Partial update: unsupplied fields keep their value. Returns None for
    /// an unknown id. Last writer wins; there is no version check.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        patch: &TicketPatch,
    ) -> anyhow::Result<Option<WorkTicket>> {
        let row = sqlx::query_as::<_, WorkTicket>(
            r#"
            UPDATE work_tickets
            SET status      = COALESCE($2, status),
                price       = COALESCE($3, price),
                worker_name = COALESCE($4, worker_name),
                description = COALESCE($5, description),
                occurred_at = COALESCE($6, occurred_at),
                updated_at  = now()
            WHERE id = $1
            RETURNING id, price, worker_name, description, image_urls, status,
                      occurred_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.price)
        .bind(&patch.worker_name)
        .bind(&patch.description)
        .bind(patch.occurred_at)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Permanent removal. Externally hosted images are not cleaned up.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM work_tickets WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
