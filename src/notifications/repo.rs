use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PushToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub platform: String,
    pub created_at: OffsetDateTime,
}

const TOKEN_COLUMNS: &str = "id, user_id, token, platform, created_at";

impl PushToken {
    /// Re-registering an existing token reassigns it to the caller.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        token: &str,
        platform: &str,
    ) -> anyhow::Result<PushToken> {
        let row = sqlx::query_as::<_, PushToken>(&format!(
            r#"
            INSERT INTO push_tokens (user_id, token, platform)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO UPDATE
                SET user_id = EXCLUDED.user_id, platform = EXCLUDED.platform
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(token)
        .bind(platform)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, token: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM push_tokens WHERE user_id = $1 AND token = $2"#)
            .bind(user_id)
            .bind(token)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<PushToken>> {
        let rows = sqlx::query_as::<_, PushToken>(&format!(
            r#"SELECT {TOKEN_COLUMNS} FROM push_tokens ORDER BY created_at ASC"#
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_users(db: &PgPool, user_ids: &[Uuid]) -> anyhow::Result<Vec<PushToken>> {
        let rows = sqlx::query_as::<_, PushToken>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM push_tokens
            WHERE user_id = ANY($1)
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_ids)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn prune(db: &PgPool, tokens: &[String]) -> anyhow::Result<u64> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(r#"DELETE FROM push_tokens WHERE token = ANY($1)"#)
            .bind(tokens)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug)]
pub struct NewNotificationLog {
    pub user_id: Uuid,
    pub token: String,
    pub title: String,
    pub body: String,
    pub status: String,
    pub error_code: Option<String>,
}

/// All-or-nothing: a batch of log rows lands in one transaction so a failure
/// mid-batch cannot leave a partial record of an already-sent dispatch.
pub async fn record_notifications(
    db: &PgPool,
    entries: &[NewNotificationLog],
) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO notification_logs (user_id, token, title, body, status, error_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.token)
        .bind(&entry.title)
        .bind(&entry.body)
        .bind(&entry.status)
        .bind(&entry.error_code)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await.context("commit tx")?;
    Ok(())
}
