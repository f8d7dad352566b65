use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Coach-authored guide; `user_id` NULL means visible to everyone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Guide {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub video_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewGuide {
    /// Target client; omit for a guide visible to all clients.
    pub user_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub video_url: Option<String>,
}

const COLUMNS: &str = "id, user_id, title, body, video_url, created_at";

impl Guide {
    /// Global guides plus the ones assigned to this user.
    pub async fn list_visible(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Guide>> {
        let rows = sqlx::query_as::<_, Guide>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM guides
            WHERE user_id IS NULL OR user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, g: &NewGuide) -> anyhow::Result<Guide> {
        let row = sqlx::query_as::<_, Guide>(&format!(
            r#"
            INSERT INTO guides (user_id, title, body, video_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(g.user_id)
        .bind(&g.title)
        .bind(&g.body)
        .bind(&g.video_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM guides WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
