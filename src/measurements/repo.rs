use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Measurement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub measured_on: Date,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewMeasurement {
    pub measured_on: Date,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub notes: Option<String>,
}

const COLUMNS: &str =
    "id, user_id, measured_on, weight_kg, waist_cm, hip_cm, chest_cm, notes, created_at";

impl Measurement {
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Measurement>> {
        let rows = sqlx::query_as::<_, Measurement>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM body_measurements
            WHERE user_id = $1
            ORDER BY measured_on DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        m: &NewMeasurement,
    ) -> anyhow::Result<Measurement> {
        let row = sqlx::query_as::<_, Measurement>(&format!(
            r#"
            INSERT INTO body_measurements
                (user_id, measured_on, weight_kg, waist_cm, hip_cm, chest_cm, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(m.measured_on)
        .bind(m.weight_kg)
        .bind(m.waist_cm)
        .bind(m.hip_cm)
        .bind(m.chest_cm)
        .bind(&m.notes)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM body_measurements WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
