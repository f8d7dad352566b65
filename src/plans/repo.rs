use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_slot", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Coach-assigned weekly plan entry. day_of_week: 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlanItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day_of_week: i16,
    pub slot: MealSlot,
    pub description: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewPlanItem {
    pub day_of_week: i16,
    pub slot: MealSlot,
    pub description: String,
}

const PLAN_COLUMNS: &str = "id, user_id, day_of_week, slot, description, created_at";

impl MealPlanItem {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MealPlanItem>> {
        let rows = sqlx::query_as::<_, MealPlanItem>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM meal_plan_items
            WHERE user_id = $1
            ORDER BY day_of_week ASC, slot ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        p: &NewPlanItem,
    ) -> anyhow::Result<MealPlanItem> {
        let row = sqlx::query_as::<_, MealPlanItem>(&format!(
            r#"
            INSERT INTO meal_plan_items (user_id, day_of_week, slot, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(p.day_of_week)
        .bind(p.slot)
        .bind(&p.description)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM meal_plan_items WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub performed_on: Date,
    pub minutes: i32,
    pub kind: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewWorkout {
    pub performed_on: Date,
    pub minutes: i32,
    pub kind: String,
    pub notes: Option<String>,
}

const WORKOUT_COLUMNS: &str = "id, user_id, performed_on, minutes, kind, notes, created_at";

impl WorkoutLog {
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<WorkoutLog>> {
        let rows = sqlx::query_as::<_, WorkoutLog>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workout_logs
            WHERE user_id = $1
            ORDER BY performed_on DESC, created_at DESC
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

    pub async fn create(db: &PgPool, user_id: Uuid, w: &NewWorkout) -> anyhow::Result<WorkoutLog> {
        let row = sqlx::query_as::<_, WorkoutLog>(&format!(
            r#"
            INSERT INTO workout_logs (user_id, performed_on, minutes, kind, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(w.performed_on)
        .bind(w.minutes)
        .bind(&w.kind)
        .bind(&w.notes)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM workout_logs WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
