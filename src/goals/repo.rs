use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::goals::dto::{TemplatePayload, UpdateGoalsRequest};

/// Per-user goals and template linkage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub vegetable_goal: Option<f64>,
    pub fruit_goal: Option<f64>,
    pub water_goal: Option<i32>,
    pub weekly_activity_goal: Option<i32>,
    pub targets_override: bool,
    pub template_id: Option<Uuid>,
    pub updated_at: OffsetDateTime,
}

const PROFILE_COLUMNS: &str = r#"user_id, display_name, calorie_goal, protein_goal, carb_goal,
    fat_goal, vegetable_goal, fruit_goal, water_goal, weekly_activity_goal,
    targets_override, template_id, updated_at"#;

/// Coach-defined goal bundle shared across clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TargetTemplate {
    pub id: Uuid,
    pub name: String,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub vegetable_goal: Option<f64>,
    pub fruit_goal: Option<f64>,
    pub created_at: OffsetDateTime,
}

const TEMPLATE_COLUMNS: &str = r#"id, name, calorie_goal, protein_goal, carb_goal, fat_goal,
    vegetable_goal, fruit_goal, created_at"#;

impl Profile {
    pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            r#"SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"#
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update_goals(
        db: &PgPool,
        user_id: Uuid,
        p: &UpdateGoalsRequest,
    ) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles SET
                calorie_goal = $2, protein_goal = $3, carb_goal = $4, fat_goal = $5,
                vegetable_goal = $6, fruit_goal = $7, water_goal = $8,
                weekly_activity_goal = $9, targets_override = $10, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(p.calorie_goal)
        .bind(p.protein_goal)
        .bind(p.carb_goal)
        .bind(p.fat_goal)
        .bind(p.vegetable_goal)
        .bind(p.fruit_goal)
        .bind(p.water_goal)
        .bind(p.weekly_activity_goal)
        .bind(p.targets_override)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn assign_template(
        db: &PgPool,
        user_id: Uuid,
        template_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET template_id = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(template_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

impl TargetTemplate {
    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<TargetTemplate>> {
        let row = sqlx::query_as::<_, TargetTemplate>(&format!(
            r#"SELECT {TEMPLATE_COLUMNS} FROM target_templates WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<TargetTemplate>> {
        let rows = sqlx::query_as::<_, TargetTemplate>(&format!(
            r#"SELECT {TEMPLATE_COLUMNS} FROM target_templates ORDER BY name ASC"#
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, p: &TemplatePayload) -> anyhow::Result<TargetTemplate> {
        let row = sqlx::query_as::<_, TargetTemplate>(&format!(
            r#"
            INSERT INTO target_templates
                (name, calorie_goal, protein_goal, carb_goal, fat_goal,
                 vegetable_goal, fruit_goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(&p.name)
        .bind(p.calorie_goal)
        .bind(p.protein_goal)
        .bind(p.carb_goal)
        .bind(p.fat_goal)
        .bind(p.vegetable_goal)
        .bind(p.fruit_goal)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        p: &TemplatePayload,
    ) -> anyhow::Result<Option<TargetTemplate>> {
        let row = sqlx::query_as::<_, TargetTemplate>(&format!(
            r#"
            UPDATE target_templates SET
                name = $2, calorie_goal = $3, protein_goal = $4, carb_goal = $5,
                fat_goal = $6, vegetable_goal = $7, fruit_goal = $8
            WHERE id = $1
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&p.name)
        .bind(p.calorie_goal)
        .bind(p.protein_goal)
        .bind(p.carb_goal)
        .bind(p.fat_goal)
        .bind(p.vegetable_goal)
        .bind(p.fruit_goal)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM target_templates WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Roster row for the admin client list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClientSummary {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub targets_override: bool,
    pub template_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

pub async fn list_clients(db: &PgPool) -> anyhow::Result<Vec<ClientSummary>> {
    let rows = sqlx::query_as::<_, ClientSummary>(
        r#"
        SELECT u.id AS user_id, u.email, p.display_name, p.targets_override,
               p.template_id, u.created_at
        FROM users u
        JOIN profiles p ON p.user_id = u.id
        WHERE u.role = 'client'
        ORDER BY u.created_at ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
