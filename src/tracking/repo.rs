use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::{FoodCategory, MeasureType};

/// Per-user-per-day aggregate record. The totals are maintained only through
/// [`apply_totals_tx`] inside the same transaction as the item write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: Date,
    pub total_calories: f64,
    pub protein_units: f64,
    pub carb_units: f64,
    pub fat_units: f64,
    pub vegetable_units: f64,
    pub fruit_units: f64,
    pub water_glasses: i32,
    pub activity_minutes: i32,
    pub created_at: OffsetDateTime,
}

const LOG_COLUMNS: &str = r#"id, user_id, log_date, total_calories, protein_units, carb_units,
    fat_units, vegetable_units, fruit_units, water_glasses, activity_minutes, created_at"#;

/// One logged entry with values pre-computed at logging time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyItem {
    pub id: Uuid,
    pub daily_log_id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub barcode_item_id: Option<Uuid>,
    pub name: String,
    pub category: FoodCategory,
    pub measure: MeasureType,
    pub quantity: f64,
    pub grams: f64,
    pub calories: f64,
    pub portions: f64,
    pub created_at: OffsetDateTime,
}

const ITEM_COLUMNS: &str = r#"id, daily_log_id, user_id, food_id, menu_item_id, barcode_item_id,
    name, category, measure, quantity, grams, calories, portions, created_at"#;

/// Signed adjustment to a log's running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TotalsDelta {
    pub calories: f64,
    pub protein_units: f64,
    pub carb_units: f64,
    pub fat_units: f64,
    pub vegetable_units: f64,
    pub fruit_units: f64,
}

impl TotalsDelta {
    /// Delta contributed by `portions` of `category` worth `calories`.
    /// Categories outside the five tracked ones affect calories only.
    pub fn for_item(category: FoodCategory, calories: f64, portions: f64) -> Self {
        let mut d = TotalsDelta {
            calories,
            ..Default::default()
        };
        match category {
            FoodCategory::Protein => d.protein_units = portions,
            FoodCategory::Carb => d.carb_units = portions,
            FoodCategory::Fat => d.fat_units = portions,
            FoodCategory::Vegetable => d.vegetable_units = portions,
            FoodCategory::Fruit => d.fruit_units = portions,
            FoodCategory::Spread | FoodCategory::Restaurant | FoodCategory::Alcohol => {}
        }
        d
    }

    pub fn negated(self) -> Self {
        TotalsDelta {
            calories: -self.calories,
            protein_units: -self.protein_units,
            carb_units: -self.carb_units,
            fat_units: -self.fat_units,
            vegetable_units: -self.vegetable_units,
            fruit_units: -self.fruit_units,
        }
    }

    pub fn minus(self, other: Self) -> Self {
        TotalsDelta {
            calories: self.calories - other.calories,
            protein_units: self.protein_units - other.protein_units,
            carb_units: self.carb_units - other.carb_units,
            fat_units: self.fat_units - other.fat_units,
            vegetable_units: self.vegetable_units - other.vegetable_units,
            fruit_units: self.fruit_units - other.fruit_units,
        }
    }
}

impl DailyLog {
    /// Lazy creation: the log row appears on first access for a given day.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<DailyLog> {
        sqlx::query(
            r#"
            INSERT INTO daily_logs (user_id, log_date)
            VALUES ($1, $2)
            ON CONFLICT (user_id, log_date) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(date)
        .execute(db)
        .await?;

        let log = sqlx::query_as::<_, DailyLog>(&format!(
            r#"SELECT {LOG_COLUMNS} FROM daily_logs WHERE user_id = $1 AND log_date = $2"#
        ))
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(log)
    }

    pub async fn get_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<DailyLog>> {
        let log = sqlx::query_as::<_, DailyLog>(&format!(
            r#"SELECT {LOG_COLUMNS} FROM daily_logs WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(log)
    }

    /// Single atomic counter update, clamped at zero. The mobile client applies
    /// the glass optimistically and rolls back on failure.
    pub async fn adjust_water(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
        delta: i32,
    ) -> anyhow::Result<DailyLog> {
        DailyLog::get_or_create(db, user_id, date).await?;
        let log = sqlx::query_as::<_, DailyLog>(&format!(
            r#"
            UPDATE daily_logs
            SET water_glasses = GREATEST(0, water_glasses + $3)
            WHERE user_id = $1 AND log_date = $2
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(date)
        .bind(delta)
        .fetch_one(db)
        .await?;
        Ok(log)
    }

    pub async fn add_activity(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
        minutes: i32,
    ) -> anyhow::Result<DailyLog> {
        DailyLog::get_or_create(db, user_id, date).await?;
        let log = sqlx::query_as::<_, DailyLog>(&format!(
            r#"
            UPDATE daily_logs
            SET activity_minutes = GREATEST(0, activity_minutes + $3)
            WHERE user_id = $1 AND log_date = $2
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(date)
        .bind(minutes)
        .fetch_one(db)
        .await?;
        Ok(log)
    }
}

/// Adjust a log's running totals by the exact delta of one item write.
pub async fn apply_totals_tx(
    tx: &mut Transaction<'_, Postgres>,
    log_id: Uuid,
    d: &TotalsDelta,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE daily_logs SET
            total_calories = total_calories + $2,
            protein_units = protein_units + $3,
            carb_units = carb_units + $4,
            fat_units = fat_units + $5,
            vegetable_units = vegetable_units + $6,
            fruit_units = fruit_units + $7
        WHERE id = $1
        "#,
    )
    .bind(log_id)
    .bind(d.calories)
    .bind(d.protein_units)
    .bind(d.carb_units)
    .bind(d.fat_units)
    .bind(d.vegetable_units)
    .bind(d.fruit_units)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Column values for a new item; everything is pre-computed by the caller.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub food_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub barcode_item_id: Option<Uuid>,
    pub name: String,
    pub category: FoodCategory,
    pub measure: MeasureType,
    pub quantity: f64,
    pub grams: f64,
    pub calories: f64,
    pub portions: f64,
}

impl DailyItem {
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        log_id: Uuid,
        user_id: Uuid,
        item: &NewItem,
    ) -> anyhow::Result<DailyItem> {
        let row = sqlx::query_as::<_, DailyItem>(&format!(
            r#"
            INSERT INTO daily_items
                (daily_log_id, user_id, food_id, menu_item_id, barcode_item_id,
                 name, category, measure, quantity, grams, calories, portions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(log_id)
        .bind(user_id)
        .bind(item.food_id)
        .bind(item.menu_item_id)
        .bind(item.barcode_item_id)
        .bind(&item.name)
        .bind(item.category)
        .bind(item.measure)
        .bind(item.quantity)
        .bind(item.grams)
        .bind(item.calories)
        .bind(item.portions)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    pub async fn list_by_log(db: &PgPool, log_id: Uuid) -> anyhow::Result<Vec<DailyItem>> {
        let rows = sqlx::query_as::<_, DailyItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM daily_items
            WHERE daily_log_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(log_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get_for_user(
        db: &PgPool,
        user_id: Uuid,
        item_id: Uuid,
    ) -> anyhow::Result<Option<DailyItem>> {
        let row = sqlx::query_as::<_, DailyItem>(&format!(
            r#"SELECT {ITEM_COLUMNS} FROM daily_items WHERE id = $1 AND user_id = $2"#
        ))
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update_values_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        quantity: f64,
        grams: f64,
        calories: f64,
        portions: f64,
    ) -> anyhow::Result<DailyItem> {
        let row = sqlx::query_as::<_, DailyItem>(&format!(
            r#"
            UPDATE daily_items
            SET quantity = $2, grams = $3, calories = $4, portions = $5
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(quantity)
        .bind(grams)
        .bind(calories)
        .bind(portions)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    pub async fn delete_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
    ) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM daily_items WHERE id = $1"#)
            .bind(item_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_routes_portions_to_the_matching_column() {
        let d = TotalsDelta::for_item(FoodCategory::Vegetable, 70.0, 2.0);
        assert_eq!(d.calories, 70.0);
        assert_eq!(d.vegetable_units, 2.0);
        assert_eq!(d.protein_units, 0.0);
        assert_eq!(d.carb_units, 0.0);
    }

    #[test]
    fn untracked_categories_only_move_calories() {
        for cat in [
            FoodCategory::Spread,
            FoodCategory::Restaurant,
            FoodCategory::Alcohol,
        ] {
            let d = TotalsDelta::for_item(cat, 240.0, 2.0);
            assert_eq!(d.calories, 240.0);
            assert_eq!(
                d,
                TotalsDelta {
                    calories: 240.0,
                    ..Default::default()
                }
            );
        }
    }

    #[test]
    fn negation_cancels_a_delta() {
        let d = TotalsDelta::for_item(FoodCategory::Protein, 350.0, 2.0);
        let sum = d.minus(d);
        assert_eq!(sum, TotalsDelta::default());
        assert_eq!(d.negated().calories, -350.0);
        assert_eq!(d.negated().protein_units, -2.0);
    }
}
