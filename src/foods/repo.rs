use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::foods::dto::{BarcodePayload, FoodPayload, MenuItemPayload};
use crate::nutrition::{ConversionFactors, FoodCategory, MeasureType};

/// Reference food from the coach-curated bank. Admin-managed, read-only for clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub category: FoodCategory,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub default_quantity: f64,
    pub default_measure: MeasureType,
    pub grams_per_unit: Option<f64>,
    pub grams_per_cup: Option<f64>,
    pub grams_per_tbsp: Option<f64>,
    pub grams_per_tsp: Option<f64>,
    pub created_at: OffsetDateTime,
}

const FOOD_COLUMNS: &str = r#"id, name, category, calories_per_100g, protein_per_100g,
    carbs_per_100g, fat_per_100g, default_quantity, default_measure,
    grams_per_unit, grams_per_cup, grams_per_tbsp, grams_per_tsp, created_at"#;

impl Food {
    pub fn conversions(&self) -> ConversionFactors {
        ConversionFactors {
            grams_per_unit: self.grams_per_unit,
            grams_per_cup: self.grams_per_cup,
            grams_per_tbsp: self.grams_per_tbsp,
            grams_per_tsp: self.grams_per_tsp,
        }
    }

    pub async fn search(
        db: &PgPool,
        term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Food>> {
        let pattern = term.map(|t| format!("%{}%", t));
        let rows = sqlx::query_as::<_, Food>(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM food_bank
            WHERE $1::text IS NULL OR name ILIKE $1
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Food>> {
        let row = sqlx::query_as::<_, Food>(&format!(
            r#"SELECT {FOOD_COLUMNS} FROM food_bank WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, p: &FoodPayload) -> anyhow::Result<Food> {
        let row = sqlx::query_as::<_, Food>(&format!(
            r#"
            INSERT INTO food_bank
                (name, category, calories_per_100g, protein_per_100g, carbs_per_100g,
                 fat_per_100g, default_quantity, default_measure,
                 grams_per_unit, grams_per_cup, grams_per_tbsp, grams_per_tsp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(&p.name)
        .bind(p.category)
        .bind(p.calories_per_100g)
        .bind(p.protein_per_100g)
        .bind(p.carbs_per_100g)
        .bind(p.fat_per_100g)
        .bind(p.default_quantity)
        .bind(p.default_measure)
        .bind(p.grams_per_unit)
        .bind(p.grams_per_cup)
        .bind(p.grams_per_tbsp)
        .bind(p.grams_per_tsp)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(db: &PgPool, id: Uuid, p: &FoodPayload) -> anyhow::Result<Option<Food>> {
        let row = sqlx::query_as::<_, Food>(&format!(
            r#"
            UPDATE food_bank SET
                name = $2, category = $3, calories_per_100g = $4, protein_per_100g = $5,
                carbs_per_100g = $6, fat_per_100g = $7, default_quantity = $8,
                default_measure = $9, grams_per_unit = $10, grams_per_cup = $11,
                grams_per_tbsp = $12, grams_per_tsp = $13
            WHERE id = $1
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&p.name)
        .bind(p.category)
        .bind(p.calories_per_100g)
        .bind(p.protein_per_100g)
        .bind(p.carbs_per_100g)
        .bind(p.fat_per_100g)
        .bind(p.default_quantity)
        .bind(p.default_measure)
        .bind(p.grams_per_unit)
        .bind(p.grams_per_cup)
        .bind(p.grams_per_tbsp)
        .bind(p.grams_per_tsp)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM food_bank WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

impl Restaurant {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Restaurant>> {
        let rows = sqlx::query_as::<_, Restaurant>(
            r#"SELECT id, name, created_at FROM restaurants ORDER BY name ASC"#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, name: &str) -> anyhow::Result<Restaurant> {
        let row = sqlx::query_as::<_, Restaurant>(
            r#"INSERT INTO restaurants (name) VALUES ($1) RETURNING id, name, created_at"#,
        )
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM restaurants WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fixed-calorie menu entry; one logged quantity unit equals one serving.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub category: FoodCategory,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub created_at: OffsetDateTime,
}

const MENU_COLUMNS: &str =
    "id, restaurant_id, name, category, calories, protein_g, carbs_g, fat_g, created_at";

impl MenuItem {
    pub async fn list_by_restaurant(
        db: &PgPool,
        restaurant_id: Uuid,
    ) -> anyhow::Result<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT {MENU_COLUMNS}
            FROM restaurant_menu_items
            WHERE restaurant_id = $1
            ORDER BY name ASC
            "#
        ))
        .bind(restaurant_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItem>(&format!(
            r#"SELECT {MENU_COLUMNS} FROM restaurant_menu_items WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        restaurant_id: Uuid,
        p: &MenuItemPayload,
    ) -> anyhow::Result<MenuItem> {
        let row = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            INSERT INTO restaurant_menu_items
                (restaurant_id, name, category, calories, protein_g, carbs_g, fat_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MENU_COLUMNS}
            "#
        ))
        .bind(restaurant_id)
        .bind(&p.name)
        .bind(p.category)
        .bind(p.calories)
        .bind(p.protein_g)
        .bind(p.carbs_g)
        .bind(p.fat_g)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM restaurant_menu_items WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Scanned product; macros per 100g like the food bank but keyed by barcode.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BarcodeItem {
    pub id: Uuid,
    pub barcode: String,
    pub name: String,
    pub category: FoodCategory,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub default_grams: f64,
    pub created_at: OffsetDateTime,
}

const BARCODE_COLUMNS: &str = r#"id, barcode, name, category, calories_per_100g,
    protein_per_100g, carbs_per_100g, fat_per_100g, default_grams, created_at"#;

impl BarcodeItem {
    pub async fn find_by_code(db: &PgPool, barcode: &str) -> anyhow::Result<Option<BarcodeItem>> {
        let row = sqlx::query_as::<_, BarcodeItem>(&format!(
            r#"SELECT {BARCODE_COLUMNS} FROM barcode_items WHERE barcode = $1"#
        ))
        .bind(barcode)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<BarcodeItem>> {
        let row = sqlx::query_as::<_, BarcodeItem>(&format!(
            r#"SELECT {BARCODE_COLUMNS} FROM barcode_items WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, p: &BarcodePayload) -> anyhow::Result<BarcodeItem> {
        let row = sqlx::query_as::<_, BarcodeItem>(&format!(
            r#"
            INSERT INTO barcode_items
                (barcode, name, category, calories_per_100g, protein_per_100g,
                 carbs_per_100g, fat_per_100g, default_grams)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (barcode) DO UPDATE SET
                name = EXCLUDED.name, category = EXCLUDED.category,
                calories_per_100g = EXCLUDED.calories_per_100g,
                protein_per_100g = EXCLUDED.protein_per_100g,
                carbs_per_100g = EXCLUDED.carbs_per_100g,
                fat_per_100g = EXCLUDED.fat_per_100g,
                default_grams = EXCLUDED.default_grams
            RETURNING {BARCODE_COLUMNS}
            "#
        ))
        .bind(&p.barcode)
        .bind(&p.name)
        .bind(p.category)
        .bind(p.calories_per_100g)
        .bind(p.protein_per_100g)
        .bind(p.carbs_per_100g)
        .bind(p.fat_per_100g)
        .bind(p.default_grams)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
