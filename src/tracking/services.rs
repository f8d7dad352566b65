use anyhow::Context;
use sqlx::PgPool;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::foods::repo::{BarcodeItem, Food, MenuItem};
use crate::nutrition::{self, MeasureType};
use crate::tracking::repo::{apply_totals_tx, DailyItem, DailyLog, NewItem, TotalsDelta};

/// Computed values for one logged entry, fixed at logging time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemValues {
    pub grams: f64,
    pub calories: f64,
    pub portions: f64,
}

/// Food-bank entry: measure and quantity run through the conversion table.
pub fn values_for_food(food: &Food, measure: MeasureType, quantity: f64) -> ItemValues {
    let grams = food.conversions().grams_for(measure, quantity);
    let calories = nutrition::calories_for(food.calories_per_100g, grams);
    ItemValues {
        grams,
        calories,
        portions: nutrition::portions_for(food.category, calories),
    }
}

/// Menu entry: quantity is a serving count against fixed per-serving calories.
pub fn values_for_menu_item(item: &MenuItem, servings: f64) -> ItemValues {
    let calories = item.calories * servings;
    ItemValues {
        grams: 0.0,
        calories,
        portions: nutrition::portions_for(item.category, calories),
    }
}

/// Scanned product: quantity is grams against a per-100g density.
pub fn values_for_barcode(item: &BarcodeItem, grams: f64) -> ItemValues {
    let calories = nutrition::calories_for(item.calories_per_100g, grams);
    ItemValues {
        grams,
        calories,
        portions: nutrition::portions_for(item.category, calories),
    }
}

/// Quantity edit: grams and calories rescale proportionally, portions are
/// re-derived from the scaled calories so they stay on the half grid.
pub fn rescaled_values(item: &DailyItem, new_quantity: f64) -> ItemValues {
    let ratio = new_quantity / item.quantity;
    let grams = item.grams * ratio;
    let calories = item.calories * ratio;
    ItemValues {
        grams,
        calories,
        portions: nutrition::portions_for(item.category, calories),
    }
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, &format_description!("[year]-[month]-[day]")).ok()
}

/// "Today" in the configured fixed local offset.
pub fn local_today(offset_minutes: i32) -> Date {
    let offset =
        UtcOffset::from_whole_seconds(offset_minutes * 60).unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Insert an item and bump the log totals in one transaction.
pub async fn insert_item(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    new_item: NewItem,
) -> anyhow::Result<(DailyLog, DailyItem)> {
    let log = DailyLog::get_or_create(db, user_id, date).await?;

    let delta = TotalsDelta::for_item(new_item.category, new_item.calories, new_item.portions);
    let mut tx = db.begin().await.context("begin tx")?;
    let item = DailyItem::insert_tx(&mut tx, log.id, user_id, &new_item).await?;
    apply_totals_tx(&mut tx, log.id, &delta).await?;
    tx.commit().await.context("commit tx")?;

    let log = DailyLog::get_by_id(db, log.id)
        .await?
        .context("daily log vanished mid-insert")?;
    Ok((log, item))
}

/// Rescale an item to a new quantity and adjust totals by the difference.
pub async fn rescale_item(
    db: &PgPool,
    item: &DailyItem,
    new_quantity: f64,
) -> anyhow::Result<DailyItem> {
    let new = rescaled_values(item, new_quantity);
    let old = TotalsDelta::for_item(item.category, item.calories, item.portions);
    let updated = TotalsDelta::for_item(item.category, new.calories, new.portions);
    let delta = updated.minus(old);

    let mut tx = db.begin().await.context("begin tx")?;
    let item = DailyItem::update_values_tx(
        &mut tx,
        item.id,
        new_quantity,
        new.grams,
        new.calories,
        new.portions,
    )
    .await?;
    apply_totals_tx(&mut tx, item.daily_log_id, &delta).await?;
    tx.commit().await.context("commit tx")?;
    Ok(item)
}

/// Delete an item, reversing its contribution to the totals.
pub async fn remove_item(db: &PgPool, item: &DailyItem) -> anyhow::Result<()> {
    let delta = TotalsDelta::for_item(item.category, item.calories, item.portions).negated();

    let mut tx = db.begin().await.context("begin tx")?;
    DailyItem::delete_tx(&mut tx, item.id).await?;
    apply_totals_tx(&mut tx, item.daily_log_id, &delta).await?;
    tx.commit().await.context("commit tx")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{ConversionFactors, FoodCategory};
    use time::macros::date;

    fn food(category: FoodCategory, cal_per_100g: f64, conv: ConversionFactors) -> Food {
        Food {
            id: Uuid::new_v4(),
            name: "test food".into(),
            category,
            calories_per_100g: cal_per_100g,
            protein_per_100g: 0.0,
            carbs_per_100g: 0.0,
            fat_per_100g: 0.0,
            default_quantity: 100.0,
            default_measure: MeasureType::Grams,
            grams_per_unit: conv.grams_per_unit,
            grams_per_cup: conv.grams_per_cup,
            grams_per_tbsp: conv.grams_per_tbsp,
            grams_per_tsp: conv.grams_per_tsp,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn food_values_run_the_full_pipeline() {
        // 175 g of a 200 kcal/100g protein food: 350 kcal, 1.75 raw -> 2.0 portions.
        let f = food(FoodCategory::Protein, 200.0, ConversionFactors::default());
        let v = values_for_food(&f, MeasureType::Grams, 175.0);
        assert_eq!(v.grams, 175.0);
        assert_eq!(v.calories, 350.0);
        assert_eq!(v.portions, 2.0);
    }

    #[test]
    fn food_values_with_unit_measure() {
        let f = food(
            FoodCategory::Carb,
            250.0,
            ConversionFactors {
                grams_per_unit: Some(30.0),
                ..Default::default()
            },
        );
        // 2 units = 60 g = 150 kcal = 1.25 carb portions.
        let v = values_for_food(&f, MeasureType::Unit, 2.0);
        assert_eq!(v.grams, 60.0);
        assert_eq!(v.calories, 150.0);
        assert_eq!(v.portions, 1.25);
    }

    #[test]
    fn missing_factor_logs_zero_everything() {
        let f = food(FoodCategory::Fat, 900.0, ConversionFactors::default());
        let v = values_for_food(&f, MeasureType::Tablespoon, 3.0);
        assert_eq!(v.grams, 0.0);
        assert_eq!(v.calories, 0.0);
        assert_eq!(v.portions, 0.0);
    }

    #[test]
    fn menu_values_scale_by_servings() {
        let item = MenuItem {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            name: "falafel plate".into(),
            category: FoodCategory::Restaurant,
            calories: 480.0,
            protein_g: 18.0,
            carbs_g: 52.0,
            fat_g: 22.0,
            created_at: OffsetDateTime::now_utc(),
        };
        let v = values_for_menu_item(&item, 1.5);
        assert_eq!(v.calories, 720.0);
        assert_eq!(v.portions, 6.0); // 720 / 120 default constant
    }

    #[test]
    fn barcode_values_use_density() {
        let item = BarcodeItem {
            id: Uuid::new_v4(),
            barcode: "7290000000001".into(),
            name: "granola bar".into(),
            category: FoodCategory::Carb,
            calories_per_100g: 400.0,
            protein_per_100g: 8.0,
            carbs_per_100g: 60.0,
            fat_per_100g: 12.0,
            default_grams: 30.0,
            created_at: OffsetDateTime::now_utc(),
        };
        let v = values_for_barcode(&item, 30.0);
        assert_eq!(v.calories, 120.0);
        assert_eq!(v.portions, 1.0);
    }

    #[test]
    fn rescale_keeps_portions_on_the_half_grid() {
        let item = DailyItem {
            id: Uuid::new_v4(),
            daily_log_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_id: None,
            menu_item_id: None,
            barcode_item_id: None,
            name: "rice".into(),
            category: FoodCategory::Carb,
            measure: MeasureType::Grams,
            quantity: 100.0,
            grams: 100.0,
            calories: 130.0,
            portions: 1.0,
            created_at: OffsetDateTime::now_utc(),
        };
        let v = rescaled_values(&item, 130.0);
        assert!((v.grams - 130.0).abs() < 1e-9);
        assert!((v.calories - 169.0).abs() < 1e-9);
        // 169 / 120 = 1.408.. -> 1.5, not a proportional 1.3 of the old portions.
        assert_eq!(v.portions, 1.5);
    }

    #[test]
    fn date_parsing_round_trips() {
        assert_eq!(parse_date("2025-03-14"), Some(date!(2025 - 03 - 14)));
        assert_eq!(parse_date("14/03/2025"), None);
        assert_eq!(parse_date("not-a-date"), None);
    }
}
