use serde::Deserialize;

use crate::nutrition::{FoodCategory, MeasureType};

#[derive(Debug, Deserialize)]
pub struct FoodQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct FoodPayload {
    pub name: String,
    pub category: FoodCategory,
    pub calories_per_100g: f64,
    #[serde(default)]
    pub protein_per_100g: f64,
    #[serde(default)]
    pub carbs_per_100g: f64,
    #[serde(default)]
    pub fat_per_100g: f64,
    #[serde(default = "default_quantity")]
    pub default_quantity: f64,
    #[serde(default = "default_measure")]
    pub default_measure: MeasureType,
    pub grams_per_unit: Option<f64>,
    pub grams_per_cup: Option<f64>,
    pub grams_per_tbsp: Option<f64>,
    pub grams_per_tsp: Option<f64>,
}
fn default_quantity() -> f64 {
    100.0
}
fn default_measure() -> MeasureType {
    MeasureType::Grams
}

impl FoodPayload {
    /// Admin-side sanity check; read-path behavior stays permissive.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        if self.calories_per_100g < 0.0
            || self.protein_per_100g < 0.0
            || self.carbs_per_100g < 0.0
            || self.fat_per_100g < 0.0
        {
            return Err("nutrition values must be non-negative".into());
        }
        if self.default_quantity <= 0.0 {
            return Err("default_quantity must be positive".into());
        }
        let factors = crate::nutrition::ConversionFactors {
            grams_per_unit: self.grams_per_unit,
            grams_per_cup: self.grams_per_cup,
            grams_per_tbsp: self.grams_per_tbsp,
            grams_per_tsp: self.grams_per_tsp,
        };
        if !factors.has_factor(self.default_measure) {
            return Err(format!(
                "default measure {:?} requires its gram factor",
                self.default_measure
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RestaurantPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MenuItemPayload {
    pub name: String,
    #[serde(default = "default_menu_category")]
    pub category: FoodCategory,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}
fn default_menu_category() -> FoodCategory {
    FoodCategory::Restaurant
}

#[derive(Debug, Deserialize)]
pub struct BarcodePayload {
    pub barcode: String,
    pub name: String,
    pub category: FoodCategory,
    pub calories_per_100g: f64,
    #[serde(default)]
    pub protein_per_100g: f64,
    #[serde(default)]
    pub carbs_per_100g: f64,
    #[serde(default)]
    pub fat_per_100g: f64,
    #[serde(default = "default_grams")]
    pub default_grams: f64,
}
fn default_grams() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> FoodPayload {
        FoodPayload {
            name: "cottage cheese".into(),
            category: FoodCategory::Protein,
            calories_per_100g: 90.0,
            protein_per_100g: 11.0,
            carbs_per_100g: 3.5,
            fat_per_100g: 3.0,
            default_quantity: 100.0,
            default_measure: MeasureType::Grams,
            grams_per_unit: None,
            grams_per_cup: None,
            grams_per_tbsp: None,
            grams_per_tsp: None,
        }
    }

    #[test]
    fn valid_gram_food_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn non_gram_default_measure_requires_factor() {
        let mut p = payload();
        p.default_measure = MeasureType::Cup;
        assert!(p.validate().is_err());
        p.grams_per_cup = Some(240.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn negative_density_is_rejected() {
        let mut p = payload();
        p.calories_per_100g = -1.0;
        assert!(p.validate().is_err());
    }
}
