use serde::{Deserialize, Serialize};

/// Food category as stored in Postgres and carried on every logged item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "food_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Protein,
    Carb,
    Fat,
    Vegetable,
    Fruit,
    Spread,
    Restaurant,
    Alcohol,
}

impl FoodCategory {
    /// Calories that make up one portion of this category.
    pub fn calories_per_portion(self) -> f64 {
        match self {
            FoodCategory::Protein => 200.0,
            FoodCategory::Carb => 120.0,
            FoodCategory::Fat => 120.0,
            FoodCategory::Vegetable => 35.0,
            FoodCategory::Fruit => 85.0,
            FoodCategory::Spread | FoodCategory::Restaurant | FoodCategory::Alcohol => 120.0,
        }
    }
}

/// How a quantity is expressed when logging a food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "measure_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MeasureType {
    Grams,
    Unit,
    Cup,
    Tablespoon,
    Teaspoon,
}

/// Per-food gram factors for the non-gram measures. Any factor may be absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionFactors {
    pub grams_per_unit: Option<f64>,
    pub grams_per_cup: Option<f64>,
    pub grams_per_tbsp: Option<f64>,
    pub grams_per_tsp: Option<f64>,
}

impl ConversionFactors {
    /// Gram equivalent of `quantity` in the requested measure.
    ///
    /// An absent factor for a non-gram measure yields 0 grams rather than an
    /// error; callers treating that as a data-entry gap must check upfront
    /// (the admin food endpoints do).
    pub fn grams_for(&self, measure: MeasureType, quantity: f64) -> f64 {
        let factor = match measure {
            MeasureType::Grams => 1.0,
            MeasureType::Unit => self.grams_per_unit.unwrap_or(0.0),
            MeasureType::Cup => self.grams_per_cup.unwrap_or(0.0),
            MeasureType::Tablespoon => self.grams_per_tbsp.unwrap_or(0.0),
            MeasureType::Teaspoon => self.grams_per_tsp.unwrap_or(0.0),
        };
        quantity * factor
    }

    pub fn has_factor(&self, measure: MeasureType) -> bool {
        match measure {
            MeasureType::Grams => true,
            MeasureType::Unit => self.grams_per_unit.is_some(),
            MeasureType::Cup => self.grams_per_cup.is_some(),
            MeasureType::Tablespoon => self.grams_per_tbsp.is_some(),
            MeasureType::Teaspoon => self.grams_per_tsp.is_some(),
        }
    }
}

/// Calories for `grams` of a food with the given per-100g density.
pub fn calories_for(calories_per_100g: f64, grams: f64) -> f64 {
    calories_per_100g / 100.0 * grams
}

/// Round to the nearest half, ties away from zero.
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Portions of `category` contained in `calories`.
///
/// Always a multiple of 0.5; progress bars and macro badges rely on that.
pub fn portions_for(category: FoodCategory, calories: f64) -> f64 {
    round_to_half(calories / category.calories_per_portion())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_idempotent() {
        for &x in &[0.0, 0.24, 0.25, 0.26, 1.75, 2.3, 17.49, 99.999, -1.3] {
            assert_eq!(round_to_half(round_to_half(x)), round_to_half(x));
        }
    }

    #[test]
    fn rounding_lands_on_half_grid() {
        let mut x = 0.0_f64;
        while x < 20.0 {
            let r = round_to_half(x);
            assert!(
                ((r * 2.0) - (r * 2.0).round()).abs() < 1e-9,
                "{x} rounded to {r}, off the 0.5 grid"
            );
            x += 0.07;
        }
    }

    #[test]
    fn conversion_is_linear_in_quantity() {
        let conv = ConversionFactors {
            grams_per_unit: Some(30.0),
            grams_per_cup: Some(240.0),
            grams_per_tbsp: Some(15.0),
            grams_per_tsp: Some(5.0),
        };
        for measure in [
            MeasureType::Grams,
            MeasureType::Unit,
            MeasureType::Cup,
            MeasureType::Tablespoon,
            MeasureType::Teaspoon,
        ] {
            let (q1, q2) = (1.5, 2.25);
            let lhs = conv.grams_for(measure, q1) + conv.grams_for(measure, q2);
            let rhs = conv.grams_for(measure, q1 + q2);
            assert!((lhs - rhs).abs() < 1e-9, "{measure:?} not linear");
        }
    }

    #[test]
    fn missing_cup_factor_yields_zero_grams() {
        let conv = ConversionFactors {
            grams_per_unit: Some(50.0),
            ..Default::default()
        };
        // Pinned behavior: no grams_per_cup set means exactly 0, not an error.
        assert_eq!(conv.grams_for(MeasureType::Cup, 2.0), 0.0);
        assert!(!conv.has_factor(MeasureType::Cup));
        assert!(conv.has_factor(MeasureType::Grams));
    }

    #[test]
    fn calories_are_linear_in_grams() {
        let density = 247.0;
        let lhs = calories_for(density, 80.0) + calories_for(density, 45.0);
        let rhs = calories_for(density, 125.0);
        assert!((lhs - rhs).abs() < 1e-9);
    }

    #[test]
    fn calorie_density_scales_from_100g() {
        assert_eq!(calories_for(200.0, 100.0), 200.0);
        assert_eq!(calories_for(200.0, 50.0), 100.0);
    }

    #[test]
    fn protein_350_calories_is_two_portions() {
        // 350 / 200 = 1.75 raw portions; 1.75 * 2 = 3.5 rounds up, so 2.0.
        assert_eq!(portions_for(FoodCategory::Protein, 350.0), 2.0);
    }

    #[test]
    fn portion_constants_per_category() {
        assert_eq!(portions_for(FoodCategory::Protein, 200.0), 1.0);
        assert_eq!(portions_for(FoodCategory::Carb, 120.0), 1.0);
        assert_eq!(portions_for(FoodCategory::Fat, 120.0), 1.0);
        assert_eq!(portions_for(FoodCategory::Vegetable, 35.0), 1.0);
        assert_eq!(portions_for(FoodCategory::Fruit, 85.0), 1.0);
        // Everything else falls back to the 120 kcal default.
        assert_eq!(portions_for(FoodCategory::Spread, 120.0), 1.0);
        assert_eq!(portions_for(FoodCategory::Alcohol, 120.0), 1.0);
        assert_eq!(portions_for(FoodCategory::Restaurant, 120.0), 1.0);
    }

    #[test]
    fn portions_stay_non_negative_multiples_of_half() {
        for calories in [0.0, 10.0, 42.0, 199.9, 200.1, 1234.5] {
            let p = portions_for(FoodCategory::Carb, calories);
            assert!(p >= 0.0);
            assert!(((p * 2.0) - (p * 2.0).round()).abs() < 1e-9);
        }
    }
}
