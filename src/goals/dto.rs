use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The six resolved daily targets shown by the progress UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveGoals {
    pub calories: f64,
    pub protein_units: f64,
    pub carb_units: f64,
    pub fat_units: f64,
    pub vegetable_units: f64,
    pub fruit_units: f64,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub effective: EffectiveGoals,
    pub water_goal: Option<i32>,
    pub weekly_activity_goal: Option<i32>,
    pub targets_override: bool,
    pub template_id: Option<Uuid>,
}

/// Full replace of the personal goal set.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalsRequest {
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub vegetable_goal: Option<f64>,
    pub fruit_goal: Option<f64>,
    pub water_goal: Option<i32>,
    pub weekly_activity_goal: Option<i32>,
    #[serde(default)]
    pub targets_override: bool,
}

impl UpdateGoalsRequest {
    pub fn validate(&self) -> Result<(), String> {
        for v in [
            self.calorie_goal,
            self.protein_goal,
            self.carb_goal,
            self.fat_goal,
            self.vegetable_goal,
            self.fruit_goal,
        ]
        .into_iter()
        .flatten()
        {
            if !v.is_finite() || v < 0.0 {
                return Err("goals must be non-negative".into());
            }
        }
        for v in [self.water_goal, self.weekly_activity_goal]
            .into_iter()
            .flatten()
        {
            if v < 0 {
                return Err("goals must be non-negative".into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplatePayload {
    pub name: String,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub vegetable_goal: Option<f64>,
    pub fruit_goal: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTemplateRequest {
    /// `null` detaches the client from any template.
    pub template_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UpdateGoalsRequest {
        UpdateGoalsRequest {
            calorie_goal: Some(1800.0),
            protein_goal: Some(8.0),
            carb_goal: Some(6.0),
            fat_goal: Some(4.0),
            vegetable_goal: Some(5.0),
            fruit_goal: Some(2.0),
            water_goal: Some(10),
            weekly_activity_goal: Some(150),
            targets_override: false,
        }
    }

    #[test]
    fn full_goal_set_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn negative_float_goal_is_rejected() {
        let mut r = request();
        r.fat_goal = Some(-1.0);
        assert!(r.validate().is_err());
    }

    #[test]
    fn negative_counter_goals_are_rejected() {
        let mut r = request();
        r.water_goal = Some(-3);
        assert!(r.validate().is_err());

        let mut r = request();
        r.weekly_activity_goal = Some(-30);
        assert!(r.validate().is_err());
    }

    #[test]
    fn absent_fields_are_fine() {
        let r = UpdateGoalsRequest {
            calorie_goal: None,
            protein_goal: None,
            carb_goal: None,
            fat_goal: None,
            vegetable_goal: None,
            fruit_goal: None,
            water_goal: None,
            weekly_activity_goal: None,
            targets_override: true,
        };
        assert!(r.validate().is_ok());
    }
}
