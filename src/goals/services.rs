use crate::goals::dto::EffectiveGoals;
use crate::goals::repo::{Profile, TargetTemplate};

/// Resolve the six effective targets.
///
/// With `targets_override` set, personal values win unconditionally. Otherwise
/// template values are preferred, falling back per field to personal values,
/// then 0. Callers re-derive this on every read; nothing caches the result.
pub fn resolve(profile: &Profile, template: Option<&TargetTemplate>) -> EffectiveGoals {
    let pick = |personal: Option<f64>, from_template: Option<f64>| -> f64 {
        if profile.targets_override {
            personal.unwrap_or(0.0)
        } else {
            from_template.or(personal).unwrap_or(0.0)
        }
    };

    EffectiveGoals {
        calories: pick(profile.calorie_goal, template.and_then(|t| t.calorie_goal)),
        protein_units: pick(profile.protein_goal, template.and_then(|t| t.protein_goal)),
        carb_units: pick(profile.carb_goal, template.and_then(|t| t.carb_goal)),
        fat_units: pick(profile.fat_goal, template.and_then(|t| t.fat_goal)),
        vegetable_units: pick(
            profile.vegetable_goal,
            template.and_then(|t| t.vegetable_goal),
        ),
        fruit_units: pick(profile.fruit_goal, template.and_then(|t| t.fruit_goal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn profile(targets_override: bool) -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            display_name: None,
            calorie_goal: Some(1800.0),
            protein_goal: Some(8.0),
            carb_goal: Some(6.0),
            fat_goal: Some(4.0),
            vegetable_goal: Some(5.0),
            fruit_goal: Some(2.0),
            water_goal: Some(10),
            weekly_activity_goal: Some(150),
            targets_override,
            template_id: None,
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn template() -> TargetTemplate {
        TargetTemplate {
            id: Uuid::new_v4(),
            name: "cutting".into(),
            calorie_goal: Some(1500.0),
            protein_goal: Some(10.0),
            carb_goal: Some(4.0),
            fat_goal: Some(3.0),
            vegetable_goal: Some(6.0),
            fruit_goal: Some(1.0),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn override_wins_regardless_of_template() {
        let p = profile(true);
        let t = template();
        let goals = resolve(&p, Some(&t));
        assert_eq!(goals.calories, 1800.0);
        assert_eq!(goals.protein_units, 8.0);
        assert_eq!(goals.fruit_units, 2.0);
    }

    #[test]
    fn template_wins_when_not_overriding() {
        let p = profile(false);
        let t = template();
        let goals = resolve(&p, Some(&t));
        assert_eq!(goals.calories, 1500.0);
        assert_eq!(goals.protein_units, 10.0);
        assert_eq!(goals.vegetable_units, 6.0);
    }

    #[test]
    fn missing_template_falls_back_to_personal() {
        let p = profile(false);
        let goals = resolve(&p, None);
        assert_eq!(goals.calories, 1800.0);
        assert_eq!(goals.carb_units, 6.0);
    }

    #[test]
    fn template_gaps_fall_back_per_field() {
        let p = profile(false);
        let mut t = template();
        t.carb_goal = None;
        let goals = resolve(&p, Some(&t));
        // carb comes from the profile, the rest from the template
        assert_eq!(goals.carb_units, 6.0);
        assert_eq!(goals.calories, 1500.0);
    }

    #[test]
    fn everything_absent_resolves_to_zero() {
        let mut p = profile(true);
        p.calorie_goal = None;
        p.protein_goal = None;
        p.carb_goal = None;
        p.fat_goal = None;
        p.vegetable_goal = None;
        p.fruit_goal = None;
        let goals = resolve(&p, None);
        assert_eq!(goals.calories, 0.0);
        assert_eq!(goals.protein_units, 0.0);
        assert_eq!(goals.fruit_units, 0.0);
    }
}
