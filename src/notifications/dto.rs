use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// App screen a notification deep-links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    FoodBank,
    Progress,
    Measurements,
    Guides,
    MealPlan,
}

impl Screen {
    /// Unknown or missing names fall back to the home screen.
    pub fn parse(raw: Option<&str>) -> Screen {
        match raw {
            Some("food_bank") => Screen::FoodBank,
            Some("progress") => Screen::Progress,
            Some("measurements") => Screen::Measurements,
            Some("guides") => Screen::Guides,
            Some("meal_plan") => Screen::MealPlan,
            _ => Screen::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::FoodBank => "food_bank",
            Screen::Progress => "progress",
            Screen::Measurements => "measurements",
            Screen::Guides => "guides",
            Screen::MealPlan => "meal_plan",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    pub token: String,
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    /// Omit to broadcast to every registered device.
    pub user_ids: Option<Vec<Uuid>>,
    pub title: String,
    pub body: String,
    pub screen: Option<String>,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub pruned: usize,
}

#[cfg(test)]
mod screen_tests {
    use super::*;

    #[test]
    fn known_screens_parse() {
        assert_eq!(Screen::parse(Some("guides")), Screen::Guides);
        assert_eq!(Screen::parse(Some("meal_plan")), Screen::MealPlan);
        assert_eq!(Screen::parse(Some("food_bank")), Screen::FoodBank);
    }

    #[test]
    fn unknown_or_missing_falls_back_to_home() {
        assert_eq!(Screen::parse(Some("settings")), Screen::Home);
        assert_eq!(Screen::parse(Some("")), Screen::Home);
        assert_eq!(Screen::parse(None), Screen::Home);
    }

    #[test]
    fn as_str_round_trips() {
        for screen in [
            Screen::Home,
            Screen::FoodBank,
            Screen::Progress,
            Screen::Measurements,
            Screen::Guides,
            Screen::MealPlan,
        ] {
            assert_eq!(Screen::parse(Some(screen.as_str())), screen);
        }
    }
}
