use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::{bad_request, internal, ApiError},
    nutrition::{portions_for, FoodCategory},
    state::AppState,
    vision::client::PlateAnalysis,
};

/// Guesses kept per analysis; anything past this is noise in practice.
const MAX_GUESSES: usize = 6;

pub fn routes() -> Router<AppState> {
    Router::new().route("/vision/analyze", post(analyze_plate))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzedItem {
    pub name: String,
    pub grams: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub category: FoodCategory,
    pub portions: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub description: String,
    pub items: Vec<AnalyzedItem>,
}

pub fn to_response(analysis: PlateAnalysis) -> AnalyzeResponse {
    let items = analysis
        .items
        .into_iter()
        .take(MAX_GUESSES)
        .map(|guess| AnalyzedItem {
            portions: portions_for(guess.category, guess.calories),
            name: guess.name,
            grams: guess.grams,
            calories: guess.calories,
            protein_g: guess.protein_g,
            carbs_g: guess.carbs_g,
            fat_g: guess.fat_g,
            category: guess.category,
        })
        .collect();
    AnalyzeResponse {
        description: analysis.description,
        items,
    }
}

#[instrument(skip(state, payload))]
pub async fn analyze_plate(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let url = payload.image_url.trim();
    if url.is_empty() {
        return Err(bad_request("image_url must not be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(bad_request("image_url must be an http(s) URL"));
    }
    let analysis = state.vision.analyze(url).await.map_err(internal)?;
    Ok(Json(to_response(analysis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::client::FoodGuess;

    fn guess(name: &str, category: FoodCategory, calories: f64) -> FoodGuess {
        FoodGuess {
            name: name.to_string(),
            grams: 100.0,
            calories,
            protein_g: 10.0,
            carbs_g: 20.0,
            fat_g: 5.0,
            category,
        }
    }

    #[test]
    fn derives_portions_per_category() {
        let analysis = PlateAnalysis {
            description: "grilled chicken with rice".to_string(),
            items: vec![
                guess("chicken breast", FoodCategory::Protein, 350.0),
                guess("white rice", FoodCategory::Carb, 180.0),
            ],
        };
        let resp = to_response(analysis);
        assert_eq!(resp.items[0].portions, 2.0);
        assert_eq!(resp.items[1].portions, 1.5);
    }

    #[test]
    fn gram_estimates_pass_through_unchanged() {
        // Only portions are derived here; the analyzer's gram estimate is not ours to round.
        let mut g = guess("hummus", FoodCategory::Fat, 210.0);
        g.grams = 87.3;
        let resp = to_response(PlateAnalysis {
            description: "hummus bowl".to_string(),
            items: vec![g],
        });
        assert_eq!(resp.items[0].grams, 87.3);
        // 210 / 120 = 1.75 raw, which rounds up to 2.0 on the half grid.
        assert_eq!(resp.items[0].portions, 2.0);
    }

    #[test]
    fn truncates_to_six_items() {
        let items = (0..9)
            .map(|i| guess(&format!("item {i}"), FoodCategory::Carb, 120.0))
            .collect();
        let resp = to_response(PlateAnalysis {
            description: "busy plate".to_string(),
            items,
        });
        assert_eq!(resp.items.len(), 6);
    }

    #[test]
    fn empty_analysis_passes_through() {
        let resp = to_response(PlateAnalysis {
            description: "empty plate".to_string(),
            items: vec![],
        });
        assert!(resp.items.is_empty());
        assert_eq!(resp.description, "empty plate");
    }
}
