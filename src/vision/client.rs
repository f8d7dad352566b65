use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nutrition::FoodCategory;

/// One structured guess from the plate-analysis function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodGuess {
    pub name: String,
    pub grams: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub category: FoodCategory,
}

/// Natural-language plate description plus structured guesses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateAnalysis {
    pub description: String,
    #[serde(default)]
    pub items: Vec<FoodGuess>,
}

#[async_trait]
pub trait PlateAnalyzer: Send + Sync {
    async fn analyze(&self, image_url: &str) -> anyhow::Result<PlateAnalysis>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    image_url: &'a str,
}

/// HTTP client for the hosted analysis edge function.
#[derive(Clone)]
pub struct EdgeAnalyzer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EdgeAnalyzer {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PlateAnalyzer for EdgeAnalyzer {
    async fn analyze(&self, image_url: &str) -> anyhow::Result<PlateAnalysis> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&AnalyzeRequest { image_url })
            .send()
            .await?;
        if !resp.status().is_success() {
            anyhow::bail!("analysis function returned HTTP {}", resp.status());
        }
        let analysis: PlateAnalysis = resp.json().await?;
        debug!(items = analysis.items.len(), "plate analysis received");
        Ok(analysis)
    }
}
