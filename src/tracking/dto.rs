use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nutrition::MeasureType;
use crate::tracking::repo::{DailyItem, DailyLog};

/// Exactly one of the three source ids must be set.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub food_id: Option<Uuid>,
    pub menu_item_id: Option<Uuid>,
    pub barcode_item_id: Option<Uuid>,
    /// Food-bank items only; defaults to the food's default measure.
    pub measure: Option<MeasureType>,
    pub quantity: f64,
}

impl AddItemRequest {
    pub fn source_count(&self) -> usize {
        [
            self.food_id.is_some(),
            self.menu_item_id.is_some(),
            self.barcode_item_id.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub delta: i32,
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub minutes: i32,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub log: DailyLog,
    pub items: Vec<DailyItem>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub log: DailyLog,
    pub item: DailyItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_count_counts_set_ids() {
        let mut req = AddItemRequest {
            food_id: None,
            menu_item_id: None,
            barcode_item_id: None,
            measure: None,
            quantity: 1.0,
        };
        assert_eq!(req.source_count(), 0);
        req.food_id = Some(Uuid::new_v4());
        assert_eq!(req.source_count(), 1);
        req.barcode_item_id = Some(Uuid::new_v4());
        assert_eq!(req.source_count(), 2);
    }
}
