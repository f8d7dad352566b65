use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::{bad_request, internal, not_found, ApiError},
    foods::repo::{BarcodeItem, Food, MenuItem},
    nutrition::MeasureType,
    state::AppState,
    tracking::dto::{
        ActivityRequest, AddItemRequest, DayResponse, ItemResponse, UpdateItemRequest,
        WaterRequest,
    },
    tracking::repo::{DailyItem, DailyLog, NewItem},
    tracking::services,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/days/today", get(get_today))
        .route("/days/:date", get(get_day))
        .route("/days/:date/items", post(add_item))
        .route("/days/:date/water", post(adjust_water))
        .route("/days/:date/activity", post(add_activity))
        .route("/items/:id", patch(update_item).delete(delete_item))
}

fn parse_day(raw: &str) -> Result<Date, ApiError> {
    services::parse_date(raw).ok_or_else(|| bad_request("date must be YYYY-MM-DD"))
}

async fn day_response(
    state: &AppState,
    user_id: Uuid,
    date: Date,
) -> Result<DayResponse, ApiError> {
    let log = DailyLog::get_or_create(&state.db, user_id, date)
        .await
        .map_err(internal)?;
    let items = DailyItem::list_by_log(&state.db, log.id)
        .await
        .map_err(internal)?;
    Ok(DayResponse { log, items })
}

#[instrument(skip(state))]
pub async fn get_today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DayResponse>, ApiError> {
    let date = services::local_today(state.config.local_utc_offset_minutes);
    Ok(Json(day_response(&state, user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, ApiError> {
    let date = parse_day(&date)?;
    Ok(Json(day_response(&state, user_id, date).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let date = parse_day(&date)?;
    if payload.source_count() != 1 {
        return Err(bad_request(
            "exactly one of food_id, menu_item_id, barcode_item_id is required",
        ));
    }
    if !payload.quantity.is_finite() || payload.quantity <= 0.0 {
        return Err(bad_request("quantity must be positive"));
    }

    let new_item = if let Some(food_id) = payload.food_id {
        let food = Food::get(&state.db, food_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("Food not found"))?;
        let measure = payload.measure.unwrap_or(food.default_measure);
        let values = services::values_for_food(&food, measure, payload.quantity);
        NewItem {
            food_id: Some(food.id),
            menu_item_id: None,
            barcode_item_id: None,
            name: food.name.clone(),
            category: food.category,
            measure,
            quantity: payload.quantity,
            grams: values.grams,
            calories: values.calories,
            portions: values.portions,
        }
    } else if let Some(menu_item_id) = payload.menu_item_id {
        let item = MenuItem::get(&state.db, menu_item_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("Menu item not found"))?;
        let values = services::values_for_menu_item(&item, payload.quantity);
        NewItem {
            food_id: None,
            menu_item_id: Some(item.id),
            barcode_item_id: None,
            name: item.name.clone(),
            category: item.category,
            measure: MeasureType::Unit,
            quantity: payload.quantity,
            grams: values.grams,
            calories: values.calories,
            portions: values.portions,
        }
    } else {
        let barcode_item_id = payload.barcode_item_id.unwrap_or_default();
        let item = BarcodeItem::get(&state.db, barcode_item_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("Product not found"))?;
        let values = services::values_for_barcode(&item, payload.quantity);
        NewItem {
            food_id: None,
            menu_item_id: None,
            barcode_item_id: Some(item.id),
            name: item.name.clone(),
            category: item.category,
            measure: MeasureType::Grams,
            quantity: payload.quantity,
            grams: values.grams,
            calories: values.calories,
            portions: values.portions,
        }
    };

    let (log, item) = services::insert_item(&state.db, user_id, date, new_item)
        .await
        .map_err(internal)?;

    info!(user_id = %user_id, item_id = %item.id, calories = item.calories, "item logged");
    Ok((StatusCode::CREATED, Json(ItemResponse { log, item })))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    if !payload.quantity.is_finite() || payload.quantity <= 0.0 {
        return Err(bad_request("quantity must be positive"));
    }
    let item = DailyItem::get_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Item not found"))?;

    let item = services::rescale_item(&state.db, &item, payload.quantity)
        .await
        .map_err(internal)?;
    let log = DailyLog::get_by_id(&state.db, item.daily_log_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Daily log not found"))?;

    Ok(Json(ItemResponse { log, item }))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyLog>, ApiError> {
    let item = DailyItem::get_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Item not found"))?;

    services::remove_item(&state.db, &item)
        .await
        .map_err(internal)?;
    let log = DailyLog::get_by_id(&state.db, item.daily_log_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Daily log not found"))?;

    Ok(Json(log))
}

#[instrument(skip(state))]
pub async fn adjust_water(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<DailyLog>, ApiError> {
    let date = parse_day(&date)?;
    if payload.delta == 0 {
        return Err(bad_request("delta must be non-zero"));
    }
    let log = DailyLog::adjust_water(&state.db, user_id, date, payload.delta)
        .await
        .map_err(internal)?;
    Ok(Json(log))
}

#[instrument(skip(state))]
pub async fn add_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<DailyLog>, ApiError> {
    let date = parse_day(&date)?;
    if payload.minutes <= 0 {
        return Err(bad_request("minutes must be positive"));
    }
    let log = DailyLog::add_activity(&state.db, user_id, date, payload.minutes)
        .await
        .map_err(internal)?;
    Ok(Json(log))
}
