use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::{AdminUser, AuthUser},
    error::{bad_request, internal, not_found, ApiError},
    foods::dto::{BarcodePayload, FoodPayload, FoodQuery, MenuItemPayload, RestaurantPayload},
    foods::repo::{BarcodeItem, Food, MenuItem, Restaurant},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/foods/:id", get(get_food))
        .route("/restaurants", get(list_restaurants))
        .route("/restaurants/:id/menu", get(list_menu))
        .route("/barcodes/:code", get(get_barcode))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/foods", post(create_food))
        .route("/admin/foods/:id", put(update_food).delete(delete_food))
        .route("/admin/restaurants", post(create_restaurant))
        .route("/admin/restaurants/:id", delete(delete_restaurant))
        .route("/admin/restaurants/:id/menu", post(create_menu_item))
        .route("/admin/menu-items/:id", delete(delete_menu_item))
        .route("/admin/barcodes", post(upsert_barcode))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<FoodQuery>,
) -> Result<Json<Vec<Food>>, ApiError> {
    let foods = Food::search(&state.db, q.search.as_deref(), q.limit, q.offset)
        .await
        .map_err(internal)?;
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Food>, ApiError> {
    let food = Food::get(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Food not found"))?;
    Ok(Json(food))
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<FoodPayload>,
) -> Result<(StatusCode, Json<Food>), ApiError> {
    payload.validate().map_err(bad_request)?;
    let food = Food::create(&state.db, &payload).await.map_err(internal)?;
    info!(food_id = %food.id, name = %food.name, by = %admin_id, "food created");
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodPayload>,
) -> Result<Json<Food>, ApiError> {
    payload.validate().map_err(bad_request)?;
    let food = Food::update(&state.db, id, &payload)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Food not found"))?;
    Ok(Json(food))
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Food::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("Food not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let rows = Restaurant::list(&state.db).await.map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn list_menu(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let rows = MenuItem::list_by_restaurant(&state.db, id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Json(payload): Json<RestaurantPayload>,
) -> Result<(StatusCode, Json<Restaurant>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }
    let row = Restaurant::create(&state.db, payload.name.trim())
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Restaurant::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("Restaurant not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MenuItemPayload>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }
    if payload.calories < 0.0 {
        return Err(bad_request("calories must be non-negative"));
    }
    let row = MenuItem::create(&state.db, id, &payload)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = MenuItem::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("Menu item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 404 on an unknown code; the client renders its own "unknown product" label.
#[instrument(skip(state))]
pub async fn get_barcode(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(code): Path<String>,
) -> Result<Json<BarcodeItem>, ApiError> {
    let item = BarcodeItem::find_by_code(&state.db, &code)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Product not found"))?;
    Ok(Json(item))
}

#[instrument(skip(state, payload))]
pub async fn upsert_barcode(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Json(payload): Json<BarcodePayload>,
) -> Result<(StatusCode, Json<BarcodeItem>), ApiError> {
    if payload.barcode.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(bad_request("barcode and name must not be empty"));
    }
    if payload.calories_per_100g < 0.0 || payload.default_grams <= 0.0 {
        return Err(bad_request("invalid nutrition values"));
    }
    let item = BarcodeItem::create(&state.db, &payload)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(item)))
}
