use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::services::{AdminUser, AuthUser},
    error::{bad_request, internal, not_found, ApiError},
    plans::repo::{MealPlanItem, NewPlanItem, NewWorkout, WorkoutLog},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    50
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plan", get(my_plan))
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/:id", delete(delete_workout))
        .route("/admin/clients/:id/plan", post(add_plan_item))
        .route("/admin/plan-items/:id", delete(delete_plan_item))
}

#[instrument(skip(state))]
pub async fn my_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MealPlanItem>>, ApiError> {
    let rows = MealPlanItem::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn add_plan_item(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewPlanItem>,
) -> Result<(StatusCode, Json<MealPlanItem>), ApiError> {
    if !(0..=6).contains(&payload.day_of_week) {
        return Err(bad_request("day_of_week must be 0..=6"));
    }
    if payload.description.trim().is_empty() {
        return Err(bad_request("description must not be empty"));
    }
    let row = MealPlanItem::create(&state.db, id, &payload)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn delete_plan_item(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = MealPlanItem::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("Plan item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<WorkoutLog>>, ApiError> {
    let rows = WorkoutLog::list_by_user(&state.db, user_id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NewWorkout>,
) -> Result<(StatusCode, Json<WorkoutLog>), ApiError> {
    if payload.minutes <= 0 {
        return Err(bad_request("minutes must be positive"));
    }
    if payload.kind.trim().is_empty() {
        return Err(bad_request("kind must not be empty"));
    }
    let row = WorkoutLog::create(&state.db, user_id, &payload)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = WorkoutLog::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(not_found("Workout not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
