use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::{bad_request, internal, not_found, ApiError},
    measurements::repo::{Measurement, NewMeasurement},
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
        .route("/measurements", get(list).post(create))
        .route("/measurements/:id", axum::routing::delete(remove))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Measurement>>, ApiError> {
    let rows = Measurement::list_by_user(&state.db, user_id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NewMeasurement>,
) -> Result<(StatusCode, Json<Measurement>), ApiError> {
    for v in [
        payload.weight_kg,
        payload.waist_cm,
        payload.hip_cm,
        payload.chest_cm,
    ]
    .into_iter()
    .flatten()
    {
        if !v.is_finite() || v <= 0.0 {
            return Err(bad_request("measurements must be positive"));
        }
    }
    let row = Measurement::create(&state.db, user_id, &payload)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Measurement::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(not_found("Measurement not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
