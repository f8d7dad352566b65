use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::{AdminUser, AuthUser},
    error::{bad_request, internal, not_found, ApiError},
    guides::repo::{Guide, NewGuide},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/guides", get(list))
        .route("/admin/guides", post(create))
        .route("/admin/guides/:id", delete(remove))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Guide>>, ApiError> {
    let rows = Guide::list_visible(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<NewGuide>,
) -> Result<(StatusCode, Json<Guide>), ApiError> {
    if payload.title.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(bad_request("title and body must not be empty"));
    }
    let guide = Guide::create(&state.db, &payload).await.map_err(internal)?;
    info!(guide_id = %guide.id, by = %admin_id, "guide created");
    Ok((StatusCode::CREATED, Json(guide)))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Guide::delete(&state.db, id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found("Guide not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
