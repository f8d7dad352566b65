use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::{AdminUser, AuthUser},
    error::{bad_request, internal, ApiError},
    notifications::dto::{
        DispatchSummary, RegisterTokenRequest, Screen, SendNotificationRequest,
    },
    notifications::repo::PushToken,
    notifications::services,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/push-tokens", post(register_token).delete(remove_token))
        .route("/admin/notifications", post(send_notification))
}

#[instrument(skip(state, payload))]
pub async fn register_token(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<(StatusCode, Json<PushToken>), ApiError> {
    if payload.token.trim().is_empty() {
        return Err(bad_request("token must not be empty"));
    }
    let platform = payload.platform.as_deref().unwrap_or("unknown");
    let token = PushToken::upsert(&state.db, user_id, payload.token.trim(), platform)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(token)))
}

#[instrument(skip(state, payload))]
pub async fn remove_token(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<StatusCode, ApiError> {
    PushToken::delete(&state.db, user_id, payload.token.trim())
        .await
        .map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn send_notification(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Json(payload): Json<SendNotificationRequest>,
) -> Result<Json<DispatchSummary>, ApiError> {
    if payload.title.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(bad_request("title and body must not be empty"));
    }

    let tokens = match &payload.user_ids {
        Some(ids) if ids.is_empty() => {
            return Err(bad_request("user_ids must not be an empty list"));
        }
        Some(ids) => PushToken::list_by_users(&state.db, ids)
            .await
            .map_err(internal)?,
        None => PushToken::list_all(&state.db).await.map_err(internal)?,
    };

    let screen = Screen::parse(payload.screen.as_deref());
    let summary = services::dispatch(
        &state.db,
        state.push.as_ref(),
        tokens,
        payload.title.trim(),
        payload.body.trim(),
        screen,
        payload.params.as_ref(),
    )
    .await
    .map_err(internal)?;

    Ok(Json(summary))
}
