use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::{AdminUser, AuthUser},
    error::{bad_request, internal, not_found, ApiError},
    goals::dto::{AssignTemplateRequest, GoalsResponse, TemplatePayload, UpdateGoalsRequest},
    goals::repo::{list_clients, ClientSummary, Profile, TargetTemplate},
    goals::services,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/goals", get(get_goals).put(update_goals))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/templates", get(list_templates).post(create_template))
        .route(
            "/admin/templates/:id",
            put(update_template).delete(delete_template),
        )
        .route("/admin/clients", get(clients))
        .route("/admin/clients/:id/template", put(assign_template))
}

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    Profile::get(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Profile not found"))
}

async fn goals_response(state: &AppState, profile: Profile) -> Result<GoalsResponse, ApiError> {
    // Fetched fresh on every read; a stale template must never leak through.
    let template = match (profile.targets_override, profile.template_id) {
        (false, Some(id)) => TargetTemplate::get(&state.db, id).await.map_err(internal)?,
        _ => None,
    };
    Ok(GoalsResponse {
        effective: services::resolve(&profile, template.as_ref()),
        water_goal: profile.water_goal,
        weekly_activity_goal: profile.weekly_activity_goal,
        targets_override: profile.targets_override,
        template_id: profile.template_id,
    })
}

#[instrument(skip(state))]
pub async fn get_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalsResponse>, ApiError> {
    let profile = load_profile(&state, user_id).await?;
    Ok(Json(goals_response(&state, profile).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateGoalsRequest>,
) -> Result<Json<GoalsResponse>, ApiError> {
    payload.validate().map_err(bad_request)?;

    let profile = Profile::update_goals(&state.db, user_id, &payload)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Profile not found"))?;

    info!(user_id = %user_id, targets_override = profile.targets_override, "goals updated");
    Ok(Json(goals_response(&state, profile).await?))
}

#[instrument(skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<TargetTemplate>>, ApiError> {
    let rows = TargetTemplate::list(&state.db).await.map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_template(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<TemplatePayload>,
) -> Result<(StatusCode, Json<TargetTemplate>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }
    let template = TargetTemplate::create(&state.db, &payload)
        .await
        .map_err(internal)?;
    info!(template_id = %template.id, by = %admin_id, "template created");
    Ok((StatusCode::CREATED, Json(template)))
}

#[instrument(skip(state, payload))]
pub async fn update_template(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TemplatePayload>,
) -> Result<Json<TargetTemplate>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }
    let template = TargetTemplate::update(&state.db, id, &payload)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Template not found"))?;
    Ok(Json(template))
}

#[instrument(skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = TargetTemplate::delete(&state.db, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(not_found("Template not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn clients(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<ClientSummary>>, ApiError> {
    let rows = list_clients(&state.db).await.map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn assign_template(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTemplateRequest>,
) -> Result<Json<Profile>, ApiError> {
    if let Some(template_id) = payload.template_id {
        TargetTemplate::get(&state.db, template_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("Template not found"))?;
    }
    let profile = Profile::assign_template(&state.db, id, payload.template_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Client not found"))?;

    info!(client = %id, template = ?payload.template_id, by = %admin_id, "template assigned");
    Ok(Json(profile))
}
