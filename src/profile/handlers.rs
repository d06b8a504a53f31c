use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    extract::JsonBody,
    auth::{dto::PublicUser, repo_types::User, AuthUser},
    error::{AppError, AppResult},
    profile::{dto::UpdateMetricsRequest, metrics::BodyMetrics},
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/metrics", put(update_metrics))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        error!(user_id = %user_id, "user not found");
        AppError::Unauthorized("User not found".into())
    })?;
    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_metrics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<UpdateMetricsRequest>,
) -> AppResult<Json<PublicUser>> {
    let height_cm = payload.height_cm.parse("height_cm")?;
    let weight_kg = payload.weight_kg.parse("weight_kg")?;
    let metrics = BodyMetrics::compute(height_cm, weight_kg)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = User::update_metrics(&state.db, user_id, &metrics)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    info!(%user_id, bmi = user.bmi, category = %user.bmi_category, "metrics updated");
    Ok(Json(PublicUser::from(user)))
}
