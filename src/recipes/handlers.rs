use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    extract::{JsonBody, PathParam, QueryParams},
    auth::AuthUser,
    error::{AppError, AppResult},
    recipes::{
        dto::{Pagination, RecipeResponse, SuggestRecipeRequest},
        repo, services,
    },
    state::AppState,
};

const MAX_PAGE: i64 = 100;

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/suggest", post(suggest_recipe))
        .route("/recipes/:id", get(get_recipe))
}

#[instrument(skip(state, body))]
pub async fn suggest_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<SuggestRecipeRequest>,
) -> AppResult<(StatusCode, Json<RecipeResponse>)> {
    let client = state
        .recipes
        .clone()
        .ok_or_else(|| AppError::Unavailable("Recipe suggestions are not configured".into()))?;

    let recipe = services::suggest_recipe(
        &state.db,
        client.as_ref(),
        user_id,
        &body,
        OffsetDateTime::now_utc().date(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    QueryParams(p): QueryParams<Pagination>,
) -> AppResult<Json<Vec<RecipeResponse>>> {
    let limit = p.limit.clamp(1, MAX_PAGE);
    let offset = p.offset.max(0);
    let recipes = repo::list_by_user(&state.db, user_id, limit, offset).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<RecipeResponse>> {
    repo::find_by_id(&state.db, user_id, id)
        .await?
        .map(|r| Json(RecipeResponse::from(r)))
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}
