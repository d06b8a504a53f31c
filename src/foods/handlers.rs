use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    extract::{PathParam, QueryParams},
    auth::AuthUser,
    error::{AppError, AppResult},
    foods::{
        dto::{AutocompleteQuery, SearchQuery},
        repo_types::Food,
    },
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/search", get(search_foods))
        .route("/foods/autocomplete", get(autocomplete_foods))
        .route("/foods/:code", get(get_food))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    QueryParams(query): QueryParams<SearchQuery>,
) -> AppResult<Json<Vec<Food>>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest("Query parameter q is required".into()));
    }
    let foods = Food::search_by_name(&state.db, q).await?;
    debug!(q = %q, hits = foods.len(), "food search");
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn autocomplete_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    QueryParams(query): QueryParams<AutocompleteQuery>,
) -> AppResult<Json<Vec<Food>>> {
    if query.prefix.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(Food::autocomplete(&state.db, &query.prefix).await?))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    PathParam(code): PathParam<String>,
) -> AppResult<Json<Food>> {
    Food::find_by_code(&state.db, &code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Food not found".into()))
}
