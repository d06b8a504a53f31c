use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    extract::{JsonBody, PathParam},
    auth::{repo_types::User, AuthUser},
    error::{AppError, AppResult},
    input::round2,
    meals::{
        dto::{
            AddMealRequest, CreatedMealResponse, DashboardResponse, HistoryRequest,
            HistoryResponse, LoggedFood, ModifyMealsRequest, ModifyMealsResponse,
        },
        repo, services,
    },
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/meals/history", post(history))
        .route("/meals/:id", get(get_meal).delete(delete_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(add_meal))
        .route("/meals/modify", post(modify_meals))
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}

// --- handlers ---

#[instrument(skip(state, body))]
pub async fn add_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<AddMealRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<CreatedMealResponse>)> {
    if body.food_name.trim().is_empty() {
        return Err(AppError::BadRequest("Must provide a meal".into()));
    }
    let servings = body.servings.parse_positive("servings")?;
    let day = body.date.unwrap_or_else(today);

    let (food, entry) =
        services::add_meal(&state.db, user_id, &body.food_name, servings, day).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&format!("/api/v1/meals/{}", entry.id))
            .map_err(|e| AppError::Internal(e.into()))?,
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedMealResponse {
            id: entry.id,
            food_code: food.food_code,
            food_name: food.food_name,
            servings: entry.servings,
            total_kcal: entry.total_kcal,
            eaten_on: entry.eaten_on,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<LoggedFood>> {
    let row = repo::find_row(&state.db, user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal not found".into()))?;
    Ok(Json(services::logged_food(row)))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    let removed = repo::delete_entry_tx(&mut tx, user_id, id).await?;
    tx.commit().await?;
    if removed == 0 {
        return Err(AppError::NotFound("Meal not found".into()));
    }
    info!(%user_id, %id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, body))]
pub async fn modify_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<ModifyMealsRequest>,
) -> AppResult<Json<ModifyMealsResponse>> {
    let res = services::modify_meals(&state.db, user_id, &body.items, today()).await?;
    Ok(Json(res))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        error!(%user_id, "user not found");
        AppError::Unauthorized("User not found".into())
    })?;
    let date = today();
    let (consumed, entries) = services::day_summary(&state.db, user_id, date).await?;

    Ok(Json(DashboardResponse {
        username: user.username,
        date,
        bmi: round2(user.bmi),
        weight_kg: round2(user.weight_kg),
        recommended_kcal: round2(user.recommended_kcal),
        remaining_kcal: round2(user.recommended_kcal - consumed.calories),
        consumed,
        entries,
    }))
}

#[instrument(skip(state, body))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<HistoryRequest>,
) -> AppResult<Json<HistoryResponse>> {
    let date = services::date_from_parts(&body.date)?;
    let (totals, entries) = services::day_summary(&state.db, user_id, date).await?;
    Ok(Json(HistoryResponse {
        date,
        totals,
        entries,
    }))
}
