use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    extract::JsonBody,
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        repo_types::{NewUser, User},
        services::{hash_password, is_valid_username, verify_password, JwtKeys},
    },
    error::{AppError, AppResult},
    profile::metrics::BodyMetrics,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

fn issue(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    let (access_token, refresh_token) = keys.sign_pair(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let username = payload.username.trim();

    if !is_valid_username(username) {
        warn!(username = %username, "invalid username");
        return Err(AppError::BadRequest(
            "Username must be 3-32 letters, digits, '.', '_' or '-'".into(),
        ));
    }

    if payload.password.is_empty() || payload.password != payload.confirm_password {
        warn!("password confirmation mismatch");
        return Err(AppError::BadRequest(
            "Please enter the password and confirm it properly".into(),
        ));
    }

    let height_cm = payload.height_cm.parse("height_cm")?;
    let weight_kg = payload.weight_kg.parse("weight_kg")?;
    let metrics = BodyMetrics::compute(height_cm, weight_kg)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if User::find_by_username(&state.db, username).await?.is_some() {
        warn!(username = %username, "username already registered");
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    let user = User::create(
        &state.db,
        NewUser {
            username,
            password_hash: &hash,
            height_cm: metrics.height_cm,
            weight_kg: metrics.weight_kg,
            bmi: metrics.bmi,
            bmi_category: metrics.category.code(),
            recommended_kcal: metrics.recommended_kcal,
        },
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Username already exists".into())
        }
        other => AppError::Database(other),
    })?;

    info!(user_id = %user.id, username = %user.username, bmi = user.bmi, "user registered");
    Ok((StatusCode::CREATED, Json(issue(&state, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Must provide username".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Must provide password".into()));
    }

    let user = match User::find_by_username(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(username = %username, "login unknown username");
            return Err(AppError::Unauthorized("Invalid username and/or password".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(username = %username, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid username and/or password".into()));
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(issue(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token)?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(Json(issue(&state, user)?))
}
