use axum::{extract::State, routing::get, Json, Router};
use tracing::info;
use validator::Validate;

use crate::db::DatabaseOperations;
use crate::middleware::CurrentUser;
use crate::models::{AppState, Profile, UpdateProfileRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .with_state(state)
}

async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Profile>> {
    let profile = DatabaseOperations::get_profile(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    request.validate()?;

    let profile = DatabaseOperations::upsert_profile_address(&state.pool, user_id, &request).await?;
    info!(user_id = %user_id, "Profile address updated");
    Ok(Json(profile))
}
