use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};

use tickex_core::identity::Identity;
use tickex_core::models::ProfileUpdate;

use crate::error::{ApiResponse, AppError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/get", get(get_profile))
        .route("/profile/edit", put(update_profile))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.accounts.get_profile(identity.id).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully.", profile))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.accounts.update_profile(identity.id, update).await?;
    Ok(ApiResponse::ok("Profile updated successfully.", profile))
}
