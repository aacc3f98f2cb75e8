use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use tickex_core::identity::Identity;
use tickex_core::models::{NewUser, UserProfile};

use crate::error::{ApiResponse, AppError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(form): Json<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.accounts.register(form).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Account created successfully.", profile),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginData {
    token: String,
    user: UserProfile,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Missing fields fail the same way as bad credentials
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = state.accounts.authenticate(&email, &password).await?;
    let token = state.auth.issue(&Identity::from(&user))?;

    Ok(ApiResponse::ok(
        "Logged in successfully.",
        LoginData {
            token,
            user: user.into(),
        },
    ))
}
