use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use tickex_core::identity::Identity;
use tickex_core::models::{TicketForm, TicketSearch};

use crate::error::{ApiResponse, AppError};
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/search-tickets", post(search_tickets))
        .route("/tickets", get(list_tickets))
        .route("/ticket/{id}", get(get_ticket))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/create-ticket", post(create_ticket))
        .route("/all-tickets", get(browse_tickets))
}

async fn create_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(form): Json<TicketForm>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.tickets.create(&identity, form).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Ticket created successfully.", ticket),
    ))
}

async fn search_tickets(
    State(state): State<AppState>,
    Json(query): Json<TicketSearch>,
) -> Result<impl IntoResponse, AppError> {
    let summaries = state.tickets.search(query).await?;
    Ok(ApiResponse::ok("Tickets found.", summaries))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Validate before lookup so malformed ids are a 400, not a 404
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::ValidationError("Invalid ticket ID.".to_string()))?;
    let ticket = state.tickets.get(id).await?;
    Ok(ApiResponse::ok(
        "Ticket details retrieved successfully.",
        ticket,
    ))
}

async fn list_tickets(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tickets = state.tickets.list_all().await?;
    Ok(ApiResponse::ok("All tickets retrieved successfully.", tickets))
}

/// The browse view: every ticket except the caller's own.
async fn browse_tickets(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = state.tickets.browse(&identity).await?;
    Ok(ApiResponse::ok("All tickets retrieved successfully.", tickets))
}
