use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

use super::dto::{CreateWorkTicketRequest, DeleteResponse, UpdateWorkTicketRequest};
use super::repo::WorkTicket;
use super::services::{validate_create, validate_update};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/work-tickets", get(list_tickets).post(create_ticket))
        .route(
            "/work-tickets/:id",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
}

#[instrument(skip(state))]
pub async fn list_tickets(State(state): State<AppState>) -> Result<Json<Vec<WorkTicket>>, ApiError> {
    let tickets = WorkTicket::list(&state.db).await.map_err(|e| {
        error!(error = %e, "list tickets failed");
        ApiError::Internal(e)
    })?;
    Ok(Json(tickets))
}

#[instrument(skip(state))]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkTicket>, ApiError> {
    let ticket = WorkTicket::get(&state.db, id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "get ticket failed");
            ApiError::Internal(e)
        })?
        .ok_or(ApiError::NotFound("Ticket"))?;
    Ok(Json(ticket))
}

#[instrument(skip(state, payload))]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkTicketRequest>,
) -> Result<(StatusCode, Json<WorkTicket>), ApiError> {
    let new_ticket = validate_create(payload)?;
    let ticket = WorkTicket::create(&state.db, &new_ticket).await.map_err(|e| {
        error!(error = %e, worker = %new_ticket.worker_name, "create ticket failed");
        ApiError::Internal(e)
    })?;
    info!(ticket_id = %ticket.id, price = ticket.price, "ticket created");
    Ok((StatusCode::CREATED, Json(ticket)))
}

#[instrument(skip(state, payload))]
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkTicketRequest>,
) -> Result<Json<WorkTicket>, ApiError> {
    let patch = validate_update(payload)?;
    let ticket = WorkTicket::update(&state.db, id, &patch)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "update ticket failed");
            ApiError::Internal(e)
        })?
        .ok_or(ApiError::NotFound("Ticket"))?;
    info!(ticket_id = %ticket.id, status = ?ticket.status, "ticket updated");
    Ok(Json(ticket))
}

#[instrument(skip(state))]
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = WorkTicket::delete(&state.db, id).await.map_err(|e| {
        error!(error = %e, %id, "delete ticket failed");
        ApiError::Internal(e)
    })?;
    if !deleted {
        return Err(ApiError::NotFound("Ticket"));
    }
    info!(ticket_id = %id, "ticket deleted");
    Ok(Json(DeleteResponse {
        message: "Ticket deleted".into(),
        id,
    }))
}
