use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState, tickets::repo::WorkTicket};

use super::dto::{DashboardSummary, DateSummary, Statistics, StatisticsQuery};
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/dashboard", get(dashboard))
        .route("/reports/statistics", get(statistics))
        .route("/reports/daily", get(daily))
}

async fn load_tickets(state: &AppState) -> Result<Vec<WorkTicket>, ApiError> {
    WorkTicket::list(&state.db).await.map_err(|e| {
        error!(error = %e, "load tickets for report failed");
        ApiError::Internal(e)
    })
}

#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let tickets = load_tickets(&state).await?;
    Ok(Json(services::dashboard_summary(
        &tickets,
        OffsetDateTime::now_utc(),
    )))
}

#[instrument(skip(state))]
pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<Statistics>, ApiError> {
    let tickets = load_tickets(&state).await?;
    Ok(Json(services::statistics(
        &tickets,
        query.period,
        OffsetDateTime::now_utc(),
    )))
}

#[instrument(skip(state))]
pub async fn daily(State(state): State<AppState>) -> Result<Json<Vec<DateSummary>>, ApiError> {
    let tickets = load_tickets(&state).await?;
    Ok(Json(services::date_summaries(&tickets)))
}
