use axum::Router;

use crate::state::AppState;

mod dto;
pub mod guard;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod session;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::employee_routes())
}
