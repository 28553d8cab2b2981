mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;
mod views;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::page_routes())
        .merge(handlers::api_routes())
}
