use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod memory;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
