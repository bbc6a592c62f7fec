use crate::state::AppState;
use axum::Router;

pub mod claims;
pub(crate) mod extractors;
pub mod handlers;
pub mod keys;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
