use axum::Router;

pub mod statements;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/v1/statements", statements::router())
}
