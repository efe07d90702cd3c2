use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/{appointment_id}/status", put(handlers::update_appointment_status))
        .route("/{appointment_id}", delete(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::add_availability))
        .route("/", get(handlers::list_availability))
        .route("/{availability_id}", put(handlers::update_availability))
        .route("/{availability_id}", delete(handlers::cancel_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
