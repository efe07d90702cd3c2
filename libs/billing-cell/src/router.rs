use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn payment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::add_payment))
        .route("/", get(handlers::list_payments))
        .route("/{payment_id}", put(handlers::update_payment))
        .route("/{payment_id}", delete(handlers::delete_payment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
