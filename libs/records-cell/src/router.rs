use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn medical_record_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::add_medical_record))
        .route("/", get(handlers::list_medical_records))
        .route("/{record_id}", put(handlers::update_medical_record))
        .route("/{record_id}", delete(handlers::delete_medical_record))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
