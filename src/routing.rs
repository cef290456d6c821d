//! Application router configuration.

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState, endpoints, error::global_error_handler, logging::logging_middleware,
    not_found::get_404_not_found, transaction::create_transaction_endpoint,
};

/// The greeting served from the root route.
pub const GREETING: &str = "Hello from the transaction ledger API!";

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.environment,
            global_error_handler,
        ))
        .layer(cors_layer())
        .with_state(state)
}

/// Allow requests from any origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// The root path '/' responds with a static greeting.
async fn get_index_page() -> &'static str {
    GREETING
}
