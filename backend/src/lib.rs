pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::state::AppState;

/// Every route of the admin service, with shared layers applied.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/admin/requests",
            get(handlers::admin::list_requests).post(handlers::admin::create_request),
        )
        .route(
            "/api/admin/requests/filter",
            post(handlers::admin::filter_requests),
        )
        .route(
            "/api/admin/requests/bulk-status",
            post(handlers::admin::bulk_update_status),
        )
        .route(
            "/api/admin/reports/students",
            get(handlers::admin::student_report),
        )
        .route(
            "/api/admin/reports/mess-cut",
            get(handlers::admin::mess_cut_report),
        );

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(docs::ApiDoc::openapi()) }),
        )
        .merge(admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
