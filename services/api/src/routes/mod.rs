//! API service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

pub mod admin;
pub mod public;

/// Create the router for the API service
///
/// Every route under `/api/admin` passes the auth gate before any handler
/// logic runs, except the login entry point and the session endpoints
/// (verify/logout), which implement their own cookie handling.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/admin/cars",
            get(admin::list_cars).post(admin::create_car),
        )
        .route(
            "/api/admin/cars/:id",
            get(admin::get_car)
                .put(admin::update_car)
                .delete(admin::delete_car),
        )
        .route("/api/admin/submissions", get(admin::list_submissions))
        .route(
            "/api/admin/submissions/:id",
            put(admin::update_submission_status).delete(admin::delete_submission),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/verify", get(admin::verify_session))
        .route("/api/admin/logout", post(admin::logout))
        .route("/api/cars", get(public::list_cars))
        .route(
            "/api/contact",
            // Bounded to keep photo uploads reasonable
            post(public::submit_contact).layer(DefaultBodyLimit::max(25 * 1024 * 1024)),
        )
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "dealer-api"
    }))
}
