use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::{handlers, system};

/// Receipts are photos; the axum default of 2 MB is too tight
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// All application routes
pub fn configure_routes(uploads_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route(
            "/api/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // BILLS (AUTHENTICATED)
        // ========================================
        .route(
            "/api/bills",
            get(handlers::a001_bill::list)
                .post(handlers::a001_bill::create)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/bills/:id",
            get(handlers::a001_bill::get_by_id)
                .patch(handlers::a001_bill::update)
                .delete(handlers::a001_bill::delete.layer(middleware::from_fn(
                    system::auth::middleware::require_admin,
                )))
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .nest_service("/public", ServeDir::new(uploads_dir))
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}
