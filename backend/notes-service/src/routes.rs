//! Route configuration
//!
//! Centralized route setup extracted from main.rs. Public pages and the
//! login flow stay unguarded; everything under /api goes through the JWT
//! gate.

use actix_web::{web, HttpResponse};

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::middleware::JwtAuthMiddleware;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Static/public pages
        .route("/", web::get().to(index_page))
        .route("/auth-success", web::get().to(auth_success_page))
        // Login flow
        .route("/auth/google", web::get().to(handlers::auth::google_login))
        .route(
            "/auth/google/callback",
            web::get().to(handlers::auth::google_callback),
        )
        // Operational endpoints
        .route("/health", web::get().to(handlers::health::liveness))
        .route("/health/ready", web::get().to(handlers::health::readiness))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/api/openapi.json", web::get().to(openapi_handler))
        .route("/docs", web::get().to(docs_handler))
        // Authenticated API
        .service(
            web::scope("/api")
                .wrap(JwtAuthMiddleware)
                .route("/posts", web::get().to(handlers::posts::list_posts))
                .route("/posts", web::post().to(handlers::posts::create_post))
                .route("/posts/{id}", web::put().to(handlers::posts::update_post))
                .route("/posts/{id}", web::delete().to(handlers::posts::delete_post)),
        );
}

async fn index_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../static/index.html"))
}

async fn auth_success_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../static/auth-success.html"))
}

/// OpenAPI JSON endpoint
async fn openapi_handler() -> HttpResponse {
    use utoipa::OpenApi;
    HttpResponse::Ok()
        .content_type("application/json")
        .json(crate::openapi::ApiDoc::openapi())
}

/// API documentation entry point
async fn docs_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../static/docs.html"))
}
