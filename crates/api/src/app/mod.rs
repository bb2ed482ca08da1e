//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores, hasher and token issuer behind one `AppServices`
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::cors::CorsLayer;

use logbook_auth::TokenVerifier;
use logbook_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the router around already-wired services.
pub fn build_app(services: Arc<AppServices>, tokens: Arc<dyn TokenVerifier>) -> Router {
    let auth_state = middleware::AuthState { tokens };

    // Protected routes: the auth gate runs before any handler.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(CorsLayer::permissive())
}

/// Build the full HTTP router from configuration (public entrypoint used by `main.rs`).
pub async fn build_app_from_config(config: &AppConfig) -> anyhow::Result<Router> {
    let wiring = services::build_services(config).await?;
    Ok(build_app(Arc::new(wiring.services), wiring.verifier))
}
