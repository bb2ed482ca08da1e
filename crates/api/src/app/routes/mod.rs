use axum::{Router, routing::post};

pub mod accounts;
pub mod logs;
pub mod products;
pub mod system;

/// Routes open to anyone.
pub fn public_router() -> Router {
    Router::new()
        .route("/api/register", post(accounts::register))
        .route("/api/login", post(accounts::login))
        .route("/api/forgot-password", post(accounts::forgot_password))
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
}

/// Routes that require a verified bearer token.
pub fn protected_router() -> Router {
    Router::new().route("/api/logs", post(logs::append_log).get(logs::list_logs))
}
