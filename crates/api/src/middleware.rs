use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use logbook_auth::TokenVerifier;

use crate::context::AuthenticatedUser;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Auth gate for protected routes.
///
/// - no bearer token → `401`, the handler never runs
/// - a token that does not verify → `403`
/// - otherwise the request continues with an [`AuthenticatedUser`] extension
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = extract_bearer(req.headers()) else {
        tracing::debug!(path = %req.uri().path(), "no token provided");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = state.tokens.verify(token, Utc::now()).map_err(|_e| {
        tracing::debug!(path = %req.uri().path(), "invalid token");
        StatusCode::FORBIDDEN
    })?;

    req.extensions_mut()
        .insert(AuthenticatedUser::new(claims.username));

    Ok(next.run(req).await)
}

/// The token from `Authorization: Bearer <token>`, if there is one.
///
/// The token is the second space-separated part of the header; the scheme
/// word is not inspected, so `Basic xyz` presents `xyz` for verification.
/// An empty second part (`Bearer`, `Bearer  abc`) means no token.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;

    header.split(' ').nth(1).filter(|token| !token.is_empty())
}
