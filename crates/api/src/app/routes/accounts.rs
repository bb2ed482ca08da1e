use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    Json,
};

use logbook_core::Username;

use crate::app::dto::{CredentialsRequest, ForgotPasswordRequest, MessageResponse, TokenResponse};
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) = body?;
    let username = Username::parse(&body.username)?;

    services
        .register(username, body.password)
        .await
        .map_err(|e| errors::service_error(e, "Error registering user"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = body?;
    // A name that cannot exist is reported like any other unknown user.
    let username = Username::parse(&body.username)
        .map_err(|_| ApiError::BadRequest("User not found".to_string()))?;

    let token = services
        .login(&username, body.password)
        .await
        .map_err(|e| errors::service_error(e, "Error logging in"))?;

    Ok(Json(TokenResponse { token }))
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;
    let username = Username::parse(&body.username)
        .map_err(|_| ApiError::BadRequest("User not found".to_string()))?;

    services
        .reset_password(&username, body.new_password)
        .await
        .map_err(|e| errors::service_error(e, "Error resetting password"))?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
