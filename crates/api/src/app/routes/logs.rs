use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    Json,
};

use logbook_infra::LogEntry;

use crate::app::dto::AppendLogRequest;
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;
use crate::context::AuthenticatedUser;

pub async fn append_log(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<AppendLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LogEntry>), ApiError> {
    let Json(body) = body?;
    let entry = services.append_log(user.into_username(), body.message, body.level);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// All entries in insertion order; `404` while the register is still empty.
pub async fn list_logs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    tracing::debug!(user = %user.username(), "fetching logs");
    let entries = services
        .list_logs()
        .map_err(|e| errors::service_error(e, "Error fetching logs"))?;
    Ok(Json(entries))
}
