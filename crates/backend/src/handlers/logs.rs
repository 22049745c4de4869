use axum::{http::StatusCode, Json};
use contracts::shared::logger::{CreateLogRequest, LogEntry, LogLevel};

use crate::shared::error::{ApiResult, ServiceError};
use crate::shared::logger;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/logs
pub async fn list_all() -> ApiResult<Json<Vec<LogEntry>>> {
    Ok(Json(logger::repository::get_all_logs().await?))
}

/// POST /api/logs
pub async fn create(Json(req): Json<CreateLogRequest>) -> ApiResult<StatusCode> {
    if req.message.trim().is_empty() {
        return Err(ServiceError::validation("Пустое сообщение").into());
    }
    logger::repository::log_event(
        LogLevel::parse(&req.level),
        &req.source,
        &req.category,
        &req.message,
    )
    .await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/logs
pub async fn clear_all(user: CurrentUser) -> ApiResult<StatusCode> {
    logger::repository::clear_all_logs().await?;
    tracing::info!("System log cleared by {}", user.username());
    Ok(StatusCode::OK)
}
