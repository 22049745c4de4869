//! Типизированные ошибки сервисов и их отображение в HTTP-ответы

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Ошибка бизнес-логики, которую сервис прикрепляет к `anyhow::Error`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn validation(msg: impl Into<String>) -> anyhow::Error {
        ServiceError::Validation(msg.into()).into()
    }

    pub fn not_found(msg: impl Into<String>) -> anyhow::Error {
        ServiceError::NotFound(msg.into()).into()
    }

    pub fn conflict(msg: impl Into<String>) -> anyhow::Error {
        ServiceError::Conflict(msg.into()).into()
    }

    pub fn forbidden(msg: impl Into<String>) -> anyhow::Error {
        ServiceError::Forbidden(msg.into()).into()
    }
}

/// Ошибка обработчика: любая `anyhow::Error`, ответ строится по `ServiceError` в цепочке
#[derive(Debug)]
pub struct ApiError(pub anyhow::Error);

impl ApiError {
    /// HTTP-статус и текст для клиента
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self.0.downcast_ref::<ServiceError>() {
            Some(err) => (err.status(), err.to_string()),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Внутренняя ошибка сервера".to_string(),
            ),
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:#}", self.0);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Разбор идентификатора из пути или DTO
pub fn parse_id(id: &str) -> anyhow::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(id.trim())
        .map_err(|_| ServiceError::validation(format!("Некорректный идентификатор: {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_parse_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        let (status, _) = ApiError(parse_id("42").unwrap_err()).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_service_error_status_mapping() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("none"), StatusCode::NOT_FOUND),
            (ServiceError::conflict("state"), StatusCode::CONFLICT),
            (ServiceError::forbidden("role"), StatusCode::FORBIDDEN),
        ];
        for (err, expected) in cases {
            let (status, _) = ApiError(err).status_and_message();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_message_is_passed_through() {
        let (status, message) =
            ApiError(ServiceError::validation("Код не может быть пустым")).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Код не может быть пустым");
    }

    #[test]
    fn test_untyped_error_is_internal() {
        let (status, message) = ApiError(anyhow::anyhow!("disk I/O error")).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("disk"));
    }

    #[test]
    fn test_context_keeps_root_service_error() {
        let err: anyhow::Result<()> = Err(ServiceError::not_found("Завод не найден"));
        let err = err.context("loading factory").unwrap_err();
        let (status, message) = ApiError(err).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Завод не найден");
    }
}
