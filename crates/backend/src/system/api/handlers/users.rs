use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::error::{ApiResult, ServiceError};
use crate::shared::logger;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// List all users (admin only)
pub async fn list(_user: CurrentUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(service::list_all().await?))
}

/// Исполнители для назначения на заказ-наряды (любой вошедший пользователь)
pub async fn assignees(_user: CurrentUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(service::list_assignees().await?))
}

/// Get user by ID (admin only)
pub async fn get_by_id(_user: CurrentUser, Path(id): Path<String>) -> ApiResult<Json<User>> {
    let user = service::get_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь не найден"))?;
    Ok(Json(user))
}

/// Create user (admin only)
pub async fn create(
    user: CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> ApiResult<Json<serde_json::Value>> {
    let username = dto.username.clone();
    let role = dto.role;
    let user_id = service::create(dto, Some(user.user_id().to_string())).await?;

    logger::log(
        "sys_users",
        &format!(
            "Создан пользователь {} ({}), автор: {}",
            username.trim(),
            role.label(),
            user.username()
        ),
    );
    Ok(Json(serde_json::json!({ "id": user_id })))
}

/// Update user (admin only)
pub async fn update(
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> ApiResult<StatusCode> {
    dto.id = id;
    service::update(dto).await?;
    Ok(StatusCode::OK)
}

/// Delete user (admin only)
pub async fn delete(user: CurrentUser, Path(id): Path<String>) -> ApiResult<StatusCode> {
    if service::delete(&id, user.user_id()).await? {
        logger::log(
            "sys_users",
            &format!("Удалён пользователь {}, автор: {}", id, user.username()),
        );
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Пользователь не найден").into())
    }
}

/// Change password
pub async fn change_password(
    user: CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> ApiResult<StatusCode> {
    dto.user_id = id;
    service::change_password(dto, user.user_id()).await?;
    Ok(StatusCode::OK)
}
