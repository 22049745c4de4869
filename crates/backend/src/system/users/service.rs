use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{
    ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserRole,
};
use contracts::shared::validation::is_valid_email;

use super::repository;
use crate::shared::error::ServiceError;
use crate::system::auth::password;

/// Create a new user
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> Result<String> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(ServiceError::validation("Логин не может быть пустым"));
    }

    if repository::get_by_username(&username).await?.is_some() {
        return Err(ServiceError::conflict(format!(
            "Пользователь «{}» уже существует",
            username
        )));
    }

    if !is_valid_email(dto.email.as_deref().unwrap_or("")) {
        return Err(ServiceError::validation("Некорректный email"));
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        email: dto.email.filter(|e| !e.trim().is_empty()),
        full_name: dto.full_name,
        role: dto.role,
        is_active: true,
        is_admin: dto.role.is_admin(),
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;

    Ok(user_id)
}

/// Update user
pub async fn update(dto: UpdateUserDto) -> Result<()> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь не найден"))?;

    if !is_valid_email(dto.email.as_deref().unwrap_or("")) {
        return Err(ServiceError::validation("Некорректный email"));
    }

    // Нельзя разжаловать или отключить последнего администратора
    let loses_admin = user.role.is_admin() && (!dto.role.is_admin() || !dto.is_active);
    if loses_admin && user.is_active && repository::count_active_admins().await? <= 1 {
        return Err(ServiceError::conflict(
            "Нельзя лишить прав последнего администратора",
        ));
    }

    user.email = dto.email.filter(|e| !e.trim().is_empty());
    user.full_name = dto.full_name;
    user.is_active = dto.is_active;
    user.role = dto.role;
    user.is_admin = dto.role.is_admin();
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;

    Ok(())
}

/// Delete user
pub async fn delete(id: &str, requester_id: &str) -> Result<bool> {
    if id == requester_id {
        return Err(ServiceError::conflict("Нельзя удалить самого себя"));
    }
    repository::delete(id).await
}

/// Get user by ID
pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// List all users
pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Активные пользователи, которым можно назначать работы
pub async fn list_assignees() -> Result<Vec<User>> {
    let users = repository::list_all().await?;
    Ok(users
        .into_iter()
        .filter(|u| u.is_active && matches!(u.role, UserRole::Technician | UserRole::Manager))
        .collect())
}

/// Change user password
pub async fn change_password(dto: ChangePasswordDto, requester_id: &str) -> Result<()> {
    repository::get_by_id(&dto.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь не найден"))?;

    let requester = repository::get_by_id(requester_id)
        .await?
        .ok_or_else(|| ServiceError::forbidden("Пользователь не найден"))?;

    if dto.user_id != requester_id {
        // Чужой пароль меняет только администратор, без старого пароля
        if !requester.role.is_admin() {
            return Err(ServiceError::forbidden("Недостаточно прав"));
        }
    } else {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ServiceError::validation("Укажите текущий пароль"))?;
        let current_hash = repository::get_password_hash(&dto.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

        if !password::verify_password(old_password, &current_hash)? {
            return Err(ServiceError::validation("Неверный текущий пароль"));
        }
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(&dto.user_id, &new_hash).await?;

    Ok(())
}

/// Verify user credentials (for login)
pub async fn verify_credentials(username: &str, password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username.trim()).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        return Err(ServiceError::forbidden("Учётная запись отключена"));
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    Ok(Some(user))
}
