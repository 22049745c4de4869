use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::api_utils::{delete, get_json, post_no_content, post_upsert, put_json};

pub async fn fetch_users() -> Result<Vec<User>, String> {
    get_json("/api/system/users").await
}

/// Активные техники и руководители для назначения на наряды
pub async fn fetch_assignees() -> Result<Vec<User>, String> {
    get_json("/api/system/users/assignees").await
}

pub async fn create_user(dto: &CreateUserDto) -> Result<String, String> {
    post_upsert("/api/system/users", dto).await
}

pub async fn update_user(dto: &UpdateUserDto) -> Result<(), String> {
    put_json(&format!("/api/system/users/{}", dto.id), dto).await
}

pub async fn delete_user(id: &str) -> Result<(), String> {
    delete(&format!("/api/system/users/{}", id)).await
}

pub async fn change_password(dto: &ChangePasswordDto) -> Result<(), String> {
    post_no_content(
        &format!("/api/system/users/{}/change-password", dto.user_id),
        dto,
    )
    .await
}
