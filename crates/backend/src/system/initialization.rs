use anyhow::Result;
use contracts::system::users::{CreateUserDto, UserRole};

use crate::shared::logger;
use crate::system::users::{repository, service};

pub const DEFAULT_ADMIN_LOGIN: &str = "admin";

/// Создать администратора `admin/admin`, если пользователей ещё нет
pub async fn ensure_admin_user_exists() -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin_id = service::create(
        CreateUserDto {
            username: DEFAULT_ADMIN_LOGIN.to_string(),
            password: DEFAULT_ADMIN_LOGIN.to_string(),
            email: None,
            full_name: Some("Администратор".to_string()),
            role: UserRole::Admin,
        },
        None,
    )
    .await?;

    tracing::warn!("═══════════════════════════════════════════════");
    tracing::warn!("  Default admin user created!");
    tracing::warn!("  Username: {}", DEFAULT_ADMIN_LOGIN);
    tracing::warn!("  Password: {}", DEFAULT_ADMIN_LOGIN);
    tracing::warn!("  User ID: {}", admin_id);
    tracing::warn!("  PLEASE CHANGE THE PASSWORD IMMEDIATELY!");
    tracing::warn!("═══════════════════════════════════════════════");

    logger::warn(
        "sys_users",
        "Создан администратор по умолчанию admin/admin, смените пароль",
    );
    Ok(())
}
