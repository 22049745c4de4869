use crate::shared::filter::Filterable;
use crate::shared::validation::{is_valid_email, FieldError, FieldErrors};
use serde::{Deserialize, Serialize};

/// Роль пользователя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Technician,
    #[default]
    Viewer,
}

impl UserRole {
    pub fn all() -> &'static [UserRole] {
        &[
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Technician,
            UserRole::Viewer,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Technician => "technician",
            UserRole::Viewer => "viewer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Администратор",
            UserRole::Manager => "Руководитель",
            UserRole::Technician => "Техник",
            UserRole::Viewer => "Наблюдатель",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.as_str() == s)
    }

    pub fn is_admin(&self) -> bool {
        *self == UserRole::Admin
    }

    /// Может изменять бизнес-данные (наблюдатель — только чтение)
    pub fn can_edit(&self) -> bool {
        *self != UserRole::Viewer
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

impl User {
    /// Имя для отображения: ФИО, если задано, иначе логин
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

impl Filterable for User {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "role" => Some(self.role.as_str().to_string()),
            "is_active" => Some(self.is_active.to_string()),
            _ => None,
        }
    }

    fn search_text(&self) -> Vec<String> {
        let mut texts = vec![self.username.clone()];
        texts.extend(self.full_name.clone());
        texts.extend(self.email.clone());
        texts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl CreateUserDto {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors.required("username", &self.username, "Логин");
        if let Err(msg) = validate_password(&self.password) {
            errors.push("password", msg);
        }
        if !is_valid_email(self.email.as_deref().unwrap_or("")) {
            errors.push("email", "Некорректный email");
        }
        errors.into_vec()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // None если администратор меняет чужой пароль
    pub new_password: String,
}

/// Минимальные требования к паролю
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 4 {
        return Err("Пароль должен содержать не менее 4 символов".into());
    }
    if password.trim() != password {
        return Err("Пароль не должен начинаться или заканчиваться пробелом".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Technician.can_edit());
        assert!(!UserRole::Viewer.can_edit());
        assert!(!UserRole::Manager.is_admin());
    }

    #[test]
    fn test_role_roundtrip_str() {
        for role in UserRole::all() {
            assert_eq!(UserRole::parse(role.as_str()), Some(*role));
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("admin").is_ok());
        assert!(validate_password("abc").is_err());
        assert!(validate_password(" abcd").is_err());
    }

    #[test]
    fn test_create_user_field_errors() {
        let dto = CreateUserDto {
            username: "".into(),
            password: "12".into(),
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let fields: Vec<String> = dto.validate_fields().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "password", "email"]);
    }

    #[test]
    fn test_user_filter_by_role_and_search() {
        use crate::shared::filter::FilterSet;

        let user = User {
            id: "u1".into(),
            username: "ivanov".into(),
            email: None,
            full_name: Some("Иванов Пётр".into()),
            role: UserRole::Technician,
            is_active: true,
            is_admin: false,
            created_at: String::new(),
            updated_at: String::new(),
            last_login_at: None,
            created_by: None,
        };
        let mut filters = FilterSet::new();
        filters.set("role", "technician", "Роль: Техник");
        filters.set_search("пётр");
        assert!(filters.matches(&user));
        filters.set("role", "admin", "Роль: Администратор");
        assert!(!filters.matches(&user));
    }
}
