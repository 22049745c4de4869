//! Ошибки валидации форм и общие правила для полей

use serde::{Deserialize, Serialize};

/// Ошибка валидации конкретного поля формы.
///
/// `field` совпадает с именем поля DTO, чтобы UI мог показать сообщение
/// прямо под соответствующим вводом.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Накопитель ошибок валидации
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Обязательное строковое поле
    pub fn required(&mut self, field: &str, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, format!("{} обязательно для заполнения", label));
        }
        self
    }

    /// Обязательная ссылка (Option<String> с непустым значением)
    pub fn required_ref(&mut self, field: &str, value: Option<&str>, label: &str) -> &mut Self {
        if value.map(|v| v.trim().is_empty()).unwrap_or(true) {
            self.push(field, format!("Не выбрано: {}", label));
        }
        self
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.0.push(FieldError::new(field, message));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Первое сообщение для поля (для вывода под полем ввода)
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// Свести ошибки в Result: первое сообщение становится текстом ошибки
    pub fn into_result(self) -> Result<(), String> {
        match self.0.into_iter().next() {
            Some(e) => Err(e.message),
            None => Ok(()),
        }
    }
}

/// Найти сообщение об ошибке для поля в списке
pub fn error_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}

/// Простейшая проверка email (пустое значение допустимо)
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() {
        return true;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let mut errors = FieldErrors::new();
        errors.required("description", "   ", "Наименование");
        assert_eq!(
            errors.message_for("description"),
            Some("Наименование обязательно для заполнения")
        );
    }

    #[test]
    fn test_required_accepts_value() {
        let mut errors = FieldErrors::new();
        errors
            .required("description", "Насос", "Наименование")
            .required_ref("factory_id", Some("abc"), "завод");
        assert!(errors.is_empty());
        assert_eq!(errors.into_result(), Ok(()));
    }

    #[test]
    fn test_required_ref_rejects_none_and_empty() {
        let mut errors = FieldErrors::new();
        errors
            .required_ref("factory_id", None, "завод")
            .required_ref("equipment_id", Some(""), "оборудование");
        let list = errors.into_vec();
        assert_eq!(list.len(), 2);
        assert_eq!(error_for(&list, "equipment_id"), Some("Не выбрано: оборудование"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email(""));
        assert!(is_valid_email("tech@plant.example"));
        assert!(!is_valid_email("tech.plant.example"));
        assert!(!is_valid_email("@plant.example"));
        assert!(!is_valid_email("tech@plant"));
    }
}
