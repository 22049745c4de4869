use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, StatusWorkflow};
use crate::shared::filter::Filterable;
use crate::shared::validation::{FieldError, FieldErrors};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор завода
    FactoryId
);

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FactoryStatus {
    #[default]
    Active,
    Inactive,
}

impl StatusWorkflow for FactoryStatus {
    fn all() -> &'static [Self] {
        &[FactoryStatus::Active, FactoryStatus::Inactive]
    }

    fn as_str(&self) -> &'static str {
        match self {
            FactoryStatus::Active => "active",
            FactoryStatus::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FactoryStatus::Active => "Работает",
            FactoryStatus::Inactive => "Не работает",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        *self != next
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Завод (производственная площадка)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factory {
    #[serde(flatten)]
    pub base: BaseAggregate<FactoryId>,

    pub address: String,

    #[serde(rename = "managerName")]
    pub manager_name: String,

    pub status: FactoryStatus,
}

impl Factory {
    /// Создать новый завод для вставки в БД
    pub fn new_for_insert(code: String, description: String) -> Self {
        Self {
            base: BaseAggregate::new(FactoryId::new_v4(), code, description),
            address: String::new(),
            manager_name: String::new(),
            status: FactoryStatus::Active,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &FactoryDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.address = dto.address.trim().to_string();
        self.manager_name = dto.manager_name.trim().to_string();
        self.status = dto.status;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_identity()
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }
}

impl AggregateRoot for Factory {
    type Id = FactoryId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "factory"
    }

    fn element_name() -> &'static str {
        "Завод"
    }

    fn list_name() -> &'static str {
        "Заводы"
    }

    fn code_prefix() -> &'static str {
        "FAC"
    }
}

impl Filterable for Factory {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.as_str().to_string()),
            _ => None,
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.base.description.clone(),
            self.address.clone(),
        ]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления завода
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FactoryDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub address: String,

    #[serde(rename = "managerName")]
    pub manager_name: String,

    #[serde(default)]
    pub status: FactoryStatus,
    pub comment: Option<String>,
}

impl FactoryDto {
    /// Проверка полей формы
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors.required("description", &self.description, "Наименование");
        errors.into_vec()
    }
}

impl From<&Factory> for FactoryDto {
    fn from(f: &Factory) -> Self {
        Self {
            id: Some(f.base.id.as_string()),
            code: Some(f.base.code.clone()),
            description: f.base.description.clone(),
            address: f.address.clone(),
            manager_name: f.manager_name.clone(),
            status: f.status,
            comment: f.base.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_code_and_name() {
        let mut f = Factory::new_for_insert("FAC-0001".into(), "  ".into());
        assert!(f.validate().is_err());
        f.base.description = "Завод №1".into();
        assert!(f.validate().is_ok());
        f.base.code = String::new();
        assert_eq!(f.validate(), Err("Код не может быть пустым".to_string()));
    }

    #[test]
    fn test_update_keeps_code_when_dto_has_none() {
        let mut f = Factory::new_for_insert("FAC-0001".into(), "Завод".into());
        let dto = FactoryDto {
            description: " Литейный завод ".into(),
            comment: Some("".into()),
            status: FactoryStatus::Inactive,
            ..Default::default()
        };
        f.update(&dto);
        assert_eq!(f.base.code, "FAC-0001");
        assert_eq!(f.base.description, "Литейный завод");
        assert_eq!(f.base.comment, None);
        assert_eq!(f.status, FactoryStatus::Inactive);
    }

    #[test]
    fn test_dto_field_errors() {
        let dto = FactoryDto::default();
        let errors = dto.validate_fields();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "description");
    }
}
