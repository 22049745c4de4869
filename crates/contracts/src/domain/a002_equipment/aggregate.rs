use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, StatusWorkflow};
use crate::shared::filter::Filterable;
use crate::shared::validation::{FieldError, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор единицы оборудования
    EquipmentId
);

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Active,
    Inactive,
    UnderMaintenance,
    Retired,
}

impl StatusWorkflow for EquipmentStatus {
    fn all() -> &'static [Self] {
        &[
            EquipmentStatus::Active,
            EquipmentStatus::Inactive,
            EquipmentStatus::UnderMaintenance,
            EquipmentStatus::Retired,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "active",
            EquipmentStatus::Inactive => "inactive",
            EquipmentStatus::UnderMaintenance => "under_maintenance",
            EquipmentStatus::Retired => "retired",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "В работе",
            EquipmentStatus::Inactive => "Простаивает",
            EquipmentStatus::UnderMaintenance => "На обслуживании",
            EquipmentStatus::Retired => "Списано",
        }
    }

    /// Списанное оборудование обратно не возвращается
    fn can_transition_to(&self, next: Self) -> bool {
        *self != next && *self != EquipmentStatus::Retired
    }
}

/// Критичность оборудования для производства
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
}

impl Criticality {
    pub fn all() -> &'static [Criticality] {
        &[Criticality::Low, Criticality::Medium, Criticality::High]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Low => "low",
            Criticality::Medium => "medium",
            Criticality::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criticality::Low => "Низкая",
            Criticality::Medium => "Средняя",
            Criticality::High => "Высокая",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Единица оборудования, закреплённая за заводом
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(flatten)]
    pub base: BaseAggregate<EquipmentId>,

    #[serde(rename = "factoryId")]
    pub factory_id: String,

    pub category: String,
    pub manufacturer: String,
    pub model: String,

    #[serde(rename = "serialNumber")]
    pub serial_number: String,

    pub location: String,

    #[serde(rename = "installDate")]
    pub install_date: Option<NaiveDate>,

    pub criticality: Criticality,
    pub status: EquipmentStatus,
}

impl Equipment {
    /// Создать новое оборудование для вставки в БД
    pub fn new_for_insert(code: String, description: String, factory_id: String) -> Self {
        Self {
            base: BaseAggregate::new(EquipmentId::new_v4(), code, description),
            factory_id,
            category: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            serial_number: String::new(),
            location: String::new(),
            install_date: None,
            criticality: Criticality::Medium,
            status: EquipmentStatus::Active,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &EquipmentDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.factory_id = dto.factory_id.clone();
        self.category = dto.category.trim().to_string();
        self.manufacturer = dto.manufacturer.trim().to_string();
        self.model = dto.model.trim().to_string();
        self.serial_number = dto.serial_number.trim().to_string();
        self.location = dto.location.trim().to_string();
        self.install_date = dto.install_date;
        self.criticality = dto.criticality;
        self.status = dto.status;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_identity()?;
        if self.factory_id.trim().is_empty() {
            return Err("Не указан завод".into());
        }
        if let Some(date) = self.install_date {
            if date > chrono::Utc::now().date_naive() {
                return Err("Дата ввода в эксплуатацию не может быть в будущем".into());
            }
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Можно ли планировать ТО на это оборудование
    pub fn is_serviceable(&self) -> bool {
        self.status != EquipmentStatus::Retired
    }
}

impl AggregateRoot for Equipment {
    type Id = EquipmentId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "equipment"
    }

    fn element_name() -> &'static str {
        "Оборудование"
    }

    fn list_name() -> &'static str {
        "Оборудование"
    }

    fn code_prefix() -> &'static str {
        "EQ"
    }
}

impl Filterable for Equipment {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.as_str().to_string()),
            "factory_id" => Some(self.factory_id.clone()),
            "category" => Some(self.category.clone()),
            "criticality" => Some(self.criticality.as_str().to_string()),
            _ => None,
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.base.description.clone(),
            self.model.clone(),
            self.serial_number.clone(),
            self.location.clone(),
        ]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления оборудования
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EquipmentDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,

    #[serde(rename = "factoryId")]
    pub factory_id: String,

    pub category: String,
    pub manufacturer: String,
    pub model: String,

    #[serde(rename = "serialNumber")]
    pub serial_number: String,

    pub location: String,

    #[serde(rename = "installDate")]
    pub install_date: Option<NaiveDate>,

    #[serde(default)]
    pub criticality: Criticality,

    #[serde(default)]
    pub status: EquipmentStatus,

    pub comment: Option<String>,
}

impl EquipmentDto {
    /// Проверка полей формы
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .required("description", &self.description, "Наименование")
            .required_ref("factory_id", Some(self.factory_id.as_str()), "завод")
            .required("category", &self.category, "Категория");
        errors.into_vec()
    }
}

impl From<&Equipment> for EquipmentDto {
    fn from(e: &Equipment) -> Self {
        Self {
            id: Some(e.base.id.as_string()),
            code: Some(e.base.code.clone()),
            description: e.base.description.clone(),
            factory_id: e.factory_id.clone(),
            category: e.category.clone(),
            manufacturer: e.manufacturer.clone(),
            model: e.model.clone(),
            serial_number: e.serial_number.clone(),
            location: e.location.clone(),
            install_date: e.install_date,
            criticality: e.criticality,
            status: e.status,
            comment: e.base.comment.clone(),
        }
    }
}

/// Параметры фильтрации списка оборудования (query string)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentListQuery {
    pub factory_id: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump() -> Equipment {
        Equipment::new_for_insert("EQ-0001".into(), "Насос".into(), "factory-1".into())
    }

    #[test]
    fn test_validate_requires_factory() {
        let mut e = pump();
        assert!(e.validate().is_ok());
        e.factory_id = " ".into();
        assert_eq!(e.validate(), Err("Не указан завод".to_string()));
    }

    #[test]
    fn test_install_date_in_future_is_rejected() {
        let mut e = pump();
        e.install_date = Some(chrono::Utc::now().date_naive() + chrono::Duration::days(10));
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_retired_is_terminal() {
        assert!(EquipmentStatus::Active.can_transition_to(EquipmentStatus::Retired));
        assert!(!EquipmentStatus::Retired.can_transition_to(EquipmentStatus::Active));
        assert!(EquipmentStatus::Retired.next_statuses().is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            EquipmentStatus::parse("under_maintenance"),
            Some(EquipmentStatus::UnderMaintenance)
        );
        assert_eq!(EquipmentStatus::parse("broken"), None);
    }

    #[test]
    fn test_dto_field_errors() {
        let dto = EquipmentDto {
            description: "Насос".into(),
            ..Default::default()
        };
        let errors = dto.validate_fields();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["factory_id", "category"]);
    }
}
