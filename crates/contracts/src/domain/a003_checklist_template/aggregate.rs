use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, StatusWorkflow};
use crate::shared::filter::Filterable;
use crate::shared::validation::{FieldError, FieldErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор шаблона чек-листа
    ChecklistTemplateId
);

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl StatusWorkflow for TemplateStatus {
    fn all() -> &'static [Self] {
        &[TemplateStatus::Draft, TemplateStatus::Active, TemplateStatus::Inactive]
    }

    fn as_str(&self) -> &'static str {
        match self {
            TemplateStatus::Draft => "draft",
            TemplateStatus::Active => "active",
            TemplateStatus::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TemplateStatus::Draft => "Черновик",
            TemplateStatus::Active => "Действует",
            TemplateStatus::Inactive => "Не действует",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (TemplateStatus::Draft, TemplateStatus::Active)
                | (TemplateStatus::Draft, TemplateStatus::Inactive)
                | (TemplateStatus::Active, TemplateStatus::Inactive)
                | (TemplateStatus::Inactive, TemplateStatus::Active)
        )
    }
}

// ============================================================================
// Items
// ============================================================================

/// Тип пункта чек-листа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChecklistItemKind {
    /// Да/нет (норма/не норма)
    #[default]
    Check,
    /// Замер с допустимым диапазоном
    Measurement {
        unit: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Свободный текст
    Text,
}

impl ChecklistItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChecklistItemKind::Check => "Проверка",
            ChecklistItemKind::Measurement { .. } => "Замер",
            ChecklistItemKind::Text => "Текст",
        }
    }

    /// Попадает ли замер в допустимый диапазон (для остальных типов — всегда да)
    pub fn is_within_range(&self, value: f64) -> bool {
        match self {
            ChecklistItemKind::Measurement { min, max, .. } => {
                min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
            }
            _ => true,
        }
    }
}

/// Пункт чек-листа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub position: u32,
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub kind: ChecklistItemKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ChecklistItem {
    pub fn new(title: &str, kind: ChecklistItemKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            position: 0,
            title: title.to_string(),
            instructions: String::new(),
            kind,
            required: true,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Шаблон чек-листа: версионируемый список пунктов осмотра
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    #[serde(flatten)]
    pub base: BaseAggregate<ChecklistTemplateId>,

    /// Категория оборудования; пустая строка — для любого оборудования
    #[serde(rename = "equipmentCategory")]
    pub equipment_category: String,

    pub version: i32,
    pub status: TemplateStatus,
    pub items: Vec<ChecklistItem>,
}

impl ChecklistTemplate {
    /// Создать новый шаблон для вставки в БД
    pub fn new_for_insert(code: String, description: String) -> Self {
        Self {
            base: BaseAggregate::new(ChecklistTemplateId::new_v4(), code, description),
            equipment_category: String::new(),
            version: 1,
            status: TemplateStatus::Draft,
            items: Vec::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO (статус меняется только через переход статуса)
    pub fn update(&mut self, dto: &ChecklistTemplateDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.equipment_category = dto.equipment_category.trim().to_string();
        self.items = dto.items.clone();
        self.normalize_items();
    }

    /// Присвоить пунктам id (если нет) и перенумеровать позиции 1..=n
    pub fn normalize_items(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            if item.id.trim().is_empty() {
                item.id = Uuid::new_v4().to_string();
            }
            item.position = idx as u32 + 1;
            item.title = item.title.trim().to_string();
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_identity()?;
        if self.version < 1 {
            return Err("Версия шаблона должна быть не меньше 1".into());
        }
        if self.items.is_empty() {
            return Err("Шаблон должен содержать хотя бы один пункт".into());
        }
        for item in &self.items {
            if item.title.trim().is_empty() {
                return Err(format!("Пункт №{}: не заполнено название", item.position));
            }
            if let ChecklistItemKind::Measurement { min: Some(min), max: Some(max), .. } = &item.kind {
                if min > max {
                    return Err(format!(
                        "Пункт «{}»: минимум больше максимума",
                        item.title
                    ));
                }
            }
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.normalize_items();
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Изменение пунктов действующего шаблона порождает новую версию
    pub fn requires_new_version(&self, dto: &ChecklistTemplateDto) -> bool {
        self.status == TemplateStatus::Active && self.items != dto.items
    }

    /// Номер следующей версии по всем версиям того же кода.
    ///
    /// Новую версию можно получить только из последней.
    pub fn next_version(&self, versions: &[ChecklistTemplate]) -> Result<i32, String> {
        let latest = versions
            .iter()
            .filter(|t| t.base.code == self.base.code)
            .map(|t| t.version)
            .max()
            .unwrap_or(self.version)
            .max(self.version);
        if latest > self.version {
            return Err(format!("Уже есть более новая версия {}", latest));
        }
        Ok(latest + 1)
    }

    /// Новая версия шаблона: тот же код, статус «Черновик»
    pub fn new_version(&self, versions: &[ChecklistTemplate]) -> Result<Self, String> {
        let version = self.next_version(versions)?;
        let mut next = Self::new_for_insert(self.base.code.clone(), self.base.description.clone());
        next.base.comment = self.base.comment.clone();
        next.equipment_category = self.equipment_category.clone();
        next.version = version;
        next.items = self
            .items
            .iter()
            .map(|i| ChecklistItem {
                id: Uuid::new_v4().to_string(),
                ..i.clone()
            })
            .collect();
        Ok(next)
    }

    /// Пункт по id
    pub fn item(&self, id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Подходит ли шаблон для категории оборудования
    pub fn applies_to(&self, category: &str) -> bool {
        self.equipment_category.is_empty()
            || self.equipment_category.eq_ignore_ascii_case(category.trim())
    }

    /// Заголовок для выпадающих списков: «Осмотр насоса (v2)»
    pub fn display_name(&self) -> String {
        format!("{} (v{})", self.base.description, self.version)
    }
}

impl AggregateRoot for ChecklistTemplate {
    type Id = ChecklistTemplateId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "checklist_template"
    }

    fn element_name() -> &'static str {
        "Шаблон чек-листа"
    }

    fn list_name() -> &'static str {
        "Шаблоны чек-листов"
    }

    fn code_prefix() -> &'static str {
        "CL"
    }
}

impl Filterable for ChecklistTemplate {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.as_str().to_string()),
            "equipment_category" => Some(self.equipment_category.clone()),
            _ => None,
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.base.code.clone(), self.base.description.clone()]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления шаблона
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChecklistTemplateDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,

    #[serde(rename = "equipmentCategory")]
    pub equipment_category: String,

    pub items: Vec<ChecklistItem>,
    pub comment: Option<String>,
}

impl ChecklistTemplateDto {
    /// Проверка полей формы
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors.required("description", &self.description, "Наименование");
        if self.items.is_empty() {
            errors.push("items", "Добавьте хотя бы один пункт");
        } else if self.items.iter().any(|i| i.title.trim().is_empty()) {
            errors.push("items", "У всех пунктов должно быть название");
        }
        errors.into_vec()
    }
}

impl From<&ChecklistTemplate> for ChecklistTemplateDto {
    fn from(t: &ChecklistTemplate) -> Self {
        Self {
            id: Some(t.base.id.as_string()),
            code: Some(t.base.code.clone()),
            description: t.base.description.clone(),
            equipment_category: t.equipment_category.clone(),
            items: t.items.clone(),
            comment: t.base.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> ChecklistTemplate {
        let mut t = ChecklistTemplate::new_for_insert("CL-0001".into(), "Осмотр насоса".into());
        t.items = vec![
            ChecklistItem::new("Утечки отсутствуют", ChecklistItemKind::Check),
            ChecklistItem::new(
                "Давление на выходе",
                ChecklistItemKind::Measurement {
                    unit: "бар".into(),
                    min: Some(2.0),
                    max: Some(4.5),
                },
            ),
        ];
        t.normalize_items();
        t
    }

    #[test]
    fn test_normalize_renumbers_positions() {
        let t = template();
        let positions: Vec<u32> = t.items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_validate_requires_items() {
        let mut t = template();
        assert!(t.validate().is_ok());
        t.items.clear();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_validate_measurement_range() {
        let mut t = template();
        t.items[1].kind = ChecklistItemKind::Measurement {
            unit: "бар".into(),
            min: Some(5.0),
            max: Some(1.0),
        };
        assert!(t.validate().unwrap_err().contains("минимум больше максимума"));
    }

    #[test]
    fn test_measurement_range_check() {
        let t = template();
        let kind = &t.items[1].kind;
        assert!(kind.is_within_range(3.0));
        assert!(kind.is_within_range(2.0));
        assert!(!kind.is_within_range(4.6));
        assert!(ChecklistItemKind::Check.is_within_range(100.0));
    }

    #[test]
    fn test_new_version() {
        let mut t = template();
        t.status = TemplateStatus::Active;
        let next = t.new_version(std::slice::from_ref(&t)).unwrap();
        assert_eq!(next.version, 2);
        assert_eq!(next.status, TemplateStatus::Draft);
        assert_eq!(next.base.code, t.base.code);
        assert_ne!(next.base.id, t.base.id);
        assert_eq!(next.items.len(), 2);
        assert_ne!(next.items[0].id, t.items[0].id);
    }

    #[test]
    fn test_new_version_only_from_latest() {
        let mut v1 = template();
        v1.status = TemplateStatus::Inactive;
        let mut v2 = v1.new_version(std::slice::from_ref(&v1)).unwrap();
        v2.status = TemplateStatus::Active;
        let versions = vec![v1.clone(), v2.clone()];

        let err = v1.new_version(&versions).unwrap_err();
        assert!(err.contains("более новая версия 2"));
        assert_eq!(v2.next_version(&versions), Ok(3));
        assert_eq!(v2.new_version(&versions).unwrap().version, 3);
    }

    #[test]
    fn test_requires_new_version_only_for_active_item_changes() {
        let mut t = template();
        let mut dto = ChecklistTemplateDto::from(&t);
        dto.items.pop();
        assert!(!t.requires_new_version(&dto));
        t.status = TemplateStatus::Active;
        assert!(t.requires_new_version(&dto));
        let same = ChecklistTemplateDto::from(&t);
        assert!(!t.requires_new_version(&same));
    }

    #[test]
    fn test_status_transitions() {
        assert!(TemplateStatus::Draft.can_transition_to(TemplateStatus::Active));
        assert!(!TemplateStatus::Active.can_transition_to(TemplateStatus::Draft));
        assert!(TemplateStatus::Inactive.can_transition_to(TemplateStatus::Active));
    }

    #[test]
    fn test_item_kind_json_is_tagged() {
        let json = serde_json::to_value(&template().items[1].kind).unwrap();
        assert_eq!(json["type"], "measurement");
        assert_eq!(json["unit"], "бар");

        let item: ChecklistItem =
            serde_json::from_str(r#"{"id":"x","position":1,"title":"Шум"}"#).unwrap();
        assert_eq!(item.kind, ChecklistItemKind::Check);
        assert!(item.required);
    }

    #[test]
    fn test_applies_to_category() {
        let mut t = template();
        assert!(t.applies_to("Насос"));
        t.equipment_category = "Насос".into();
        assert!(t.applies_to("Насос"));
        assert!(!t.applies_to("Вентилятор"));
    }
}
