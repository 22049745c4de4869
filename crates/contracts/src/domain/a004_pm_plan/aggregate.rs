use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, StatusWorkflow};
use crate::shared::filter::Filterable;
use crate::shared::validation::{FieldError, FieldErrors};
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор плана ТО
    PmPlanId
);

// ============================================================================
// Frequency
// ============================================================================

/// Периодичность плана ТО
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Once,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Frequency {
    pub fn all() -> &'static [Frequency] {
        &[
            Frequency::Once,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::SemiAnnual,
            Frequency::Annual,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::SemiAnnual => "semi_annual",
            Frequency::Annual => "annual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Once => "Однократно",
            Frequency::Weekly => "Еженедельно",
            Frequency::Monthly => "Ежемесячно",
            Frequency::Quarterly => "Ежеквартально",
            Frequency::SemiAnnual => "Раз в полгода",
            Frequency::Annual => "Ежегодно",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.as_str() == s)
    }

    pub fn is_recurring(&self) -> bool {
        *self != Frequency::Once
    }

    /// Следующая плановая дата.
    ///
    /// Месячные периоды прибавляются календарно: 31 января + месяц = 29 февраля
    /// (в високосный год). Для `Once` возвращает `None`.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Once => None,
            Frequency::Weekly => from.checked_add_signed(Duration::weeks(1)),
            Frequency::Monthly => from.checked_add_months(Months::new(1)),
            Frequency::Quarterly => from.checked_add_months(Months::new(3)),
            Frequency::SemiAnnual => from.checked_add_months(Months::new(6)),
            Frequency::Annual => from.checked_add_months(Months::new(12)),
        }
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl StatusWorkflow for PlanStatus {
    fn all() -> &'static [Self] {
        &[PlanStatus::Draft, PlanStatus::Active, PlanStatus::Inactive]
    }

    fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Active => "active",
            PlanStatus::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "Черновик",
            PlanStatus::Active => "Действует",
            PlanStatus::Inactive => "Приостановлен",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Draft, PlanStatus::Active)
                | (PlanStatus::Draft, PlanStatus::Inactive)
                | (PlanStatus::Active, PlanStatus::Inactive)
                | (PlanStatus::Inactive, PlanStatus::Active)
        )
    }
}

// ============================================================================
// Items
// ============================================================================

/// Строка плана: оборудование + чек-лист + плановая дата
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PmPlanItem {
    #[serde(rename = "equipmentId")]
    pub equipment_id: String,

    #[serde(rename = "checklistTemplateId")]
    pub checklist_template_id: Option<String>,

    #[serde(rename = "plannedDate")]
    pub planned_date: Option<NaiveDate>,
}

impl PmPlanItem {
    pub fn new(equipment_id: &str) -> Self {
        Self {
            equipment_id: equipment_id.to_string(),
            checklist_template_id: None,
            planned_date: None,
        }
    }

    pub fn has_checklist(&self) -> bool {
        self.checklist_template_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.has_checklist() && self.planned_date.is_some()
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// План планово-предупредительного ТО
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmPlan {
    #[serde(flatten)]
    pub base: BaseAggregate<PmPlanId>,

    #[serde(rename = "factoryId")]
    pub factory_id: String,

    pub frequency: Frequency,

    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,

    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,

    #[serde(rename = "defaultChecklistId")]
    pub default_checklist_id: Option<String>,

    #[serde(rename = "defaultPlannedDate")]
    pub default_planned_date: Option<NaiveDate>,

    pub status: PlanStatus,
    pub items: Vec<PmPlanItem>,
}

impl PmPlan {
    /// Создать новый план для вставки в БД
    pub fn new_for_insert(
        code: String,
        description: String,
        factory_id: String,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            base: BaseAggregate::new(PmPlanId::new_v4(), code, description),
            factory_id,
            frequency: Frequency::Monthly,
            start_date,
            end_date: None,
            default_checklist_id: None,
            default_planned_date: None,
            status: PlanStatus::Draft,
            items: Vec::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO (статус меняется отдельной операцией)
    pub fn update(&mut self, dto: &PmPlanDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.factory_id = dto.factory_id.clone();
        self.frequency = dto.frequency;
        if let Some(start) = dto.start_date {
            self.start_date = start;
        }
        self.end_date = dto.end_date;
        self.default_checklist_id = dto.default_checklist_id.clone().filter(|s| !s.is_empty());
        self.default_planned_date = dto.default_planned_date;
        self.items = dto.items.clone();
    }

    /// Валидация данных (допустима для черновика)
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_identity()?;
        if self.factory_id.trim().is_empty() {
            return Err("Не указан завод".into());
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err("Дата окончания раньше даты начала".into());
            }
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.equipment_id.trim().is_empty() {
                return Err("В строке плана не указано оборудование".into());
            }
            if !seen.insert(item.equipment_id.as_str()) {
                return Err("Оборудование в плане повторяется".into());
            }
        }
        Ok(())
    }

    /// Проверка перед переводом в статус «Действует»
    pub fn validate_for_activation(&self) -> Result<(), String> {
        self.validate()?;
        if self.items.is_empty() {
            return Err("В плане нет оборудования".into());
        }
        let missing_checklist = self.items.iter().filter(|i| !i.has_checklist()).count();
        if missing_checklist > 0 {
            return Err(format!("Не указан чек-лист в строках: {}", missing_checklist));
        }
        let missing_date = self.items.iter().filter(|i| i.planned_date.is_none()).count();
        if missing_date > 0 {
            return Err(format!("Не указана плановая дата в строках: {}", missing_date));
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Дата в пределах действия плана
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    /// Следующая дата обслуживания после `last` с учётом окончания плана
    pub fn next_occurrence(&self, last: NaiveDate) -> Option<NaiveDate> {
        self.frequency.next_date(last).filter(|d| self.covers(*d))
    }
}

impl AggregateRoot for PmPlan {
    type Id = PmPlanId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "pm_plan"
    }

    fn element_name() -> &'static str {
        "План ТО"
    }

    fn list_name() -> &'static str {
        "Планы ТО"
    }

    fn code_prefix() -> &'static str {
        "PM"
    }
}

impl Filterable for PmPlan {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.as_str().to_string()),
            "factory_id" => Some(self.factory_id.clone()),
            "frequency" => Some(self.frequency.as_str().to_string()),
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

/// DTO для создания/обновления плана ТО
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PmPlanDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,

    #[serde(rename = "factoryId")]
    pub factory_id: String,

    #[serde(default)]
    pub frequency: Frequency,

    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,

    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,

    #[serde(rename = "defaultChecklistId")]
    pub default_checklist_id: Option<String>,

    #[serde(rename = "defaultPlannedDate")]
    pub default_planned_date: Option<NaiveDate>,

    #[serde(default)]
    pub items: Vec<PmPlanItem>,

    pub comment: Option<String>,
}

impl PmPlanDto {
    /// Проверка полей формы
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .required("description", &self.description, "Наименование")
            .required_ref("factory_id", Some(self.factory_id.as_str()), "завод");
        match (self.start_date, self.end_date) {
            (None, _) => {
                errors.push("start_date", "Укажите дату начала");
            }
            (Some(start), Some(end)) if end < start => {
                errors.push("end_date", "Дата окончания раньше даты начала");
            }
            _ => {}
        }
        errors.into_vec()
    }
}

impl From<&PmPlan> for PmPlanDto {
    fn from(p: &PmPlan) -> Self {
        Self {
            id: Some(p.base.id.as_string()),
            code: Some(p.base.code.clone()),
            description: p.base.description.clone(),
            factory_id: p.factory_id.clone(),
            frequency: p.frequency,
            start_date: Some(p.start_date),
            end_date: p.end_date,
            default_checklist_id: p.default_checklist_id.clone(),
            default_planned_date: p.default_planned_date,
            items: p.items.clone(),
            comment: p.base.comment.clone(),
        }
    }
}

/// Результат генерации заказ-нарядов по плану
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResult {
    pub created: usize,
    pub skipped: usize,
}

/// Ответ на смену статуса плана: при активации содержит итог генерации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStatusResponse {
    pub plan: PmPlan,
    pub generated: Option<GenerateResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn plan() -> PmPlan {
        let mut p = PmPlan::new_for_insert(
            "PM-0001".into(),
            "Ежемесячный осмотр насосов".into(),
            "factory-1".into(),
            d(2024, 1, 1),
        );
        p.items = vec![PmPlanItem {
            equipment_id: "eq-1".into(),
            checklist_template_id: Some("cl-1".into()),
            planned_date: Some(d(2024, 1, 15)),
        }];
        p
    }

    #[test]
    fn test_next_date_by_frequency() {
        let start = d(2024, 1, 31);
        assert_eq!(Frequency::Once.next_date(start), None);
        assert_eq!(Frequency::Weekly.next_date(start), Some(d(2024, 2, 7)));
        assert_eq!(Frequency::Monthly.next_date(start), Some(d(2024, 2, 29)));
        assert_eq!(Frequency::Quarterly.next_date(start), Some(d(2024, 4, 30)));
        assert_eq!(Frequency::SemiAnnual.next_date(start), Some(d(2024, 7, 31)));
        assert_eq!(Frequency::Annual.next_date(start), Some(d(2025, 1, 31)));
    }

    #[test]
    fn test_end_before_start_is_invalid() {
        let mut p = plan();
        p.end_date = Some(d(2023, 12, 31));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_duplicate_equipment_is_invalid() {
        let mut p = plan();
        p.items.push(PmPlanItem::new("eq-1"));
        assert_eq!(p.validate(), Err("Оборудование в плане повторяется".to_string()));
    }

    #[test]
    fn test_activation_requires_complete_rows() {
        let mut p = plan();
        assert!(p.validate_for_activation().is_ok());

        p.items.push(PmPlanItem::new("eq-2"));
        assert!(p.validate().is_ok());
        let err = p.validate_for_activation().unwrap_err();
        assert!(err.contains("чек-лист"));

        p.items.clear();
        assert_eq!(
            p.validate_for_activation(),
            Err("В плане нет оборудования".to_string())
        );
    }

    #[test]
    fn test_next_occurrence_respects_end_date() {
        let mut p = plan();
        p.end_date = Some(d(2024, 2, 10));
        assert_eq!(p.next_occurrence(d(2024, 1, 15)), None);
        p.end_date = Some(d(2024, 3, 1));
        assert_eq!(p.next_occurrence(d(2024, 1, 15)), Some(d(2024, 2, 15)));
    }

    #[test]
    fn test_status_transitions() {
        assert!(PlanStatus::Draft.can_transition_to(PlanStatus::Active));
        assert!(PlanStatus::Inactive.can_transition_to(PlanStatus::Active));
        assert!(!PlanStatus::Active.can_transition_to(PlanStatus::Draft));
    }

    #[test]
    fn test_dto_requires_start_date() {
        let dto = PmPlanDto {
            description: "План".into(),
            factory_id: "f".into(),
            ..Default::default()
        };
        let errors = dto.validate_fields();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "start_date");
    }
}
