use crate::domain::a003_checklist_template::{ChecklistItemKind, ChecklistTemplate};
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, StatusWorkflow};
use crate::shared::filter::Filterable;
use crate::shared::validation::{FieldError, FieldErrors};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор заказ-наряда
    WorkOrderId
);

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Closed,
}

impl WorkOrderStatus {
    /// Наряд ещё в работе (новый или выполняется)
    pub fn is_open(&self) -> bool {
        matches!(self, WorkOrderStatus::New | WorkOrderStatus::InProgress)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Closed)
    }
}

impl StatusWorkflow for WorkOrderStatus {
    fn all() -> &'static [Self] {
        &[
            WorkOrderStatus::New,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Closed,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::New => "new",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Closed => "closed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WorkOrderStatus::New => "Новый",
            WorkOrderStatus::InProgress => "В работе",
            WorkOrderStatus::Completed => "Выполнен",
            WorkOrderStatus::Closed => "Закрыт",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (self, next),
            (New, InProgress)
                | (InProgress, Completed)
                | (Completed, Closed)
                | (New, Closed)
                | (Completed, InProgress)
        )
    }
}

// ============================================================================
// Results
// ============================================================================

/// Результат выполнения пункта чек-листа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChecklistResult {
    #[serde(rename = "itemId")]
    pub item_id: String,
    pub passed: Option<bool>,
    pub value: Option<f64>,
    pub note: Option<String>,
}

impl ChecklistResult {
    /// Есть ли фактически введённый результат
    pub fn is_filled(&self) -> bool {
        self.passed.is_some()
            || self.value.is_some()
            || self.has_note()
    }

    fn has_note(&self) -> bool {
        self.note.as_deref().map(|n| !n.trim().is_empty()).unwrap_or(false)
    }

    /// Дан ли ответ по типу пункта: отметка для проверки, значение для замера,
    /// текст для текстового пункта. Примечание само по себе ответом не считается.
    pub fn answers(&self, kind: &ChecklistItemKind) -> bool {
        match kind {
            ChecklistItemKind::Check => self.passed.is_some(),
            ChecklistItemKind::Measurement { .. } => self.value.is_some(),
            ChecklistItemKind::Text => self.has_note(),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Заказ-наряд: выполнение чек-листа на конкретном оборудовании
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    #[serde(flatten)]
    pub base: BaseAggregate<WorkOrderId>,

    #[serde(rename = "equipmentId")]
    pub equipment_id: String,

    #[serde(rename = "checklistTemplateId")]
    pub checklist_template_id: String,

    #[serde(rename = "pmPlanId")]
    pub pm_plan_id: Option<String>,

    #[serde(rename = "plannedDate")]
    pub planned_date: NaiveDate,

    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<String>,

    pub status: WorkOrderStatus,
    pub results: Vec<ChecklistResult>,

    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(rename = "closedAt")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    /// Создать новый заказ-наряд для вставки в БД
    pub fn new_for_insert(
        code: String,
        description: String,
        equipment_id: String,
        checklist_template_id: String,
        planned_date: NaiveDate,
    ) -> Self {
        Self {
            base: BaseAggregate::new(WorkOrderId::new_v4(), code, description),
            equipment_id,
            checklist_template_id,
            pm_plan_id: None,
            planned_date,
            assignee_id: None,
            status: WorkOrderStatus::New,
            results: Vec::new(),
            started_at: None,
            completed_at: None,
            closed_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить реквизиты из DTO (статус и результаты — отдельными операциями)
    pub fn update(&mut self, dto: &WorkOrderDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.equipment_id = dto.equipment_id.clone();
        self.checklist_template_id = dto.checklist_template_id.clone();
        if let Some(date) = dto.planned_date {
            self.planned_date = date;
        }
        self.assignee_id = dto.assignee_id.clone().filter(|s| !s.is_empty());
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_identity()?;
        if self.equipment_id.trim().is_empty() {
            return Err("Не указано оборудование".into());
        }
        if self.checklist_template_id.trim().is_empty() {
            return Err("Не указан чек-лист".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Просрочен: плановая дата прошла, а наряд не выполнен
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.planned_date < today
    }

    /// Результат для пункта чек-листа
    pub fn result_for(&self, item_id: &str) -> Option<&ChecklistResult> {
        self.results.iter().find(|r| r.item_id == item_id)
    }

    /// Записать результаты (допускается только для наряда в работе).
    ///
    /// Для замеров признак `passed` вычисляется по диапазону из шаблона.
    pub fn record_results(
        &mut self,
        results: Vec<ChecklistResult>,
        template: &ChecklistTemplate,
    ) -> Result<(), String> {
        if self.status != WorkOrderStatus::InProgress {
            return Err("Результаты можно вносить только в наряд со статусом «В работе»".into());
        }
        let mut normalized = Vec::with_capacity(results.len());
        for mut result in results {
            let item = template
                .item(&result.item_id)
                .ok_or_else(|| format!("Пункт чек-листа не найден: {}", result.item_id))?;
            if let ChecklistItemKind::Measurement { .. } = item.kind {
                if let Some(value) = result.value {
                    result.passed = Some(item.kind.is_within_range(value));
                }
            }
            normalized.push(result);
        }
        self.results = normalized;
        Ok(())
    }

    /// Обязательные пункты шаблона без результата
    pub fn missing_required<'a>(&self, template: &'a ChecklistTemplate) -> Vec<&'a str> {
        template
            .items
            .iter()
            .filter(|item| item.required)
            .filter(|item| {
                !self
                    .result_for(&item.id)
                    .map(|r| r.answers(&item.kind))
                    .unwrap_or(false)
            })
            .map(|item| item.title.as_str())
            .collect()
    }

    /// Количество пунктов с отрицательным результатом
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed == Some(false)).count()
    }

    /// Перевести наряд в новый статус с проставлением отметок времени.
    ///
    /// Для перехода в «Выполнен» нужен шаблон: проверяется заполнение обязательных пунктов.
    pub fn transition(
        &mut self,
        next: WorkOrderStatus,
        template: Option<&ChecklistTemplate>,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        self.status.check_transition(next)?;
        match next {
            WorkOrderStatus::InProgress => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.completed_at = None;
            }
            WorkOrderStatus::Completed => {
                let template = template.ok_or("Шаблон чек-листа не найден")?;
                let missing = self.missing_required(template);
                if !missing.is_empty() {
                    return Err(format!(
                        "Не заполнены обязательные пункты: {}",
                        missing.join(", ")
                    ));
                }
                self.completed_at = Some(now);
            }
            WorkOrderStatus::Closed => {
                self.closed_at = Some(now);
            }
            WorkOrderStatus::New => {}
        }
        self.status = next;
        Ok(())
    }
}

impl AggregateRoot for WorkOrder {
    type Id = WorkOrderId;

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
        "a005"
    }

    fn collection_name() -> &'static str {
        "work_order"
    }

    fn element_name() -> &'static str {
        "Заказ-наряд"
    }

    fn list_name() -> &'static str {
        "Заказ-наряды"
    }

    fn code_prefix() -> &'static str {
        "WO"
    }
}

impl Filterable for WorkOrder {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.as_str().to_string()),
            "equipment_id" => Some(self.equipment_id.clone()),
            "pm_plan_id" => self.pm_plan_id.clone(),
            "assignee_id" => self.assignee_id.clone(),
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

/// DTO для создания/обновления заказ-наряда
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WorkOrderDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,

    #[serde(rename = "equipmentId")]
    pub equipment_id: String,

    #[serde(rename = "checklistTemplateId")]
    pub checklist_template_id: String,

    #[serde(rename = "pmPlanId")]
    pub pm_plan_id: Option<String>,

    #[serde(rename = "plannedDate")]
    pub planned_date: Option<NaiveDate>,

    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<String>,

    pub comment: Option<String>,
}

impl WorkOrderDto {
    /// Проверка полей формы
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .required("description", &self.description, "Наименование")
            .required_ref("equipment_id", Some(self.equipment_id.as_str()), "оборудование")
            .required_ref(
                "checklist_template_id",
                Some(self.checklist_template_id.as_str()),
                "чек-лист",
            );
        if self.planned_date.is_none() {
            errors.push("planned_date", "Укажите плановую дату");
        }
        errors.into_vec()
    }
}

impl From<&WorkOrder> for WorkOrderDto {
    fn from(w: &WorkOrder) -> Self {
        Self {
            id: Some(w.base.id.as_string()),
            code: Some(w.base.code.clone()),
            description: w.base.description.clone(),
            equipment_id: w.equipment_id.clone(),
            checklist_template_id: w.checklist_template_id.clone(),
            pm_plan_id: w.pm_plan_id.clone(),
            planned_date: Some(w.planned_date),
            assignee_id: w.assignee_id.clone(),
            comment: w.base.comment.clone(),
        }
    }
}

/// Параметры фильтрации списка нарядов (query string)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkOrderListQuery {
    pub status: Option<String>,
    pub equipment_id: Option<String>,
    pub pm_plan_id: Option<String>,
    pub assignee_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub overdue_only: bool,
    pub q: Option<String>,
}

impl WorkOrderListQuery {
    /// Проверка наряда на соответствие фильтру
    pub fn matches(&self, w: &WorkOrder, today: NaiveDate) -> bool {
        matches_opt(&self.status, Some(w.status.as_str()))
            && matches_opt(&self.equipment_id, Some(w.equipment_id.as_str()))
            && matches_opt(&self.pm_plan_id, w.pm_plan_id.as_deref())
            && matches_opt(&self.assignee_id, w.assignee_id.as_deref())
            && self.date_from.map_or(true, |from| w.planned_date >= from)
            && self.date_to.map_or(true, |to| w.planned_date <= to)
            && (!self.overdue_only || w.is_overdue(today))
            && self.q.as_deref().map_or(true, |q| {
                let q = q.trim().to_lowercase();
                q.is_empty()
                    || w.search_text().iter().any(|t| t.to_lowercase().contains(&q))
            })
    }
}

fn matches_opt(filter: &Option<String>, value: Option<&str>) -> bool {
    match filter.as_deref() {
        Some(f) if !f.is_empty() => value == Some(f),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_checklist_template::ChecklistItem;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn template() -> ChecklistTemplate {
        let mut t = ChecklistTemplate::new_for_insert("CL-0001".into(), "Осмотр".into());
        let mut optional = ChecklistItem::new("Замечания", ChecklistItemKind::Text);
        optional.required = false;
        t.items = vec![
            ChecklistItem::new("Утечки", ChecklistItemKind::Check),
            ChecklistItem::new(
                "Давление",
                ChecklistItemKind::Measurement {
                    unit: "бар".into(),
                    min: Some(2.0),
                    max: Some(4.0),
                },
            ),
            optional,
        ];
        t.normalize_items();
        t
    }

    fn order() -> WorkOrder {
        WorkOrder::new_for_insert(
            "WO-0001".into(),
            "Осмотр насоса".into(),
            "eq-1".into(),
            "cl-1".into(),
            d(2024, 3, 10),
        )
    }

    #[test]
    fn test_transitions() {
        use WorkOrderStatus::*;
        assert!(New.can_transition_to(InProgress));
        assert!(New.can_transition_to(Closed));
        assert!(Completed.can_transition_to(InProgress));
        assert!(!New.can_transition_to(Completed));
        assert!(!Closed.can_transition_to(InProgress));
        assert!(Closed.next_statuses().is_empty());
    }

    #[test]
    fn test_is_overdue() {
        let mut w = order();
        assert!(w.is_overdue(d(2024, 3, 11)));
        assert!(!w.is_overdue(d(2024, 3, 10)));
        w.status = WorkOrderStatus::Completed;
        assert!(!w.is_overdue(d(2024, 4, 1)));
    }

    #[test]
    fn test_complete_requires_required_items() {
        let t = template();
        let mut w = order();
        let now = Utc::now();
        w.transition(WorkOrderStatus::InProgress, None, now).unwrap();
        assert!(w.started_at.is_some());

        let err = w.transition(WorkOrderStatus::Completed, Some(&t), now).unwrap_err();
        assert!(err.contains("Утечки"));
        assert!(err.contains("Давление"));
        assert!(!err.contains("Замечания"));

        w.record_results(
            vec![
                ChecklistResult {
                    item_id: t.items[0].id.clone(),
                    passed: Some(true),
                    ..Default::default()
                },
                ChecklistResult {
                    item_id: t.items[1].id.clone(),
                    value: Some(3.1),
                    ..Default::default()
                },
            ],
            &t,
        )
        .unwrap();
        w.transition(WorkOrderStatus::Completed, Some(&t), now).unwrap();
        assert_eq!(w.status, WorkOrderStatus::Completed);
        assert!(w.completed_at.is_some());
    }

    #[test]
    fn test_note_alone_does_not_answer_required_items() {
        let t = template();
        let mut w = order();
        w.status = WorkOrderStatus::InProgress;
        let noted = |id: &str| ChecklistResult {
            item_id: id.to_string(),
            note: Some("посмотрю позже".into()),
            ..Default::default()
        };
        w.record_results(vec![noted(&t.items[0].id), noted(&t.items[1].id)], &t)
            .unwrap();
        assert_eq!(w.missing_required(&t), vec!["Утечки", "Давление"]);

        let text = ChecklistItemKind::Text;
        assert!(noted("x").answers(&text));
        assert!(!ChecklistResult::default().answers(&text));
    }

    #[test]
    fn test_measurement_out_of_range_fails() {
        let t = template();
        let mut w = order();
        w.status = WorkOrderStatus::InProgress;
        w.record_results(
            vec![ChecklistResult {
                item_id: t.items[1].id.clone(),
                value: Some(5.5),
                passed: Some(true),
                note: None,
            }],
            &t,
        )
        .unwrap();
        assert_eq!(w.results[0].passed, Some(false));
        assert_eq!(w.failed_count(), 1);
    }

    #[test]
    fn test_results_rejected_outside_in_progress() {
        let t = template();
        let mut w = order();
        assert!(w.record_results(Vec::new(), &t).is_err());
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let t = template();
        let mut w = order();
        w.status = WorkOrderStatus::InProgress;
        let err = w
            .record_results(
                vec![ChecklistResult {
                    item_id: "missing".into(),
                    ..Default::default()
                }],
                &t,
            )
            .unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn test_illegal_transition_message() {
        let mut w = order();
        let err = w
            .transition(WorkOrderStatus::Completed, None, Utc::now())
            .unwrap_err();
        assert!(err.starts_with("Недопустимый переход статуса"));
        assert_eq!(w.status, WorkOrderStatus::New);
    }

    #[test]
    fn test_list_query_matches() {
        let w = order();
        let today = d(2024, 3, 20);
        let mut q = WorkOrderListQuery::default();
        assert!(q.matches(&w, today));
        q.status = Some("in_progress".into());
        assert!(!q.matches(&w, today));
        q.status = Some("new".into());
        q.overdue_only = true;
        assert!(q.matches(&w, today));
        q.q = Some("насос".into());
        assert!(q.matches(&w, today));
        q.date_from = Some(d(2024, 3, 11));
        assert!(!q.matches(&w, today));
    }
}
