use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, StatusWorkflow};
use crate::shared::filter::Filterable;
use crate::shared::validation::{FieldError, FieldErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор инцидента (внепланового ремонта)
    CorrectiveMaintenanceId
);

// ============================================================================
// Enums
// ============================================================================

/// Приоритет инцидента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High, Priority::Critical]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Низкий",
            Priority::Medium => "Средний",
            Priority::High => "Высокий",
            Priority::Critical => "Критический",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Closed,
}

impl IncidentStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, IncidentStatus::New | IncidentStatus::InProgress)
    }
}

impl StatusWorkflow for IncidentStatus {
    fn all() -> &'static [Self] {
        &[
            IncidentStatus::New,
            IncidentStatus::InProgress,
            IncidentStatus::Completed,
            IncidentStatus::Closed,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::New => "new",
            IncidentStatus::InProgress => "in_progress",
            IncidentStatus::Completed => "completed",
            IncidentStatus::Closed => "closed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IncidentStatus::New => "Зарегистрирован",
            IncidentStatus::InProgress => "В работе",
            IncidentStatus::Completed => "Устранён",
            IncidentStatus::Closed => "Закрыт",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        use IncidentStatus::*;
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
// Aggregate Root
// ============================================================================

/// Инцидент: поломка оборудования и её устранение
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectiveMaintenance {
    #[serde(flatten)]
    pub base: BaseAggregate<CorrectiveMaintenanceId>,

    #[serde(rename = "equipmentId")]
    pub equipment_id: String,

    pub details: String,
    pub priority: Priority,
    pub status: IncidentStatus,

    #[serde(rename = "reportedBy")]
    pub reported_by: String,

    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,

    #[serde(rename = "reportedAt")]
    pub reported_at: DateTime<Utc>,

    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,

    #[serde(rename = "closedAt")]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(rename = "rootCause")]
    pub root_cause: String,

    #[serde(rename = "actionTaken")]
    pub action_taken: String,

    #[serde(rename = "downtimeMinutes")]
    pub downtime_minutes: Option<i64>,
}

impl CorrectiveMaintenance {
    /// Зарегистрировать новый инцидент
    pub fn new_for_insert(
        code: String,
        description: String,
        equipment_id: String,
        reported_by: String,
    ) -> Self {
        Self {
            base: BaseAggregate::new(CorrectiveMaintenanceId::new_v4(), code, description),
            equipment_id,
            details: String::new(),
            priority: Priority::Medium,
            status: IncidentStatus::New,
            reported_by,
            assigned_to: None,
            reported_at: Utc::now(),
            started_at: None,
            resolved_at: None,
            closed_at: None,
            root_cause: String::new(),
            action_taken: String::new(),
            downtime_minutes: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO (статус — отдельной операцией)
    pub fn update(&mut self, dto: &CorrectiveMaintenanceDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.equipment_id = dto.equipment_id.clone();
        self.details = dto.details.trim().to_string();
        self.priority = dto.priority;
        self.assigned_to = dto.assigned_to.clone().filter(|s| !s.is_empty());
        self.root_cause = dto.root_cause.trim().to_string();
        self.action_taken = dto.action_taken.trim().to_string();
        self.downtime_minutes = dto.downtime_minutes;
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate_identity()?;
        if self.equipment_id.trim().is_empty() {
            return Err("Не указано оборудование".into());
        }
        if matches!(self.downtime_minutes, Some(m) if m < 0) {
            return Err("Простой не может быть отрицательным".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }

    /// Простой в минутах: заданный вручную либо от начала работ до устранения
    pub fn effective_downtime(&self) -> Option<i64> {
        self.downtime_minutes.or_else(|| match (self.started_at, self.resolved_at) {
            (Some(start), Some(end)) if end >= start => Some((end - start).num_minutes()),
            _ => None,
        })
    }

    /// Перевести инцидент в новый статус
    pub fn transition(&mut self, next: IncidentStatus, now: DateTime<Utc>) -> Result<(), String> {
        self.status.check_transition(next)?;
        match next {
            IncidentStatus::InProgress => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.resolved_at = None;
            }
            IncidentStatus::Completed => {
                if self.action_taken.trim().is_empty() {
                    return Err("Опишите выполненные работы перед завершением".into());
                }
                self.resolved_at = Some(now);
            }
            IncidentStatus::Closed => {
                self.closed_at = Some(now);
            }
            IncidentStatus::New => {}
        }
        self.status = next;
        Ok(())
    }
}

impl AggregateRoot for CorrectiveMaintenance {
    type Id = CorrectiveMaintenanceId;

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
        "a006"
    }

    fn collection_name() -> &'static str {
        "corrective_maintenance"
    }

    fn element_name() -> &'static str {
        "Инцидент"
    }

    fn list_name() -> &'static str {
        "Инциденты"
    }

    fn code_prefix() -> &'static str {
        "CM"
    }
}

impl Filterable for CorrectiveMaintenance {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.as_str().to_string()),
            "priority" => Some(self.priority.as_str().to_string()),
            "equipment_id" => Some(self.equipment_id.clone()),
            "assigned_to" => self.assigned_to.clone(),
            _ => None,
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.base.code.clone(),
            self.base.description.clone(),
            self.details.clone(),
        ]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для регистрации/обновления инцидента
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CorrectiveMaintenanceDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,

    #[serde(rename = "equipmentId")]
    pub equipment_id: String,

    #[serde(default)]
    pub details: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,

    #[serde(rename = "rootCause", default)]
    pub root_cause: String,

    #[serde(rename = "actionTaken", default)]
    pub action_taken: String,

    #[serde(rename = "downtimeMinutes")]
    pub downtime_minutes: Option<i64>,

    pub comment: Option<String>,
}

impl CorrectiveMaintenanceDto {
    /// Проверка полей формы
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .required("description", &self.description, "Описание")
            .required_ref("equipment_id", Some(self.equipment_id.as_str()), "оборудование");
        if matches!(self.downtime_minutes, Some(m) if m < 0) {
            errors.push("downtime_minutes", "Простой не может быть отрицательным");
        }
        errors.into_vec()
    }
}

impl From<&CorrectiveMaintenance> for CorrectiveMaintenanceDto {
    fn from(c: &CorrectiveMaintenance) -> Self {
        Self {
            id: Some(c.base.id.as_string()),
            code: Some(c.base.code.clone()),
            description: c.base.description.clone(),
            equipment_id: c.equipment_id.clone(),
            details: c.details.clone(),
            priority: c.priority,
            assigned_to: c.assigned_to.clone(),
            root_cause: c.root_cause.clone(),
            action_taken: c.action_taken.clone(),
            downtime_minutes: c.downtime_minutes,
            comment: c.base.comment.clone(),
        }
    }
}

/// Параметры фильтрации списка инцидентов (query string)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub equipment_id: Option<String>,
    #[serde(default)]
    pub open_only: bool,
    pub q: Option<String>,
}

impl IncidentListQuery {
    pub fn matches(&self, c: &CorrectiveMaintenance) -> bool {
        let field_ok = |filter: &Option<String>, field: &str| match filter.as_deref() {
            Some(f) if !f.is_empty() => c.filter_value(field).as_deref() == Some(f),
            _ => true,
        };
        field_ok(&self.status, "status")
            && field_ok(&self.priority, "priority")
            && field_ok(&self.equipment_id, "equipment_id")
            && (!self.open_only || c.status.is_open())
            && self.q.as_deref().map_or(true, |q| {
                let q = q.trim().to_lowercase();
                q.is_empty() || c.search_text().iter().any(|t| t.to_lowercase().contains(&q))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn incident() -> CorrectiveMaintenance {
        CorrectiveMaintenance::new_for_insert(
            "CM-0001".into(),
            "Течь сальника".into(),
            "eq-1".into(),
            "ivanov".into(),
        )
    }

    #[test]
    fn test_complete_requires_action_taken() {
        let mut c = incident();
        let now = Utc::now();
        c.transition(IncidentStatus::InProgress, now).unwrap();
        let err = c
            .transition(IncidentStatus::Completed, now + Duration::minutes(30))
            .unwrap_err();
        assert!(err.contains("выполненные работы"));
        assert_eq!(c.status, IncidentStatus::InProgress);

        c.action_taken = "Заменён сальник".into();
        c.transition(IncidentStatus::Completed, now + Duration::minutes(90))
            .unwrap();
        assert_eq!(c.status, IncidentStatus::Completed);
        assert_eq!(c.downtime_minutes, None);
        assert_eq!(c.effective_downtime(), Some(90));
    }

    #[test]
    fn test_downtime_recomputed_after_reopen() {
        let mut c = incident();
        let t0 = Utc::now();
        c.action_taken = "Заменён подшипник".into();
        c.transition(IncidentStatus::InProgress, t0).unwrap();
        c.transition(IncidentStatus::Completed, t0 + Duration::minutes(30))
            .unwrap();
        assert_eq!(c.effective_downtime(), Some(30));

        c.transition(IncidentStatus::InProgress, t0 + Duration::minutes(60))
            .unwrap();
        assert_eq!(c.effective_downtime(), None);
        c.transition(IncidentStatus::Completed, t0 + Duration::minutes(180))
            .unwrap();
        assert_eq!(c.effective_downtime(), Some(180));
    }

    #[test]
    fn test_explicit_downtime_is_kept() {
        let mut c = incident();
        let now = Utc::now();
        c.downtime_minutes = Some(15);
        c.action_taken = "Подтянуто крепление".into();
        c.transition(IncidentStatus::InProgress, now).unwrap();
        c.transition(IncidentStatus::Completed, now + Duration::hours(2))
            .unwrap();
        assert_eq!(c.effective_downtime(), Some(15));
    }

    #[test]
    fn test_transitions() {
        use IncidentStatus::*;
        assert!(New.can_transition_to(Closed));
        assert!(Completed.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(New));
        assert!(!Closed.can_transition_to(New));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert_eq!(Priority::parse("critical"), Some(Priority::Critical));
    }

    #[test]
    fn test_list_query() {
        let mut c = incident();
        c.priority = Priority::High;
        let mut q = IncidentListQuery {
            priority: Some("high".into()),
            open_only: true,
            ..Default::default()
        };
        assert!(q.matches(&c));
        q.q = Some("САЛЬНИК".into());
        assert!(q.matches(&c));
        c.status = IncidentStatus::Closed;
        assert!(!q.matches(&c));
    }

    #[test]
    fn test_negative_downtime_invalid() {
        let mut c = incident();
        c.downtime_minutes = Some(-5);
        assert!(c.validate().is_err());
    }
}
