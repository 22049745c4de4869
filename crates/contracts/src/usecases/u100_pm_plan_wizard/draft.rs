//! Состояние мастера создания плана ТО и его производные

use super::step::WizardStep;
use crate::domain::a002_equipment::Equipment;
use crate::domain::a004_pm_plan::{Frequency, PmPlanDto, PmPlanItem};
use crate::domain::common::AggregateId;
use crate::shared::validation::{FieldError, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Строка оборудования в мастере
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WizardEquipmentRow {
    pub equipment_id: String,
    pub equipment_code: String,
    pub equipment_name: String,
    pub factory_id: String,
    pub checklist_template_id: Option<String>,
    pub planned_date: Option<NaiveDate>,
}

impl WizardEquipmentRow {
    pub fn from_equipment(e: &Equipment) -> Self {
        Self {
            equipment_id: e.base.id.as_string(),
            equipment_code: e.base.code.clone(),
            equipment_name: e.base.description.clone(),
            factory_id: e.factory_id.clone(),
            checklist_template_id: None,
            planned_date: None,
        }
    }

    pub fn has_checklist(&self) -> bool {
        self.checklist_template_id
            .as_deref()
            .map(|id| !id.is_empty())
            .unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.has_checklist() && self.planned_date.is_some()
    }
}

/// Сводка по строкам для шага «Проверка»
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftSummary {
    pub total_rows: usize,
    pub complete_rows: usize,
    pub missing_checklist: usize,
    pub missing_date: usize,
}

/// Черновик плана ТО, который заполняется по шагам
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PmPlanDraft {
    pub step: WizardStep,

    // Реквизиты
    pub name: String,
    pub factory_id: String,
    pub comment: String,

    // Расписание
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub default_checklist_id: Option<String>,
    pub default_planned_date: Option<NaiveDate>,

    // Оборудование
    pub rows: Vec<WizardEquipmentRow>,
}

impl PmPlanDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ошибки полей конкретного шага
    pub fn step_errors(&self, step: WizardStep) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        match step {
            WizardStep::Metadata => {
                errors
                    .required("name", &self.name, "Наименование")
                    .required_ref("factory_id", Some(self.factory_id.as_str()), "завод");
            }
            WizardStep::Scheduling => {
                if self.frequency.is_none() {
                    errors.push("frequency", "Выберите периодичность");
                }
                match (self.start_date, self.end_date) {
                    (None, _) => {
                        errors.push("start_date", "Укажите дату начала");
                    }
                    (Some(start), Some(end)) if end < start => {
                        errors.push("end_date", "Дата окончания раньше даты начала");
                    }
                    _ => {}
                }
            }
            WizardStep::Equipment => {
                if self.rows.is_empty() {
                    errors.push("rows", "Добавьте хотя бы одну единицу оборудования");
                }
            }
            WizardStep::Review => {
                let summary = self.summary();
                if summary.missing_checklist > 0 {
                    errors.push(
                        "rows",
                        format!("Не назначен чек-лист: {} строк", summary.missing_checklist),
                    );
                }
                if summary.missing_date > 0 {
                    errors.push(
                        "rows",
                        format!("Не указана плановая дата: {} строк", summary.missing_date),
                    );
                }
            }
        }
        errors.into_vec()
    }

    /// Можно ли уйти дальше с указанного шага
    pub fn can_proceed_from(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Review => self.is_complete(),
            _ => self.step_errors(step).is_empty(),
        }
    }

    /// Можно ли уйти дальше с текущего шага
    pub fn can_proceed(&self) -> bool {
        self.can_proceed_from(self.step)
    }

    /// Все строки заполнены: чек-лист и плановая дата есть у каждой
    pub fn is_complete(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.is_complete())
    }

    /// Можно ли отправить план
    pub fn can_submit(&self) -> bool {
        WizardStep::all().iter().all(|s| self.can_proceed_from(*s))
    }

    /// Перейти на следующий шаг, если текущий заполнен
    pub fn next(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                if next == WizardStep::Review {
                    self.apply_defaults();
                }
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Вернуться на шаг назад (всегда возможно, кроме первого шага)
    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Перейти на произвольный шаг, если все предыдущие заполнены
    pub fn go_to(&mut self, step: WizardStep) -> bool {
        let reachable = WizardStep::all()
            .iter()
            .take_while(|s| **s < step)
            .all(|s| self.can_proceed_from(*s));
        if reachable {
            if step == WizardStep::Review {
                self.apply_defaults();
            }
            self.step = step;
        }
        reachable
    }

    /// Сменить завод: строки чужого оборудования удаляются
    pub fn set_factory(&mut self, factory_id: &str) {
        if self.factory_id == factory_id {
            return;
        }
        self.factory_id = factory_id.to_string();
        self.rows.retain(|r| r.factory_id == factory_id);
    }

    /// Добавить оборудование (повторно не добавляется, чужой завод отклоняется)
    pub fn add_equipment(&mut self, row: WizardEquipmentRow) -> bool {
        if row.factory_id != self.factory_id || self.contains(&row.equipment_id) {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn remove_equipment(&mut self, equipment_id: &str) {
        self.rows.retain(|r| r.equipment_id != equipment_id);
    }

    pub fn contains(&self, equipment_id: &str) -> bool {
        self.rows.iter().any(|r| r.equipment_id == equipment_id)
    }

    /// Добавить/убрать оборудование по флажку
    pub fn toggle_equipment(&mut self, row: WizardEquipmentRow) {
        if self.contains(&row.equipment_id) {
            self.remove_equipment(&row.equipment_id);
        } else {
            self.add_equipment(row);
        }
    }

    pub fn set_row_checklist(&mut self, equipment_id: &str, checklist_id: Option<String>) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.equipment_id == equipment_id) {
            row.checklist_template_id = checklist_id.filter(|c| !c.is_empty());
        }
    }

    pub fn set_row_date(&mut self, equipment_id: &str, date: Option<NaiveDate>) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.equipment_id == equipment_id) {
            row.planned_date = date;
        }
    }

    /// Заполнить пустые чек-листы и даты значениями по умолчанию
    pub fn apply_defaults(&mut self) {
        let checklist = self.default_checklist_id.clone().filter(|c| !c.is_empty());
        let date = self.default_planned_date.or(self.start_date);
        for row in &mut self.rows {
            if !row.has_checklist() {
                row.checklist_template_id = checklist.clone();
            }
            if row.planned_date.is_none() {
                row.planned_date = date;
            }
        }
    }

    pub fn rows_missing_checklist(&self) -> Vec<&WizardEquipmentRow> {
        self.rows.iter().filter(|r| !r.has_checklist()).collect()
    }

    pub fn rows_missing_date(&self) -> Vec<&WizardEquipmentRow> {
        self.rows.iter().filter(|r| r.planned_date.is_none()).collect()
    }

    pub fn summary(&self) -> DraftSummary {
        DraftSummary {
            total_rows: self.rows.len(),
            complete_rows: self.rows.iter().filter(|r| r.is_complete()).count(),
            missing_checklist: self.rows_missing_checklist().len(),
            missing_date: self.rows_missing_date().len(),
        }
    }

    /// DTO для `POST /api/pm_plan`
    pub fn to_dto(&self) -> PmPlanDto {
        PmPlanDto {
            id: None,
            code: None,
            description: self.name.trim().to_string(),
            factory_id: self.factory_id.clone(),
            frequency: self.frequency.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            default_checklist_id: self.default_checklist_id.clone(),
            default_planned_date: self.default_planned_date,
            items: self
                .rows
                .iter()
                .map(|r| PmPlanItem {
                    equipment_id: r.equipment_id.clone(),
                    checklist_template_id: r.checklist_template_id.clone(),
                    planned_date: r.planned_date,
                })
                .collect(),
            comment: Some(self.comment.trim().to_string()).filter(|c| !c.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn row(id: &str, factory: &str) -> WizardEquipmentRow {
        WizardEquipmentRow {
            equipment_id: id.into(),
            equipment_code: id.to_uppercase(),
            equipment_name: format!("Насос {}", id),
            factory_id: factory.into(),
            ..Default::default()
        }
    }

    fn filled_draft() -> PmPlanDraft {
        let mut draft = PmPlanDraft::new();
        draft.name = "Осмотр насосов".into();
        draft.set_factory("f1");
        draft.frequency = Some(Frequency::Monthly);
        draft.start_date = Some(d(1));
        draft.default_checklist_id = Some("cl-1".into());
        draft.add_equipment(row("eq-1", "f1"));
        draft.add_equipment(row("eq-2", "f1"));
        draft
    }

    #[test]
    fn test_metadata_step_requires_name_and_factory() {
        let mut draft = PmPlanDraft::new();
        assert!(!draft.can_proceed());
        assert!(!draft.next());
        draft.name = "План".into();
        assert!(!draft.can_proceed());
        draft.set_factory("f1");
        assert!(draft.next());
        assert_eq!(draft.step, WizardStep::Scheduling);
    }

    #[test]
    fn test_scheduling_step_checks_dates() {
        let mut draft = filled_draft();
        draft.step = WizardStep::Scheduling;
        draft.end_date = Some(d(1) - chrono::Duration::days(1));
        let errors = draft.step_errors(WizardStep::Scheduling);
        assert_eq!(errors[0].field, "end_date");
        assert!(!draft.next());
        draft.end_date = None;
        draft.frequency = None;
        assert!(!draft.can_proceed());
    }

    #[test]
    fn test_go_to_requires_previous_steps() {
        let mut draft = PmPlanDraft::new();
        assert!(draft.go_to(WizardStep::Metadata));
        assert!(!draft.go_to(WizardStep::Equipment));
        assert_eq!(draft.step, WizardStep::Metadata);

        let mut draft = filled_draft();
        assert!(draft.go_to(WizardStep::Review));
        assert_eq!(draft.step, WizardStep::Review);
        assert!(draft.back());
        assert_eq!(draft.step, WizardStep::Equipment);
    }

    #[test]
    fn test_apply_defaults_fills_only_empty() {
        let mut draft = filled_draft();
        draft.set_row_checklist("eq-2", Some("cl-2".into()));
        draft.set_row_date("eq-2", Some(d(20)));
        draft.apply_defaults();
        assert_eq!(draft.rows[0].checklist_template_id.as_deref(), Some("cl-1"));
        assert_eq!(draft.rows[0].planned_date, Some(d(1)));
        assert_eq!(draft.rows[1].checklist_template_id.as_deref(), Some("cl-2"));
        assert_eq!(draft.rows[1].planned_date, Some(d(20)));
    }

    #[test]
    fn test_review_requires_complete_rows() {
        let mut draft = filled_draft();
        draft.default_checklist_id = None;
        draft.go_to(WizardStep::Review);
        let summary = draft.summary();
        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.missing_checklist, 2);
        assert_eq!(summary.missing_date, 0);
        assert!(!draft.can_submit());

        draft.set_row_checklist("eq-1", Some("cl-1".into()));
        draft.set_row_checklist("eq-2", Some("cl-1".into()));
        assert!(draft.is_complete());
        assert!(draft.can_submit());
    }

    #[test]
    fn test_factory_change_drops_foreign_rows() {
        let mut draft = filled_draft();
        assert!(!draft.add_equipment(row("eq-9", "f2")));
        assert!(!draft.add_equipment(row("eq-1", "f1")));
        draft.set_factory("f2");
        assert!(draft.rows.is_empty());
        assert!(draft.add_equipment(row("eq-9", "f2")));
    }

    #[test]
    fn test_toggle_equipment() {
        let mut draft = filled_draft();
        draft.toggle_equipment(row("eq-1", "f1"));
        assert!(!draft.contains("eq-1"));
        draft.toggle_equipment(row("eq-1", "f1"));
        assert!(draft.contains("eq-1"));
    }

    #[test]
    fn test_to_dto() {
        let mut draft = filled_draft();
        draft.apply_defaults();
        let dto = draft.to_dto();
        assert_eq!(dto.description, "Осмотр насосов");
        assert_eq!(dto.frequency, Frequency::Monthly);
        assert_eq!(dto.items.len(), 2);
        assert_eq!(dto.items[0].checklist_template_id.as_deref(), Some("cl-1"));
        assert!(dto.comment.is_none());
        assert!(dto.validate_fields().is_empty());
    }
}
