use contracts::domain::a003_checklist_template::ChecklistTemplate;
use contracts::domain::a005_work_order::{ChecklistResult, WorkOrder, WorkOrderDto, WorkOrderStatus};
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::{a003_checklist_template, a005_work_order::api};
use crate::shared::date_utils::today;
use crate::shared::toast::{notify_error, notify_success};

#[derive(Clone, Copy)]
pub struct WorkOrderDetailsViewModel {
    pub form: RwSignal<WorkOrderDto>,
    pub order: RwSignal<Option<WorkOrder>>,
    pub template: RwSignal<Option<ChecklistTemplate>>,
    /// Результаты, редактируемые на форме исполнения
    pub results: RwSignal<Vec<ChecklistResult>>,
    pub error: RwSignal<Option<String>>,
    pub errors: RwSignal<Vec<FieldError>>,
    pub busy: RwSignal<bool>,
}

impl WorkOrderDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(WorkOrderDto {
                planned_date: Some(today()),
                ..Default::default()
            }),
            order: RwSignal::new(None),
            template: RwSignal::new(None),
            results: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
            busy: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn status(&self) -> WorkOrderStatus {
        self.order
            .with(|o| o.as_ref().map(|o| o.status))
            .unwrap_or_default()
    }

    /// Результаты вносятся только в наряд «В работе»
    pub fn can_record(&self) -> bool {
        self.status() == WorkOrderStatus::InProgress
    }

    pub fn is_overdue(&self) -> bool {
        self.order
            .with(|o| o.as_ref().is_some_and(|o| o.is_overdue(today())))
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(id) = id else { return };
        let vm = *self;
        spawn_local(async move {
            match api::fetch_by_id(&id).await {
                Ok(order) => {
                    let template_id = order.checklist_template_id.clone();
                    vm.apply_order(order);
                    match a003_checklist_template::api::fetch_by_id(&template_id).await {
                        Ok(t) => vm.template.set(Some(t)),
                        Err(e) => vm.error.set(Some(format!("Чек-лист не загружен: {}", e))),
                    }
                }
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    fn apply_order(&self, order: WorkOrder) {
        self.form.set(WorkOrderDto::from(&order));
        self.results.set(order.results.clone());
        self.order.set(Some(order));
    }

    pub fn result(&self, item_id: &str) -> ChecklistResult {
        self.results.with(|rs| {
            rs.iter()
                .find(|r| r.item_id == item_id)
                .cloned()
                .unwrap_or_else(|| ChecklistResult {
                    item_id: item_id.to_string(),
                    ..Default::default()
                })
        })
    }

    pub fn update_result(&self, item_id: &str, apply: impl FnOnce(&mut ChecklistResult)) {
        self.results.update(|rs| upsert_result(rs, item_id, apply));
    }

    /// Есть несохранённые результаты
    pub fn results_dirty(&self) -> bool {
        let saved = self
            .order
            .with(|o| o.as_ref().map(|o| o.results.clone()).unwrap_or_default());
        self.results.with(|rs| filled(rs) != filled(&saved))
    }

    /// Незаполненные обязательные пункты по текущему вводу
    pub fn missing_required(&self) -> Vec<String> {
        self.template.with(|t| {
            t.as_ref()
                .map(|t| self.results.with(|rs| missing_required(t, rs)))
                .unwrap_or_default()
        })
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let current = self.form.get_untracked();
        let field_errors = current.validate_fields();
        if !field_errors.is_empty() {
            self.errors.set(field_errors);
            return;
        }
        self.errors.set(Vec::new());

        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            match api::save(&current).await {
                Ok(_) => {
                    notify_success(format!("Наряд «{}» сохранён", current.description.trim()));
                    on_saved.run(());
                }
                Err(e) => {
                    vm.error.set(Some(e.clone()));
                    notify_error(e);
                }
            }
            vm.busy.set(false);
        });
    }

    pub fn save_results_command(&self) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let results = self.results.with_untracked(|rs| filled(rs));
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            match api::record_results(&id, &results).await {
                Ok(order) => {
                    let failed = order.failed_count();
                    vm.apply_order(order);
                    if failed > 0 {
                        notify_success(format!("Результаты сохранены, замечаний: {}", failed));
                    } else {
                        notify_success("Результаты сохранены");
                    }
                }
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }

    /// Смена статуса; несохранённые результаты записываются перед переходом
    pub fn change_status_command(&self, next: WorkOrderStatus) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let pending = (self.can_record() && self.results_dirty())
            .then(|| self.results.with_untracked(|rs| filled(rs)));
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            if let Some(results) = pending {
                match api::record_results(&id, &results).await {
                    Ok(order) => vm.apply_order(order),
                    Err(e) => {
                        notify_error(e);
                        vm.busy.set(false);
                        return;
                    }
                }
            }
            match api::change_status(&id, next).await {
                Ok(order) => {
                    notify_success(format!("Статус наряда: {}", order.status.label()));
                    vm.apply_order(order);
                }
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }
}

impl Default for WorkOrderDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

fn upsert_result(
    results: &mut Vec<ChecklistResult>,
    item_id: &str,
    apply: impl FnOnce(&mut ChecklistResult),
) {
    match results.iter_mut().find(|r| r.item_id == item_id) {
        Some(r) => apply(r),
        None => {
            let mut r = ChecklistResult {
                item_id: item_id.to_string(),
                ..Default::default()
            };
            apply(&mut r);
            results.push(r);
        }
    }
}

/// Только пункты с введёнными данными
fn filled(results: &[ChecklistResult]) -> Vec<ChecklistResult> {
    results.iter().filter(|r| r.is_filled()).cloned().collect()
}

fn missing_required(template: &ChecklistTemplate, results: &[ChecklistResult]) -> Vec<String> {
    template
        .items
        .iter()
        .filter(|item| item.required)
        .filter(|item| {
            !results
                .iter()
                .any(|r| r.item_id == item.id && r.answers(&item.kind))
        })
        .map(|item| item.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_checklist_template::{ChecklistItem, ChecklistItemKind};

    #[test]
    fn test_upsert_result_creates_then_updates() {
        let mut rs = Vec::new();
        upsert_result(&mut rs, "i1", |r| r.passed = Some(true));
        upsert_result(&mut rs, "i1", |r| r.note = Some("ок".into()));
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].passed, Some(true));
        assert_eq!(rs[0].note.as_deref(), Some("ок"));
    }

    #[test]
    fn test_filled_drops_empty_rows() {
        let rs = vec![
            ChecklistResult {
                item_id: "a".into(),
                ..Default::default()
            },
            ChecklistResult {
                item_id: "b".into(),
                note: Some("  ".into()),
                ..Default::default()
            },
            ChecklistResult {
                item_id: "c".into(),
                value: Some(1.0),
                ..Default::default()
            },
        ];
        let kept: Vec<_> = filled(&rs).into_iter().map(|r| r.item_id).collect();
        assert_eq!(kept, vec!["c"]);
    }

    #[test]
    fn test_missing_required_by_local_input() {
        let mut t = ChecklistTemplate::new_for_insert("CL-1".into(), "Осмотр".into());
        let mut optional = ChecklistItem::new("Замечания", ChecklistItemKind::Text);
        optional.required = false;
        t.items = vec![ChecklistItem::new("Утечки", ChecklistItemKind::Check), optional];
        let leak_id = t.items[0].id.clone();

        assert_eq!(missing_required(&t, &[]), vec!["Утечки".to_string()]);
        let rs = vec![ChecklistResult {
            item_id: leak_id,
            passed: Some(false),
            ..Default::default()
        }];
        assert!(missing_required(&t, &rs).is_empty());

        let noted_only = vec![ChecklistResult {
            item_id: t.items[0].id.clone(),
            note: Some("проверю завтра".into()),
            ..Default::default()
        }];
        assert_eq!(missing_required(&t, &noted_only), vec!["Утечки".to_string()]);
    }
}
