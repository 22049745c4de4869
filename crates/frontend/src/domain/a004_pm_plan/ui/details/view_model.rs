use chrono::NaiveDate;
use contracts::domain::a004_pm_plan::{PlanStatus, PmPlanDto, PmPlanItem};
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a004_pm_plan::api;
use crate::shared::toast::{notify_error, notify_success};

#[derive(Clone, Copy)]
pub struct PmPlanDetailsViewModel {
    pub form: RwSignal<PmPlanDto>,
    pub status: RwSignal<PlanStatus>,
    pub error: RwSignal<Option<String>>,
    pub errors: RwSignal<Vec<FieldError>>,
    pub busy: RwSignal<bool>,
}

impl PmPlanDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(PmPlanDto::default()),
            status: RwSignal::new(PlanStatus::Draft),
            error: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
            busy: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn is_active(&self) -> bool {
        self.status.get() == PlanStatus::Active
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(id) = id else { return };
        let vm = *self;
        spawn_local(async move {
            match api::fetch_by_id(&id).await {
                Ok(plan) => {
                    vm.status.set(plan.status);
                    vm.form.set(PmPlanDto::from(&plan));
                }
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    pub fn item_ids(&self) -> Vec<String> {
        self.form
            .with(|f| f.items.iter().map(|i| i.equipment_id.clone()).collect())
    }

    pub fn item<T>(&self, equipment_id: &str, read: impl FnOnce(&PmPlanItem) -> T) -> Option<T> {
        self.form.with(|f| {
            f.items
                .iter()
                .find(|i| i.equipment_id == equipment_id)
                .map(read)
        })
    }

    pub fn update_item(&self, equipment_id: &str, apply: impl FnOnce(&mut PmPlanItem)) {
        self.form.update(|f| {
            if let Some(item) = f.items.iter_mut().find(|i| i.equipment_id == equipment_id) {
                apply(item);
            }
        });
    }

    pub fn add_equipment(&self, equipment_id: &str) {
        self.form.update(|f| add_equipment(&mut f.items, equipment_id));
    }

    pub fn remove_equipment(&self, equipment_id: &str) {
        self.form
            .update(|f| f.items.retain(|i| i.equipment_id != equipment_id));
    }

    pub fn apply_defaults(&self) {
        self.form.update(|f| {
            let checklist = f.default_checklist_id.clone();
            let date = f.default_planned_date.or(f.start_date);
            fill_defaults(&mut f.items, checklist.as_deref(), date);
        });
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
                    notify_success(format!("План «{}» сохранён", current.description.trim()));
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

    pub fn change_status_command(&self, next: PlanStatus) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            match api::change_status(&id, next).await {
                Ok(resp) => {
                    vm.status.set(resp.plan.status);
                    let mut message = format!("Статус плана: {}", resp.plan.status.label());
                    if let Some(g) = resp.generated {
                        message.push_str(&format!(
                            ". Создано нарядов: {}, пропущено: {}",
                            g.created, g.skipped
                        ));
                    }
                    notify_success(message);
                }
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }

    pub fn generate_command(&self) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            match api::generate(&id).await {
                Ok(g) => notify_success(format!(
                    "Создано нарядов: {}, пропущено: {}",
                    g.created, g.skipped
                )),
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }
}

impl Default for PmPlanDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

fn add_equipment(items: &mut Vec<PmPlanItem>, equipment_id: &str) {
    if equipment_id.is_empty() || items.iter().any(|i| i.equipment_id == equipment_id) {
        return;
    }
    items.push(PmPlanItem::new(equipment_id));
}

/// Заполняет только пустые чек-листы и даты строк
fn fill_defaults(items: &mut [PmPlanItem], checklist: Option<&str>, date: Option<NaiveDate>) {
    for item in items.iter_mut() {
        if !item.has_checklist() {
            if let Some(c) = checklist.filter(|c| !c.is_empty()) {
                item.checklist_template_id = Some(c.to_string());
            }
        }
        if item.planned_date.is_none() {
            item.planned_date = date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_equipment_ignores_duplicates() {
        let mut items = Vec::new();
        add_equipment(&mut items, "e1");
        add_equipment(&mut items, "e1");
        add_equipment(&mut items, "");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_fill_defaults_keeps_row_values() {
        let d1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut items = vec![
            PmPlanItem::new("e1"),
            PmPlanItem {
                equipment_id: "e2".into(),
                checklist_template_id: Some("own".into()),
                planned_date: Some(d2),
            },
        ];
        fill_defaults(&mut items, Some("default"), Some(d1));
        assert_eq!(items[0].checklist_template_id.as_deref(), Some("default"));
        assert_eq!(items[0].planned_date, Some(d1));
        assert_eq!(items[1].checklist_template_id.as_deref(), Some("own"));
        assert_eq!(items[1].planned_date, Some(d2));
    }
}
