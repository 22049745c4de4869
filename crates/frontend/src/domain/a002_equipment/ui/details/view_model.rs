use contracts::domain::a002_equipment::{EquipmentDto, EquipmentStatus};
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_equipment::api;
use crate::shared::toast::{notify_error, notify_success};

#[derive(Clone, Copy)]
pub struct EquipmentDetailsViewModel {
    pub form: RwSignal<EquipmentDto>,
    /// Статус на момент загрузки, от него строятся допустимые переходы
    pub loaded_status: RwSignal<Option<EquipmentStatus>>,
    pub error: RwSignal<Option<String>>,
    pub errors: RwSignal<Vec<FieldError>>,
    pub saving: RwSignal<bool>,
}

impl EquipmentDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(EquipmentDto::default()),
            loaded_status: RwSignal::new(None),
            error: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    /// Статусы для выпадающего списка: текущий и разрешённые переходы
    pub fn status_choices(&self) -> Vec<EquipmentStatus> {
        match self.loaded_status.get() {
            Some(current) => status_choices(current),
            None => EquipmentStatus::all().to_vec(),
        }
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(id) = id else { return };
        let vm = *self;
        spawn_local(async move {
            match api::fetch_by_id(&id).await {
                Ok(equipment) => {
                    vm.loaded_status.set(Some(equipment.status));
                    vm.form.set(EquipmentDto::from(&equipment));
                }
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
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
        vm.saving.set(true);
        spawn_local(async move {
            match api::save(&current).await {
                Ok(_) => {
                    notify_success(format!("Оборудование «{}» сохранено", current.description.trim()));
                    on_saved.run(());
                }
                Err(e) => {
                    vm.error.set(Some(e.clone()));
                    notify_error(e);
                }
            }
            vm.saving.set(false);
        });
    }
}

impl Default for EquipmentDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

fn status_choices(current: EquipmentStatus) -> Vec<EquipmentStatus> {
    let mut choices = vec![current];
    choices.extend(current.next_statuses());
    choices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retired_has_no_way_back() {
        assert_eq!(status_choices(EquipmentStatus::Retired), vec![EquipmentStatus::Retired]);
    }

    #[test]
    fn test_active_can_go_anywhere() {
        let choices = status_choices(EquipmentStatus::Active);
        assert_eq!(choices[0], EquipmentStatus::Active);
        assert_eq!(choices.len(), EquipmentStatus::all().len());
    }
}
