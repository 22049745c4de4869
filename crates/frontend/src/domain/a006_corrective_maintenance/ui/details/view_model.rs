use contracts::domain::a006_corrective_maintenance::aggregate::{
    CorrectiveMaintenance, CorrectiveMaintenanceDto, IncidentStatus,
};
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a006_corrective_maintenance::api;
use crate::shared::toast::{notify_error, notify_success};

#[derive(Clone, Copy)]
pub struct IncidentDetailsViewModel {
    pub form: RwSignal<CorrectiveMaintenanceDto>,
    pub incident: RwSignal<Option<CorrectiveMaintenance>>,
    pub error: RwSignal<Option<String>>,
    pub errors: RwSignal<Vec<FieldError>>,
    pub busy: RwSignal<bool>,
}

impl IncidentDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(CorrectiveMaintenanceDto::default()),
            incident: RwSignal::new(None),
            error: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
            busy: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn status(&self) -> IncidentStatus {
        self.incident
            .with(|i| i.as_ref().map(|i| i.status))
            .unwrap_or_default()
    }

    /// Форма отличается от сохранённой версии
    pub fn is_dirty(&self) -> bool {
        self.incident.with(|i| {
            i.as_ref()
                .map(|i| self.form.with(|f| *f != CorrectiveMaintenanceDto::from(i)))
                .unwrap_or(true)
        })
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(id) = id else { return };
        let vm = *self;
        spawn_local(async move {
            match api::fetch_by_id(&id).await {
                Ok(incident) => vm.apply(incident),
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    fn apply(&self, incident: CorrectiveMaintenance) {
        self.form.set(CorrectiveMaintenanceDto::from(&incident));
        self.incident.set(Some(incident));
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
                    notify_success(format!("Инцидент «{}» сохранён", current.description.trim()));
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

    /// Смена статуса; правки формы (например, выполненные работы) сохраняются до перехода
    pub fn change_status_command(&self, next: IncidentStatus) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let pending = self.is_dirty().then(|| self.form.get_untracked());
        if let Some(dto) = &pending {
            let field_errors = dto.validate_fields();
            if !field_errors.is_empty() {
                self.errors.set(field_errors);
                return;
            }
        }
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            if let Some(dto) = pending {
                if let Err(e) = api::save(&dto).await {
                    notify_error(e);
                    vm.busy.set(false);
                    return;
                }
            }
            match api::change_status(&id, next).await {
                Ok(incident) => {
                    notify_success(format!("Статус инцидента: {}", incident.status.label()));
                    vm.apply(incident);
                }
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }
}

impl Default for IncidentDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Простой из поля ввода: пусто значит «рассчитать автоматически»
pub fn parse_downtime(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_downtime() {
        assert_eq!(parse_downtime(" 90 "), Some(90));
        assert_eq!(parse_downtime(""), None);
        assert_eq!(parse_downtime("1.5"), None);
        assert_eq!(parse_downtime("-5"), Some(-5));
    }
}
