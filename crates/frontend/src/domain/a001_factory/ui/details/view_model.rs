use contracts::domain::a001_factory::FactoryDto;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_factory::api;
use crate::shared::toast::{notify_error, notify_success};

#[derive(Clone, Copy)]
pub struct FactoryDetailsViewModel {
    pub form: RwSignal<FactoryDto>,
    pub error: RwSignal<Option<String>>,
    pub errors: RwSignal<Vec<FieldError>>,
    pub saving: RwSignal<bool>,
}

impl FactoryDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(FactoryDto::default()),
            error: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(id) = id else { return };
        let form = self.form;
        let error = self.error;
        spawn_local(async move {
            match api::fetch_by_id(&id).await {
                Ok(factory) => form.set(FactoryDto::from(&factory)),
                Err(e) => error.set(Some(format!("Ошибка загрузки: {}", e))),
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

        let saving = self.saving;
        let error = self.error;
        saving.set(true);
        spawn_local(async move {
            match api::save(&current).await {
                Ok(_) => {
                    notify_success(format!("Завод «{}» сохранён", current.description.trim()));
                    on_saved.run(());
                }
                Err(e) => {
                    error.set(Some(e.clone()));
                    notify_error(e);
                }
            }
            saving.set(false);
        });
    }
}

impl Default for FactoryDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
