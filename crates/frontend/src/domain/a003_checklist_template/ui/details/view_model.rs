use contracts::domain::a003_checklist_template::{
    ChecklistItem, ChecklistItemKind, ChecklistTemplateDto, TemplateStatus,
};
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a003_checklist_template::api;
use crate::shared::toast::{notify_error, notify_success};

#[derive(Clone, Copy)]
pub struct ChecklistTemplateDetailsViewModel {
    pub form: RwSignal<ChecklistTemplateDto>,
    pub status: RwSignal<TemplateStatus>,
    pub version: RwSignal<i32>,
    /// Пункты на момент загрузки
    pub loaded_items: RwSignal<Vec<ChecklistItem>>,
    pub error: RwSignal<Option<String>>,
    pub errors: RwSignal<Vec<FieldError>>,
    pub busy: RwSignal<bool>,
}

impl ChecklistTemplateDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(ChecklistTemplateDto::default()),
            status: RwSignal::new(TemplateStatus::Draft),
            version: RwSignal::new(1),
            loaded_items: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            errors: RwSignal::new(Vec::new()),
            busy: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    /// Сохранение создаст новую версию (действующий шаблон, пункты изменены)
    pub fn will_create_version(&self) -> bool {
        self.status.get() == TemplateStatus::Active
            && self.form.with(|f| self.loaded_items.with(|loaded| f.items != *loaded))
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        match id {
            Some(id) => self.load(id),
            None => self
                .form
                .update(|f| f.items.push(ChecklistItem::new("", ChecklistItemKind::Check))),
        }
    }

    fn load(&self, id: String) {
        let vm = *self;
        spawn_local(async move {
            match api::fetch_by_id(&id).await {
                Ok(t) => {
                    vm.status.set(t.status);
                    vm.version.set(t.version);
                    vm.loaded_items.set(t.items.clone());
                    vm.form.set(ChecklistTemplateDto::from(&t));
                }
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    pub fn add_item(&self) {
        self.form.update(|f| add_item(&mut f.items));
    }

    pub fn item_ids(&self) -> Vec<String> {
        self.form.with(|f| f.items.iter().map(|i| i.id.clone()).collect())
    }

    /// Номер пункта (с единицы) по текущему порядку
    pub fn item_number(&self, id: &str) -> usize {
        self.form
            .with(|f| f.items.iter().position(|i| i.id == id))
            .map(|p| p + 1)
            .unwrap_or(0)
    }

    pub fn item_field<T>(&self, id: &str, read: impl FnOnce(&ChecklistItem) -> T) -> Option<T> {
        self.form.with(|f| f.items.iter().find(|i| i.id == id).map(read))
    }

    pub fn remove_item(&self, id: &str) {
        self.form.update(|f| {
            if let Some(index) = f.items.iter().position(|i| i.id == id) {
                remove_item(&mut f.items, index);
            }
        });
    }

    pub fn move_item(&self, id: &str, up: bool) {
        self.form.update(|f| {
            if let Some(index) = f.items.iter().position(|i| i.id == id) {
                move_item(&mut f.items, index, up);
            }
        });
    }

    pub fn update_item(&self, id: &str, apply: impl FnOnce(&mut ChecklistItem)) {
        self.form.update(|f| {
            if let Some(item) = f.items.iter_mut().find(|i| i.id == id) {
                apply(item);
            }
        });
    }

    /// `on_version_created` получает id новой версии, если сервер сохранил правку отдельной версией
    pub fn save_command(&self, on_saved: Callback<()>, on_version_created: Callback<String>) {
        let mut current = self.form.get_untracked();
        renumber(&mut current.items);
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
                Ok(id) => match current.id.as_deref() {
                    Some(old) if old != id => {
                        notify_success("Изменения сохранены как новая версия шаблона");
                        on_version_created.run(id);
                        on_saved.run(());
                    }
                    _ => {
                        notify_success(format!("Шаблон «{}» сохранён", current.description.trim()));
                        on_saved.run(());
                    }
                },
                Err(e) => {
                    vm.error.set(Some(e.clone()));
                    notify_error(e);
                }
            }
            vm.busy.set(false);
        });
    }

    pub fn change_status_command(&self, next: TemplateStatus) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            match api::change_status(&id, next).await {
                Ok(t) => {
                    vm.status.set(t.status);
                    notify_success(format!("Статус шаблона: {}", t.status.label()));
                }
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }

    pub fn new_version_command(&self, on_created: Callback<String>) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let vm = *self;
        vm.busy.set(true);
        spawn_local(async move {
            match api::new_version(&id).await {
                Ok(new_id) => {
                    notify_success("Создан черновик новой версии");
                    on_created.run(new_id);
                }
                Err(e) => notify_error(e),
            }
            vm.busy.set(false);
        });
    }
}

impl Default for ChecklistTemplateDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Ключ типа пункта для `<select>`
pub fn kind_key(kind: &ChecklistItemKind) -> &'static str {
    match kind {
        ChecklistItemKind::Check => "check",
        ChecklistItemKind::Measurement { .. } => "measurement",
        ChecklistItemKind::Text => "text",
    }
}

/// Смена типа; параметры замера сохраняются, если тип не меняется
pub fn kind_from_key(key: &str, previous: &ChecklistItemKind) -> ChecklistItemKind {
    match key {
        "measurement" => match previous {
            ChecklistItemKind::Measurement { .. } => previous.clone(),
            _ => ChecklistItemKind::Measurement {
                unit: String::new(),
                min: None,
                max: None,
            },
        },
        "text" => ChecklistItemKind::Text,
        _ => ChecklistItemKind::Check,
    }
}

/// Разбор границы замера: пусто значит без ограничения, запятая допустима
pub fn parse_bound(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok()
}

fn renumber(items: &mut [ChecklistItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.position = i as u32 + 1;
    }
}

fn add_item(items: &mut Vec<ChecklistItem>) {
    items.push(ChecklistItem::new("", ChecklistItemKind::Check));
    renumber(items);
}

fn remove_item(items: &mut Vec<ChecklistItem>, index: usize) {
    if index < items.len() {
        items.remove(index);
        renumber(items);
    }
}

fn move_item(items: &mut [ChecklistItem], index: usize, up: bool) {
    let target = if up { index.checked_sub(1) } else { Some(index + 1) };
    if let Some(target) = target.filter(|t| *t < items.len()) {
        if index < items.len() {
            items.swap(index, target);
            renumber(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(titles: &[&str]) -> Vec<ChecklistItem> {
        let mut v: Vec<_> = titles
            .iter()
            .map(|t| ChecklistItem::new(t, ChecklistItemKind::Check))
            .collect();
        renumber(&mut v);
        v
    }

    fn titles(items: &[ChecklistItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_move_item_swaps_and_renumbers() {
        let mut v = items(&["a", "b", "c"]);
        move_item(&mut v, 2, true);
        assert_eq!(titles(&v), vec!["a", "c", "b"]);
        assert_eq!(v[1].position, 2);

        move_item(&mut v, 0, true);
        assert_eq!(titles(&v), vec!["a", "c", "b"]);
        move_item(&mut v, 2, false);
        assert_eq!(titles(&v), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_add_and_remove() {
        let mut v = items(&["a", "b"]);
        add_item(&mut v);
        assert_eq!(v.len(), 3);
        assert_eq!(v[2].position, 3);
        remove_item(&mut v, 0);
        assert_eq!(titles(&v), vec!["b", ""]);
        assert_eq!(v[0].position, 1);
        remove_item(&mut v, 10);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_kind_switch_keeps_measurement_params() {
        let m = ChecklistItemKind::Measurement {
            unit: "°C".into(),
            min: Some(10.0),
            max: Some(60.0),
        };
        assert_eq!(kind_from_key("measurement", &m), m);
        assert_eq!(kind_from_key("text", &m), ChecklistItemKind::Text);
        assert_eq!(kind_key(&kind_from_key("measurement", &ChecklistItemKind::Check)), "measurement");
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound("1,5"), Some(1.5));
        assert_eq!(parse_bound(" 40 "), Some(40.0));
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("abc"), None);
    }
}
