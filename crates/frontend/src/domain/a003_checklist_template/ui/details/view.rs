use contracts::domain::a003_checklist_template::{ChecklistItem, ChecklistItemKind, TemplateStatus};
use contracts::shared::validation::{error_for, FieldError};
use leptos::prelude::*;
use thaw::*;

use super::view_model::{kind_from_key, kind_key, parse_bound, ChecklistTemplateDetailsViewModel};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::form_field::FormField;
use crate::shared::components::status_badge::{StatusActions, StatusBadge};
use crate::shared::icons::icon;
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a003_checklist_template";

fn bound_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Строка редактора пункта чек-листа
#[component]
fn ItemEditor(vm: ChecklistTemplateDetailsViewModel, id: String) -> impl IntoView {
    let id = StoredValue::new(id);
    let read = move |f: fn(&ChecklistItem) -> String| {
        vm.item_field(&id.get_value(), f).unwrap_or_default()
    };
    let is_measurement = move || {
        vm.item_field(&id.get_value(), |i| {
            matches!(i.kind, ChecklistItemKind::Measurement { .. })
        })
        .unwrap_or(false)
    };
    let measurement = move || {
        vm.item_field(&id.get_value(), |i| match &i.kind {
            ChecklistItemKind::Measurement { unit, min, max } => (unit.clone(), *min, *max),
            _ => (String::new(), None, None),
        })
        .unwrap_or_default()
    };
    let set_measurement = move |unit: Option<String>, min: Option<Option<f64>>, max: Option<Option<f64>>| {
        vm.update_item(&id.get_value(), |item| {
            if let ChecklistItemKind::Measurement {
                unit: u,
                min: lo,
                max: hi,
            } = &mut item.kind
            {
                if let Some(v) = unit {
                    *u = v;
                }
                if let Some(v) = min {
                    *lo = v;
                }
                if let Some(v) = max {
                    *hi = v;
                }
            }
        });
    };

    view! {
        <div class="checklist-item-editor">
            <div class="checklist-item-editor__row">
                <span class="checklist-item-editor__number">
                    {move || format!("{}.", vm.item_number(&id.get_value()))}
                </span>
                <input
                    type="text"
                    class="form-control checklist-item-editor__title"
                    placeholder="Что проверить"
                    prop:value=move || read(|i| i.title.clone())
                    on:input=move |ev| {
                        let v = event_target_value(&ev);
                        vm.update_item(&id.get_value(), |i| i.title = v);
                    }
                />
                <select
                    class="form-select"
                    prop:value=move || read(|i| kind_key(&i.kind).to_string())
                    on:change=move |ev| {
                        let key = event_target_value(&ev);
                        vm.update_item(&id.get_value(), |i| i.kind = kind_from_key(&key, &i.kind));
                    }
                >
                    <option value="check">"Проверка"</option>
                    <option value="measurement">"Замер"</option>
                    <option value="text">"Текст"</option>
                </select>
                <label class="checklist-item-editor__required">
                    <input
                        type="checkbox"
                        prop:checked=move || vm.item_field(&id.get_value(), |i| i.required).unwrap_or(false)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            vm.update_item(&id.get_value(), |i| i.required = checked);
                        }
                    />
                    " обяз."
                </label>
                <button class="button button--icon" title="Выше" on:click=move |_| vm.move_item(&id.get_value(), true)>
                    {icon("arrow-up")}
                </button>
                <button class="button button--icon" title="Ниже" on:click=move |_| vm.move_item(&id.get_value(), false)>
                    {icon("arrow-down")}
                </button>
                <button class="button button--icon" title="Удалить пункт" on:click=move |_| vm.remove_item(&id.get_value())>
                    {icon("delete")}
                </button>
            </div>

            <Show when=is_measurement>
                <div class="checklist-item-editor__row checklist-item-editor__measurement">
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Ед. изм."
                        prop:value=move || measurement().0
                        on:input=move |ev| set_measurement(Some(event_target_value(&ev)), None, None)
                    />
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Мин."
                        prop:value=move || bound_text(measurement().1)
                        on:change=move |ev| set_measurement(None, Some(parse_bound(&event_target_value(&ev))), None)
                    />
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Макс."
                        prop:value=move || bound_text(measurement().2)
                        on:change=move |ev| set_measurement(None, None, Some(parse_bound(&event_target_value(&ev))))
                    />
                </div>
            </Show>

            <input
                type="text"
                class="form-control checklist-item-editor__instructions"
                placeholder="Инструкция для исполнителя (необязательно)"
                prop:value=move || read(|i| i.instructions.clone())
                on:input=move |ev| {
                    let v = event_target_value(&ev);
                    vm.update_item(&id.get_value(), |i| i.instructions = v);
                }
            />
        </div>
    }
}

#[component]
pub fn ChecklistTemplateDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let vm = ChecklistTemplateDetailsViewModel::new();
    vm.load_if_needed(id);
    let can_edit = use_can_edit();
    let errors: Signal<Vec<FieldError>> = vm.errors.into();

    let open_version = Callback::new(move |new_id: String| {
        let code = vm.form.with_untracked(|f| f.code.clone().unwrap_or_default());
        ctx.open_detail(AGGREGATE_KEY, Some(&new_id), &code);
    });
    let items_error = move || {
        errors.with(|errs| error_for(errs, "items").map(str::to_string))
    };

    view! {
        <div class="details-container checklist-template-details">
            <div class="details-header">
                <h3>
                    {move || if vm.is_edit_mode() {
                        format!(
                            "Шаблон {} · версия {}",
                            vm.form.with(|f| f.code.clone().unwrap_or_default()),
                            vm.version.get()
                        )
                    } else {
                        "Новый шаблон чек-листа".to_string()
                    }}
                </h3>
                <Show when=move || vm.is_edit_mode()>
                    <Space>
                        {move || view! { <StatusBadge status=vm.status.get()/> }}
                        <StatusActions
                            current=vm.status
                            on_change=Callback::new(move |next: TemplateStatus| vm.change_status_command(next))
                            disabled=Signal::derive(move || !can_edit.get() || vm.busy.get())
                        />
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            disabled=Signal::derive(move || !can_edit.get() || vm.busy.get())
                            on_click=move |_| vm.new_version_command(open_version)
                        >
                            "Новая версия"
                        </Button>
                    </Space>
                </Show>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <Show when=move || vm.will_create_version()>
                <div class="alert alert--info">
                    "Шаблон действует: изменённые пункты будут сохранены как новая версия, текущая версия не изменится."
                </div>
            </Show>

            <div class="details-form">
                <FormField label="Наименование" field="description" errors=errors required=true>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.description.clone())
                        on:input=move |ev| vm.form.update(|f| f.description = event_target_value(&ev))
                        placeholder="Например, Ежемесячный осмотр насоса"
                    />
                </FormField>

                <FormField label="Категория оборудования" field="equipment_category" errors=errors>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.equipment_category.clone())
                        on:input=move |ev| vm.form.update(|f| f.equipment_category = event_target_value(&ev))
                        placeholder="Пусто — подходит для любого оборудования"
                    />
                </FormField>

                <div class="form-group">
                    <label>"Пункты чек-листа"</label>
                    <div class="checklist-items">
                        <For
                            each=move || vm.item_ids()
                            key=|id| id.clone()
                            children=move |id| view! { <ItemEditor vm=vm id=id/> }
                        />
                    </div>
                    {move || items_error().map(|m| view! { <div class="field-error">{m}</div> })}
                    <button class="button button--secondary" on:click=move |_| vm.add_item()>
                        {icon("plus")}" Добавить пункт"
                    </button>
                </div>

                <FormField label="Комментарий" field="comment" errors=errors>
                    <textarea
                        class="form-control"
                        rows="2"
                        prop:value=move || vm.form.with(|f| f.comment.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            vm.form.update(|f| f.comment = if value.is_empty() { None } else { Some(value) });
                        }
                    />
                </FormField>
            </div>

            <div class="details-actions">
                <button
                    class="button button--primary"
                    on:click=move |_| vm.save_command(on_saved, open_version)
                    disabled=move || !can_edit.get() || vm.busy.get()
                >
                    {icon("check")}
                    {move || if vm.is_edit_mode() { " Сохранить" } else { " Создать" }}
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    {icon("x")}
                    " Отмена"
                </button>
            </div>
        </div>
    }
}
