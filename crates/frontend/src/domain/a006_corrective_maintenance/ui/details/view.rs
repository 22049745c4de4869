use contracts::domain::a006_corrective_maintenance::aggregate::{IncidentStatus, Priority};
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use thaw::*;

use super::view_model::{parse_downtime, IncidentDetailsViewModel};
use crate::shared::components::form_field::FormField;
use crate::shared::components::option_select::{enum_options, OptionSelect};
use crate::shared::components::status_badge::{PriorityBadge, StatusActions, StatusBadge};
use crate::shared::date_utils::{format_datetime, format_datetime_opt, format_minutes};
use crate::shared::icons::icon;
use crate::shared::lookup::{assignee_lookup, equipment_lookup};
use crate::system::auth::context::use_can_edit;

#[component]
pub fn IncidentDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = IncidentDetailsViewModel::new();
    vm.load_if_needed(id);
    let can_edit = use_can_edit();
    let errors: Signal<Vec<FieldError>> = vm.errors.into();
    let equipment = equipment_lookup();
    let assignees = assignee_lookup();

    let status = Signal::derive(move || vm.status());
    let priority_options =
        Signal::derive(|| enum_options(Priority::all(), Priority::as_str, Priority::label));
    let downtime_caption = move || {
        vm.incident.with(|i| {
            i.as_ref()
                .and_then(|i| i.effective_downtime())
                .map(format_minutes)
                .unwrap_or_else(|| "—".to_string())
        })
    };

    view! {
        <div class="details-container incident-details">
            <div class="details-header">
                <h3>
                    {move || if vm.is_edit_mode() {
                        format!("Инцидент {}", vm.form.with(|f| f.code.clone().unwrap_or_default()))
                    } else {
                        "Регистрация инцидента".to_string()
                    }}
                </h3>
                <Show when=move || vm.is_edit_mode()>
                    <Space>
                        {move || view! { <PriorityBadge priority=vm.form.with(|f| f.priority)/> }}
                        {move || view! { <StatusBadge status=status.get()/> }}
                        <StatusActions
                            current=status
                            on_change=Callback::new(move |next: IncidentStatus| vm.change_status_command(next))
                            disabled=Signal::derive(move || !can_edit.get() || vm.busy.get())
                        />
                    </Space>
                </Show>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="details-form details-form--two-columns">
                <FormField label="Описание" field="description" errors=errors required=true>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.description.clone())
                        on:input=move |ev| vm.form.update(|f| f.description = event_target_value(&ev))
                        placeholder="Что случилось"
                    />
                </FormField>

                <FormField label="Оборудование" field="equipment_id" errors=errors required=true>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.equipment_id.clone()))
                        on_change=Callback::new(move |v| vm.form.update(|f| f.equipment_id = v))
                        options=Signal::derive(move || equipment.with(|l| l.options()))
                        placeholder="Выберите оборудование"
                    />
                </FormField>

                <FormField label="Приоритет" field="priority" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.priority.as_str().to_string()))
                        on_change=Callback::new(move |v: String| {
                            if let Some(p) = Priority::parse(&v) {
                                vm.form.update(|f| f.priority = p);
                            }
                        })
                        options=priority_options
                    />
                </FormField>

                <FormField label="Ответственный" field="assigned_to" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.assigned_to.clone().unwrap_or_default()))
                        on_change=Callback::new(move |v: String| {
                            vm.form.update(|f| f.assigned_to = if v.is_empty() { None } else { Some(v) })
                        })
                        options=Signal::derive(move || assignees.with(|l| l.options()))
                        placeholder="Не назначен"
                    />
                </FormField>
            </div>

            <div class="details-form">
                <FormField label="Подробности" field="details" errors=errors>
                    <textarea
                        class="form-control"
                        rows="3"
                        prop:value=move || vm.form.with(|f| f.details.clone())
                        on:input=move |ev| vm.form.update(|f| f.details = event_target_value(&ev))
                    />
                </FormField>

                <Show when=move || vm.is_edit_mode()>
                    <FormField label="Причина" field="root_cause" errors=errors>
                        <textarea
                            class="form-control"
                            rows="2"
                            prop:value=move || vm.form.with(|f| f.root_cause.clone())
                            on:input=move |ev| vm.form.update(|f| f.root_cause = event_target_value(&ev))
                        />
                    </FormField>

                    <FormField label="Выполненные работы" field="action_taken" errors=errors>
                        <textarea
                            class="form-control"
                            rows="2"
                            prop:value=move || vm.form.with(|f| f.action_taken.clone())
                            on:input=move |ev| vm.form.update(|f| f.action_taken = event_target_value(&ev))
                            placeholder="Обязательно для перевода в «Устранён»"
                        />
                    </FormField>

                    <FormField label="Простой, мин" field="downtime_minutes" errors=errors>
                        <input
                            type="number"
                            min="0"
                            class="form-control"
                            placeholder="Рассчитывается по времени работ"
                            prop:value=move || vm.form.with(|f| f.downtime_minutes.map(|m| m.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let value = parse_downtime(&event_target_value(&ev));
                                vm.form.update(|f| f.downtime_minutes = value);
                            }
                        />
                    </FormField>

                    <div class="incident-details__timeline">
                        {move || vm.incident.with(|i| i.as_ref().map(|i| view! {
                            <span>"Зарегистрирован: "{format_datetime(&i.reported_at)}" ("{i.reported_by.clone()}")"</span>
                            <span>"Начало работ: "{format_datetime_opt(i.started_at.as_ref())}</span>
                            <span>"Устранён: "{format_datetime_opt(i.resolved_at.as_ref())}</span>
                            <span>"Закрыт: "{format_datetime_opt(i.closed_at.as_ref())}</span>
                        }))}
                        <span>"Простой: "{downtime_caption}</span>
                    </div>
                </Show>

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
                    on:click=move |_| vm.save_command(on_saved)
                    disabled=move || !can_edit.get() || vm.busy.get()
                >
                    {icon("check")}
                    {move || if vm.is_edit_mode() { " Сохранить" } else { " Зарегистрировать" }}
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    {icon("x")}
                    " Отмена"
                </button>
            </div>
        </div>
    }
}
