use contracts::domain::a003_checklist_template::{ChecklistItem, ChecklistItemKind};
use contracts::domain::common::StatusWorkflow;
use contracts::domain::a005_work_order::WorkOrderStatus;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use thaw::*;

use super::view_model::WorkOrderDetailsViewModel;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::form_field::FormField;
use crate::shared::components::option_select::OptionSelect;
use crate::shared::components::status_badge::{status_color, work_order_caption, StatusActions};
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::icons::icon;
use crate::shared::lookup::{assignee_lookup, equipment_lookup, template_lookup};
use crate::system::auth::context::use_can_edit;

fn range_hint(kind: &ChecklistItemKind) -> String {
    match kind {
        ChecklistItemKind::Measurement { unit, min, max } => {
            let bounds = match (min, max) {
                (Some(lo), Some(hi)) => format!("{} … {}", lo, hi),
                (Some(lo), None) => format!("≥ {}", lo),
                (None, Some(hi)) => format!("≤ {}", hi),
                (None, None) => "без ограничений".to_string(),
            };
            format!("{} {}", bounds, unit).trim().to_string()
        }
        _ => String::new(),
    }
}

fn parse_value(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok()
}

/// Строка исполнения пункта чек-листа
#[component]
fn ResultRow(vm: WorkOrderDetailsViewModel, item: ChecklistItem) -> impl IntoView {
    let item_id = StoredValue::new(item.id.clone());
    let locked = move || !vm.can_record() || vm.busy.get();
    let passed = move || vm.result(&item_id.get_value()).passed;
    let set_passed = move |value: Option<bool>| {
        vm.update_result(&item_id.get_value(), |r| r.passed = value);
    };
    let hint = range_hint(&item.kind);
    let kind = item.kind.clone();

    let input = match item.kind {
        ChecklistItemKind::Check => view! {
            <div class="result-row__toggle">
                <button
                    class=move || if passed() == Some(true) { "button button--success" } else { "button button--secondary" }
                    disabled=locked
                    on:click=move |_| set_passed(if passed() == Some(true) { None } else { Some(true) })
                >
                    {icon("check")}" Норма"
                </button>
                <button
                    class=move || if passed() == Some(false) { "button button--danger" } else { "button button--secondary" }
                    disabled=locked
                    on:click=move |_| set_passed(if passed() == Some(false) { None } else { Some(false) })
                >
                    {icon("x")}" Отклонение"
                </button>
            </div>
        }
        .into_any(),
        ChecklistItemKind::Measurement { .. } => {
            let out_of_range = move || {
                vm.result(&item_id.get_value())
                    .value
                    .is_some_and(|v| !kind.is_within_range(v))
            };
            view! {
                <div class="result-row__measurement">
                    <input
                        type="text"
                        inputmode="decimal"
                        class="form-control"
                        disabled=locked
                        prop:value=move || vm.result(&item_id.get_value()).value.map(|v| v.to_string()).unwrap_or_default()
                        on:change=move |ev| {
                            let value = parse_value(&event_target_value(&ev));
                            vm.update_result(&item_id.get_value(), |r| r.value = value);
                        }
                    />
                    <span class="result-row__hint">{hint}</span>
                    <Show when=out_of_range>
                        <span class="text-danger">"вне допуска"</span>
                    </Show>
                </div>
            }
            .into_any()
        }
        ChecklistItemKind::Text => ().into_any(),
    };

    view! {
        <div class="result-row">
            <div class="result-row__title">
                <span>{format!("{}. {}", item.position, item.title)}</span>
                {item.required.then(|| view! { <span class="required">"*"</span> })}
                {(!item.instructions.is_empty()).then(|| view! {
                    <div class="result-row__instructions">{item.instructions.clone()}</div>
                })}
            </div>
            {input}
            <input
                type="text"
                class="form-control result-row__note"
                placeholder="Примечание"
                disabled=locked
                prop:value=move || vm.result(&item_id.get_value()).note.unwrap_or_default()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    vm.update_result(&item_id.get_value(), |r| {
                        r.note = if value.trim().is_empty() { None } else { Some(value) }
                    });
                }
            />
        </div>
    }
}

#[component]
pub fn WorkOrderDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = WorkOrderDetailsViewModel::new();
    vm.load_if_needed(id);
    let can_edit = use_can_edit();
    let errors: Signal<Vec<FieldError>> = vm.errors.into();
    let equipment = equipment_lookup();
    let templates = template_lookup(true);
    let assignees = assignee_lookup();

    let status = Signal::derive(move || vm.status());
    let template_items = move || {
        vm.template
            .with(|t| t.as_ref().map(|t| t.items.clone()).unwrap_or_default())
    };

    view! {
        <div class="details-container work-order-details">
            <div class="details-header">
                <h3>
                    {move || if vm.is_edit_mode() {
                        format!("Заказ-наряд {}", vm.form.with(|f| f.code.clone().unwrap_or_default()))
                    } else {
                        "Новый заказ-наряд".to_string()
                    }}
                </h3>
                <Show when=move || vm.is_edit_mode()>
                    <Space>
                        {move || {
                            let overdue = vm.is_overdue();
                            let color = if overdue { BadgeColor::Danger } else { status_color(status.get().as_str()) };
                            view! {
                                <Badge appearance=BadgeAppearance::Tint color=color>
                                    {work_order_caption(status.get(), overdue)}
                                </Badge>
                            }
                        }}
                        <StatusActions
                            current=status
                            on_change=Callback::new(move |next: WorkOrderStatus| vm.change_status_command(next))
                            disabled=Signal::derive(move || !can_edit.get() || vm.busy.get())
                        />
                    </Space>
                </Show>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="details-form details-form--two-columns">
                <FormField label="Наименование" field="description" errors=errors required=true>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.description.clone())
                        on:input=move |ev| vm.form.update(|f| f.description = event_target_value(&ev))
                    />
                </FormField>

                <FormField label="Оборудование" field="equipment_id" errors=errors required=true>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.equipment_id.clone()))
                        on_change=Callback::new(move |v| vm.form.update(|f| f.equipment_id = v))
                        options=Signal::derive(move || equipment.with(|l| l.options()))
                        placeholder="Выберите оборудование"
                        disabled=Signal::derive(move || vm.is_edit_mode())
                    />
                </FormField>

                <FormField label="Чек-лист" field="checklist_template_id" errors=errors required=true>
                    {move || if vm.is_edit_mode() {
                        let caption = vm.template.with(|t| {
                            t.as_ref().map(|t| t.display_name()).unwrap_or_else(|| "…".to_string())
                        });
                        view! { <div class="form-control form-control--readonly">{caption}</div> }.into_any()
                    } else {
                        view! {
                            <OptionSelect
                                value=Signal::derive(move || vm.form.with(|f| f.checklist_template_id.clone()))
                                on_change=Callback::new(move |v| vm.form.update(|f| f.checklist_template_id = v))
                                options=Signal::derive(move || templates.with(|l| l.options()))
                                placeholder="Выберите чек-лист"
                            />
                        }
                        .into_any()
                    }}
                </FormField>

                <FormField label="Плановая дата" field="planned_date" errors=errors required=true>
                    <DateInput
                        value=Signal::derive(move || vm.form.with(|f| f.planned_date))
                        on_change=Callback::new(move |d| vm.form.update(|f| f.planned_date = d))
                    />
                </FormField>

                <FormField label="Исполнитель" field="assignee_id" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.assignee_id.clone().unwrap_or_default()))
                        on_change=Callback::new(move |v: String| {
                            vm.form.update(|f| f.assignee_id = if v.is_empty() { None } else { Some(v) })
                        })
                        options=Signal::derive(move || assignees.with(|l| l.options()))
                        placeholder="Не назначен"
                    />
                </FormField>

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

            <Show when=move || vm.is_edit_mode()>
                <div class="work-order-details__timeline">
                    {move || vm.order.with(|o| o.as_ref().map(|o| view! {
                        <span>"Начат: "{format_datetime_opt(o.started_at.as_ref())}</span>
                        <span>"Выполнен: "{format_datetime_opt(o.completed_at.as_ref())}</span>
                        <span>"Закрыт: "{format_datetime_opt(o.closed_at.as_ref())}</span>
                    }))}
                </div>

                <div class="form-group work-order-execution">
                    <label>"Выполнение чек-листа"</label>
                    <Show when=move || vm.status() == WorkOrderStatus::New>
                        <div class="alert alert--info">"Переведите наряд в работу, чтобы вносить результаты."</div>
                    </Show>
                    <For
                        each=template_items
                        key=|item| item.id.clone()
                        children=move |item| view! { <ResultRow vm=vm item=item/> }
                    />
                    <Show when=move || vm.can_record()>
                        {move || {
                            let missing = vm.missing_required();
                            (!missing.is_empty()).then(|| view! {
                                <div class="alert alert--warning">
                                    {format!("Не заполнены обязательные пункты: {}", missing.join(", "))}
                                </div>
                            })
                        }}
                        <button
                            class="button button--primary"
                            disabled=move || !can_edit.get() || vm.busy.get() || !vm.results_dirty()
                            on:click=move |_| vm.save_results_command()
                        >
                            {icon("check")}" Сохранить результаты"
                        </button>
                    </Show>
                </div>
            </Show>

            <div class="details-actions">
                <button
                    class="button button--primary"
                    on:click=move |_| vm.save_command(on_saved)
                    disabled=move || !can_edit.get() || vm.busy.get()
                >
                    {icon("check")}
                    {move || if vm.is_edit_mode() { " Сохранить" } else { " Создать" }}
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    {icon("x")}
                    " Закрыть"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_hint() {
        let kind = ChecklistItemKind::Measurement {
            unit: "бар".into(),
            min: Some(2.0),
            max: Some(4.5),
        };
        assert_eq!(range_hint(&kind), "2 … 4.5 бар");
        let open = ChecklistItemKind::Measurement {
            unit: String::new(),
            min: None,
            max: Some(60.0),
        };
        assert_eq!(range_hint(&open), "≤ 60");
        assert_eq!(range_hint(&ChecklistItemKind::Check), "");
    }

    #[test]
    fn test_parse_value_accepts_comma() {
        assert_eq!(parse_value("3,25"), Some(3.25));
        assert_eq!(parse_value(""), None);
    }
}
