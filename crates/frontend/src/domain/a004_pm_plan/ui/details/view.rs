use contracts::domain::a002_equipment::Equipment;
use contracts::domain::a004_pm_plan::{Frequency, PlanStatus};
use contracts::domain::common::AggregateId;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::view_model::PmPlanDetailsViewModel;
use crate::domain::a002_equipment;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::form_field::FormField;
use crate::shared::components::option_select::{enum_options, OptionSelect};
use crate::shared::components::status_badge::{StatusActions, StatusBadge};
use crate::shared::icons::icon;
use crate::shared::lookup::{factory_lookup, template_lookup};
use crate::system::auth::context::use_can_edit;

fn equipment_label(e: &Equipment) -> String {
    format!("{} · {}", e.base.code, e.base.description)
}

#[component]
pub fn PmPlanDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = PmPlanDetailsViewModel::new();
    vm.load_if_needed(id);
    let can_edit = use_can_edit();
    let errors: Signal<Vec<FieldError>> = vm.errors.into();
    let factories = factory_lookup();
    let templates = template_lookup(true);
    let template_options = Signal::derive(move || templates.with(|l| l.options()));

    // Оборудование выбранного завода
    let factory_equipment = RwSignal::new(Vec::<Equipment>::new());
    let factory_id = Memo::new(move |_| vm.form.with(|f| f.factory_id.clone()));
    Effect::new(move |_| {
        let factory_id = factory_id.get();
        if factory_id.is_empty() {
            factory_equipment.set(Vec::new());
            return;
        }
        spawn_local(async move {
            match a002_equipment::api::fetch_all(Some(&factory_id)).await {
                Ok(list) => factory_equipment.set(list),
                Err(e) => log::warn!("equipment for factory {}: {}", factory_id, e),
            }
        });
    });
    let equipment_name = move |id: &str| {
        factory_equipment.with(|list| {
            list.iter()
                .find(|e| e.base.id.as_string() == id)
                .map(equipment_label)
                .unwrap_or_else(|| id.to_string())
        })
    };
    let addable = Signal::derive(move || {
        let in_plan = vm.item_ids();
        factory_equipment.with(|list| {
            list.iter()
                .filter(|e| !in_plan.contains(&e.base.id.as_string()))
                .map(|e| (e.base.id.as_string(), equipment_label(e)))
                .collect::<Vec<_>>()
        })
    });
    let to_add = RwSignal::new(String::new());

    let frequency_options =
        Signal::derive(|| enum_options(Frequency::all(), Frequency::as_str, Frequency::label));

    view! {
        <div class="details-container pm-plan-details">
            <div class="details-header">
                <h3>
                    {move || if vm.is_edit_mode() {
                        format!("План ТО {}", vm.form.with(|f| f.code.clone().unwrap_or_default()))
                    } else {
                        "Новый план ТО".to_string()
                    }}
                </h3>
                <Show when=move || vm.is_edit_mode()>
                    <Space>
                        {move || view! { <StatusBadge status=vm.status.get()/> }}
                        <StatusActions
                            current=vm.status
                            on_change=Callback::new(move |next: PlanStatus| vm.change_status_command(next))
                            disabled=Signal::derive(move || !can_edit.get() || vm.busy.get())
                        />
                        <Show when=move || vm.is_active()>
                            <Button
                                size=ButtonSize::Small
                                appearance=ButtonAppearance::Primary
                                disabled=Signal::derive(move || !can_edit.get() || vm.busy.get())
                                on_click=move |_| vm.generate_command()
                            >
                                {icon("play")}" Сгенерировать наряды"
                            </Button>
                        </Show>
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

                <FormField label="Завод" field="factory_id" errors=errors required=true>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.factory_id.clone()))
                        on_change=Callback::new(move |v| vm.form.update(|f| f.factory_id = v))
                        options=Signal::derive(move || factories.with(|l| l.options()))
                        placeholder="Выберите завод"
                        disabled=Signal::derive(move || vm.form.with(|f| !f.items.is_empty()))
                    />
                </FormField>

                <FormField label="Периодичность" field="frequency" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.frequency.as_str().to_string()))
                        on_change=Callback::new(move |v: String| {
                            if let Some(freq) = Frequency::parse(&v) {
                                vm.form.update(|f| f.frequency = freq);
                            }
                        })
                        options=frequency_options
                    />
                </FormField>

                <FormField label="Дата начала" field="start_date" errors=errors required=true>
                    <DateInput
                        value=Signal::derive(move || vm.form.with(|f| f.start_date))
                        on_change=Callback::new(move |d| vm.form.update(|f| f.start_date = d))
                    />
                </FormField>

                <FormField label="Дата окончания" field="end_date" errors=errors>
                    <DateInput
                        value=Signal::derive(move || vm.form.with(|f| f.end_date))
                        on_change=Callback::new(move |d| vm.form.update(|f| f.end_date = d))
                    />
                </FormField>

                <FormField label="Чек-лист по умолчанию" field="default_checklist_id" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.default_checklist_id.clone().unwrap_or_default()))
                        on_change=Callback::new(move |v: String| {
                            vm.form.update(|f| f.default_checklist_id = if v.is_empty() { None } else { Some(v) })
                        })
                        options=template_options
                        placeholder="Не задан"
                    />
                </FormField>

                <FormField label="Плановая дата по умолчанию" field="default_planned_date" errors=errors>
                    <DateInput
                        value=Signal::derive(move || vm.form.with(|f| f.default_planned_date))
                        on_change=Callback::new(move |d| vm.form.update(|f| f.default_planned_date = d))
                    />
                </FormField>
            </div>

            <div class="form-group">
                <label>"Оборудование в плане"</label>
                <table class="table__data plan-items">
                    <thead>
                        <tr>
                            <th>"Оборудование"</th>
                            <th>"Чек-лист"</th>
                            <th>"Плановая дата"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || vm.item_ids()
                            key=|id| id.clone()
                            children=move |equipment_id| {
                                let eid = StoredValue::new(equipment_id);
                                view! {
                                    <tr>
                                        <td>{move || equipment_name(&eid.get_value())}</td>
                                        <td>
                                            <OptionSelect
                                                value=Signal::derive(move || {
                                                    vm.item(&eid.get_value(), |i| i.checklist_template_id.clone().unwrap_or_default())
                                                        .unwrap_or_default()
                                                })
                                                on_change=Callback::new(move |v: String| {
                                                    vm.update_item(&eid.get_value(), |i| {
                                                        i.checklist_template_id = if v.is_empty() { None } else { Some(v) }
                                                    })
                                                })
                                                options=template_options
                                                placeholder="—"
                                            />
                                        </td>
                                        <td>
                                            <DateInput
                                                value=Signal::derive(move || vm.item(&eid.get_value(), |i| i.planned_date).flatten())
                                                on_change=Callback::new(move |d| vm.update_item(&eid.get_value(), |i| i.planned_date = d))
                                            />
                                        </td>
                                        <td>
                                            <button
                                                class="button button--icon"
                                                title="Убрать из плана"
                                                on:click=move |_| vm.remove_equipment(&eid.get_value())
                                            >
                                                {icon("delete")}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                {move || vm.form.with(|f| f.items.is_empty()).then(|| view! {
                    <div class="empty-state">"Оборудование не добавлено"</div>
                })}
                <div class="plan-items__toolbar">
                    <OptionSelect
                        value=to_add
                        on_change=Callback::new(move |v| to_add.set(v))
                        options=addable
                        placeholder="Добавить оборудование..."
                    />
                    <button
                        class="button button--secondary"
                        disabled=move || to_add.with(|v| v.is_empty())
                        on:click=move |_| {
                            vm.add_equipment(&to_add.get_untracked());
                            to_add.set(String::new());
                        }
                    >
                        {icon("plus")}" Добавить"
                    </button>
                    <button
                        class="button button--secondary"
                        title="Заполнить пустые чек-листы и даты значениями по умолчанию"
                        on:click=move |_| vm.apply_defaults()
                    >
                        "Заполнить по умолчанию"
                    </button>
                </div>
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
                    " Отмена"
                </button>
            </div>
        </div>
    }
}
