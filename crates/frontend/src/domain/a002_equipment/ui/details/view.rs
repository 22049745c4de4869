use contracts::domain::a002_equipment::{Criticality, EquipmentDto, EquipmentStatus};
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;

use super::view_model::EquipmentDetailsViewModel;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::form_field::FormField;
use crate::shared::components::option_select::{enum_options, OptionSelect};
use crate::shared::icons::icon;
use crate::shared::lookup::factory_lookup;
use crate::system::auth::context::use_can_edit;

/// Текстовое поле формы, привязанное к строковому полю DTO
#[component]
fn TextInput(
    vm: EquipmentDetailsViewModel,
    get: fn(&EquipmentDto) -> &String,
    set: fn(&mut EquipmentDto, String),
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    view! {
        <input
            type="text"
            class="form-control"
            placeholder=placeholder
            prop:value=move || vm.form.with(|f| get(f).clone())
            on:input=move |ev| vm.form.update(|f| set(f, event_target_value(&ev)))
        />
    }
}

#[component]
pub fn EquipmentDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = EquipmentDetailsViewModel::new();
    vm.load_if_needed(id);
    let can_edit = use_can_edit();
    let errors: Signal<Vec<FieldError>> = vm.errors.into();
    let factories = factory_lookup();

    let criticality_options = Signal::derive(|| {
        enum_options(Criticality::all(), Criticality::as_str, Criticality::label)
    });
    let status_options = Signal::derive(move || {
        vm.status_choices()
            .into_iter()
            .map(|s| (s.as_str().to_string(), s.label().to_string()))
            .collect::<Vec<_>>()
    });

    view! {
        <div class="details-container equipment-details">
            <div class="details-header">
                <h3>
                    {move || if vm.is_edit_mode() {
                        format!("Оборудование {}", vm.form.with(|f| f.code.clone().unwrap_or_default()))
                    } else {
                        "Новое оборудование".to_string()
                    }}
                </h3>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="details-form details-form--two-columns">
                <FormField label="Наименование" field="description" errors=errors required=true>
                    <TextInput vm=vm get=|f| &f.description set=|f, v| f.description = v placeholder="Например, Насос циркуляционный"/>
                </FormField>

                <FormField label="Завод" field="factory_id" errors=errors required=true>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.factory_id.clone()))
                        on_change=Callback::new(move |v| vm.form.update(|f| f.factory_id = v))
                        options=Signal::derive(move || factories.with(|l| l.options()))
                        placeholder="Выберите завод"
                    />
                </FormField>

                <FormField label="Категория" field="category" errors=errors required=true>
                    <TextInput vm=vm get=|f| &f.category set=|f, v| f.category = v placeholder="Насос, компрессор, станок..."/>
                </FormField>

                <FormField label="Производитель" field="manufacturer" errors=errors>
                    <TextInput vm=vm get=|f| &f.manufacturer set=|f, v| f.manufacturer = v/>
                </FormField>

                <FormField label="Модель" field="model" errors=errors>
                    <TextInput vm=vm get=|f| &f.model set=|f, v| f.model = v/>
                </FormField>

                <FormField label="Серийный номер" field="serial_number" errors=errors>
                    <TextInput vm=vm get=|f| &f.serial_number set=|f, v| f.serial_number = v/>
                </FormField>

                <FormField label="Место установки" field="location" errors=errors>
                    <TextInput vm=vm get=|f| &f.location set=|f, v| f.location = v placeholder="Цех, участок"/>
                </FormField>

                <FormField label="Дата ввода в эксплуатацию" field="install_date" errors=errors>
                    <DateInput
                        value=Signal::derive(move || vm.form.with(|f| f.install_date))
                        on_change=Callback::new(move |d| vm.form.update(|f| f.install_date = d))
                    />
                </FormField>

                <FormField label="Критичность" field="criticality" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.criticality.as_str().to_string()))
                        on_change=Callback::new(move |v: String| {
                            if let Some(c) = Criticality::parse(&v) {
                                vm.form.update(|f| f.criticality = c);
                            }
                        })
                        options=criticality_options
                    />
                </FormField>

                <FormField label="Статус" field="status" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.status.as_str().to_string()))
                        on_change=Callback::new(move |v: String| {
                            if let Some(s) = EquipmentStatus::parse(&v) {
                                vm.form.update(|f| f.status = s);
                            }
                        })
                        options=status_options
                    />
                </FormField>

                <FormField label="Комментарий" field="comment" errors=errors>
                    <textarea
                        class="form-control"
                        rows="3"
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
                    disabled=move || !can_edit.get() || vm.saving.get()
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
