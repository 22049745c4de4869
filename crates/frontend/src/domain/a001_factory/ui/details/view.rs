use contracts::domain::a001_factory::FactoryStatus;
use contracts::domain::common::StatusWorkflow;
use contracts::shared::validation::FieldError;
use leptos::prelude::*;

use super::view_model::FactoryDetailsViewModel;
use crate::shared::components::form_field::FormField;
use crate::shared::components::option_select::{enum_options, OptionSelect};
use crate::shared::icons::icon;
use crate::system::auth::context::use_can_edit;

#[component]
pub fn FactoryDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = FactoryDetailsViewModel::new();
    vm.load_if_needed(id);
    let can_edit = use_can_edit();
    let errors: Signal<Vec<FieldError>> = vm.errors.into();

    let status_options = Signal::derive(|| {
        enum_options(FactoryStatus::all(), FactoryStatus::as_str, FactoryStatus::label)
    });

    view! {
        <div class="details-container factory-details">
            <div class="details-header">
                <h3>
                    {move || if vm.is_edit_mode() {
                        format!("Завод {}", vm.form.with(|f| f.code.clone().unwrap_or_default()))
                    } else {
                        "Новый завод".to_string()
                    }}
                </h3>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="details-form">
                <FormField label="Наименование" field="description" errors=errors required=true>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.description.clone())
                        on:input=move |ev| vm.form.update(|f| f.description = event_target_value(&ev))
                        placeholder="Например, Завод №1"
                    />
                </FormField>

                <FormField label="Адрес" field="address" errors=errors>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.address.clone())
                        on:input=move |ev| vm.form.update(|f| f.address = event_target_value(&ev))
                    />
                </FormField>

                <FormField label="Руководитель" field="manager_name" errors=errors>
                    <input
                        type="text"
                        class="form-control"
                        prop:value=move || vm.form.with(|f| f.manager_name.clone())
                        on:input=move |ev| vm.form.update(|f| f.manager_name = event_target_value(&ev))
                    />
                </FormField>

                <FormField label="Статус" field="status" errors=errors>
                    <OptionSelect
                        value=Signal::derive(move || vm.form.with(|f| f.status.as_str().to_string()))
                        on_change=Callback::new(move |v: String| {
                            if let Some(status) = FactoryStatus::parse(&v) {
                                vm.form.update(|f| f.status = status);
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
