//! Мастер создания плана ТО.
//!
//! Состояние целиком живёт в `PmPlanDraft`; страница только показывает
//! текущий шаг и передаёт правки в черновик.

use contracts::domain::a002_equipment::Equipment;
use contracts::domain::a004_pm_plan::Frequency;
use contracts::shared::validation::FieldError;
use contracts::usecases::u100_pm_plan_wizard::{PmPlanDraft, WizardEquipmentRow, WizardStep};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::{a002_equipment, a004_pm_plan};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::form_field::FormField;
use crate::shared::components::option_select::{enum_options, OptionSelect};
use crate::shared::icons::icon;
use crate::shared::lookup::{factory_lookup, template_lookup};
use crate::shared::toast::{notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const TAB_KEY: &str = "u100_pm_plan_wizard";

fn step_class(step: WizardStep, current: WizardStep, passed: bool) -> &'static str {
    if step == current {
        "wizard-step wizard-step--active"
    } else if step < current && passed {
        "wizard-step wizard-step--done"
    } else {
        "wizard-step"
    }
}

/// Сообщения ошибок без привязки к полю формы (например, по строкам оборудования)
fn row_messages(errors: &[FieldError]) -> Vec<String> {
    errors
        .iter()
        .filter(|e| e.field == "rows")
        .map(|e| e.message.clone())
        .collect()
}

#[component]
fn MetadataStep(draft: RwSignal<PmPlanDraft>, errors: Signal<Vec<FieldError>>) -> impl IntoView {
    let factories = factory_lookup();
    view! {
        <div class="details-form">
            <FormField label="Наименование плана" field="name" errors=errors required=true>
                <input
                    type="text"
                    class="form-control"
                    placeholder="Например, Ежемесячный осмотр насосов"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                />
            </FormField>
            <FormField label="Завод" field="factory_id" errors=errors required=true>
                <OptionSelect
                    value=Signal::derive(move || draft.with(|d| d.factory_id.clone()))
                    on_change=Callback::new(move |v: String| draft.update(|d| d.set_factory(&v)))
                    options=Signal::derive(move || factories.with(|l| l.options()))
                    placeholder="Выберите завод"
                />
            </FormField>
            <FormField label="Комментарий" field="comment" errors=errors>
                <textarea
                    class="form-control"
                    rows="2"
                    prop:value=move || draft.with(|d| d.comment.clone())
                    on:input=move |ev| draft.update(|d| d.comment = event_target_value(&ev))
                />
            </FormField>
        </div>
    }
}

#[component]
fn SchedulingStep(
    draft: RwSignal<PmPlanDraft>,
    errors: Signal<Vec<FieldError>>,
    template_options: Signal<Vec<(String, String)>>,
) -> impl IntoView {
    let frequency_options =
        Signal::derive(|| enum_options(Frequency::all(), Frequency::as_str, Frequency::label));
    view! {
        <div class="details-form details-form--two-columns">
            <FormField label="Периодичность" field="frequency" errors=errors required=true>
                <OptionSelect
                    value=Signal::derive(move || {
                        draft.with(|d| d.frequency.map(|f| f.as_str().to_string()).unwrap_or_default())
                    })
                    on_change=Callback::new(move |v: String| draft.update(|d| d.frequency = Frequency::parse(&v)))
                    options=frequency_options
                    placeholder="Выберите периодичность"
                />
            </FormField>
            <FormField label="Дата начала" field="start_date" errors=errors required=true>
                <DateInput
                    value=Signal::derive(move || draft.with(|d| d.start_date))
                    on_change=Callback::new(move |v| draft.update(|d| d.start_date = v))
                />
            </FormField>
            <FormField label="Дата окончания" field="end_date" errors=errors>
                <DateInput
                    value=Signal::derive(move || draft.with(|d| d.end_date))
                    on_change=Callback::new(move |v| draft.update(|d| d.end_date = v))
                />
            </FormField>
            <FormField label="Чек-лист по умолчанию" field="default_checklist_id" errors=errors>
                <OptionSelect
                    value=Signal::derive(move || draft.with(|d| d.default_checklist_id.clone().unwrap_or_default()))
                    on_change=Callback::new(move |v: String| {
                        draft.update(|d| d.default_checklist_id = Some(v).filter(|v| !v.is_empty()))
                    })
                    options=template_options
                    placeholder="Не задан"
                />
            </FormField>
            <FormField label="Плановая дата по умолчанию" field="default_planned_date" errors=errors>
                <DateInput
                    value=Signal::derive(move || draft.with(|d| d.default_planned_date))
                    on_change=Callback::new(move |v| draft.update(|d| d.default_planned_date = v))
                />
            </FormField>
        </div>
    }
}

#[component]
fn EquipmentStep(draft: RwSignal<PmPlanDraft>, available: RwSignal<Vec<Equipment>>) -> impl IntoView {
    let select_all = move |_| {
        let rows: Vec<WizardEquipmentRow> =
            available.with_untracked(|list| list.iter().map(WizardEquipmentRow::from_equipment).collect());
        draft.update(|d| {
            for row in rows {
                d.add_equipment(row);
            }
        });
    };

    view! {
        <div class="wizard-equipment">
            <div class="wizard-equipment__toolbar">
                <span>{move || format!("Выбрано: {} из {}", draft.with(|d| d.rows.len()), available.with(|a| a.len()))}</span>
                <button class="button button--secondary" on:click=select_all>"Выбрать всё"</button>
            </div>
            <Show
                when=move || available.with(|a| !a.is_empty())
                fallback=|| view! { <div class="empty-state">"У завода нет оборудования"</div> }
            >
                <table class="table__data">
                    <thead>
                        <tr>
                            <th></th>
                            <th>"Код"</th>
                            <th>"Наименование"</th>
                            <th>"Категория"</th>
                            <th>"Место"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || available.get()
                            key=|e| e.base.id.value()
                            children=move |e: Equipment| {
                                let row = StoredValue::new(WizardEquipmentRow::from_equipment(&e));
                                let id = row.with_value(|r| r.equipment_id.clone());
                                view! {
                                    <tr>
                                        <td>
                                            <input
                                                type="checkbox"
                                                prop:checked=move || draft.with(|d| d.contains(&id))
                                                on:change=move |_| draft.update(|d| d.toggle_equipment(row.get_value()))
                                            />
                                        </td>
                                        <td>{e.base.code.clone()}</td>
                                        <td>{e.base.description.clone()}</td>
                                        <td>{e.category.clone()}</td>
                                        <td>{e.location.clone()}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </div>
    }
}

#[component]
fn ReviewStep(
    draft: RwSignal<PmPlanDraft>,
    template_options: Signal<Vec<(String, String)>>,
) -> impl IntoView {
    let summary = Memo::new(move |_| draft.with(|d| d.summary()));
    let row_ids = move || draft.with(|d| d.rows.iter().map(|r| r.equipment_id.clone()).collect::<Vec<_>>());

    view! {
        <div class="wizard-review">
            <div class="wizard-review__summary">
                <span>{move || format!("Строк: {}", summary.get().total_rows)}</span>
                <span>{move || format!("Заполнено: {}", summary.get().complete_rows)}</span>
                <span class:text-danger={move || summary.get().missing_checklist > 0}>
                    {move || format!("Без чек-листа: {}", summary.get().missing_checklist)}
                </span>
                <span class:text-danger={move || summary.get().missing_date > 0}>
                    {move || format!("Без даты: {}", summary.get().missing_date)}
                </span>
            </div>
            <table class="table__data">
                <thead>
                    <tr>
                        <th>"Оборудование"</th>
                        <th>"Чек-лист"</th>
                        <th>"Плановая дата"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=row_ids
                        key=|id| id.clone()
                        children=move |id| {
                            let id = StoredValue::new(id);
                            let row = move || {
                                draft.with(|d| d.rows.iter().find(|r| r.equipment_id == id.get_value()).cloned())
                                    .unwrap_or_default()
                            };
                            view! {
                                <tr class:wizard-review__row--incomplete=move || !row().is_complete()>
                                    <td>{move || { let r = row(); format!("{} · {}", r.equipment_code, r.equipment_name) }}</td>
                                    <td>
                                        <OptionSelect
                                            value=Signal::derive(move || row().checklist_template_id.unwrap_or_default())
                                            on_change=Callback::new(move |v: String| {
                                                draft.update(|d| d.set_row_checklist(&id.get_value(), Some(v)))
                                            })
                                            options=template_options
                                            placeholder="—"
                                        />
                                    </td>
                                    <td>
                                        <DateInput
                                            value=Signal::derive(move || row().planned_date)
                                            on_change=Callback::new(move |v| draft.update(|d| d.set_row_date(&id.get_value(), v)))
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            <button class="button button--secondary" on:click=move |_| draft.update(|d| d.apply_defaults())>
                "Заполнить пустые значениями по умолчанию"
            </button>
        </div>
    }
}

#[component]
pub fn PmPlanWizardPage() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();
    let templates = template_lookup(true);
    let template_options = Signal::derive(move || templates.with(|l| l.options()));

    let draft = RwSignal::new(PmPlanDraft::new());
    // Ошибки шага показываются после первой попытки перейти дальше
    let attempted = RwSignal::new(false);
    let submitting = RwSignal::new(false);
    let step = Memo::new(move |_| draft.with(|d| d.step));
    let errors = Signal::derive(move || {
        if attempted.get() {
            draft.with(|d| d.step_errors(d.step))
        } else {
            Vec::new()
        }
    });

    let available = RwSignal::new(Vec::<Equipment>::new());
    let factory_id = Memo::new(move |_| draft.with(|d| d.factory_id.clone()));
    Effect::new(move |_| {
        let factory_id = factory_id.get();
        available.set(Vec::new());
        if factory_id.is_empty() {
            return;
        }
        spawn_local(async move {
            match a002_equipment::api::fetch_all(Some(&factory_id)).await {
                Ok(list) => available.set(list),
                Err(e) => notify_error(format!("Не удалось загрузить оборудование: {}", e)),
            }
        });
    });

    let go_next = move |_| {
        let moved = draft.try_update(|d| d.next()).unwrap_or(false);
        attempted.set(!moved);
    };
    let go_back = move |_| {
        attempted.set(false);
        draft.update(|d| {
            d.back();
        });
    };
    let go_to = move |target: WizardStep| {
        let moved = draft.try_update(|d| d.go_to(target)).unwrap_or(false);
        attempted.set(!moved);
    };

    let submit = move |_| {
        let current = draft.get_untracked();
        if !current.can_submit() {
            attempted.set(true);
            return;
        }
        let dto = current.to_dto();
        submitting.set(true);
        spawn_local(async move {
            match a004_pm_plan::api::save(&dto).await {
                Ok(id) => {
                    notify_success(format!("План «{}» создан", dto.description));
                    log::info!("pm plan {} created from wizard", id);
                    draft.set(PmPlanDraft::new());
                    attempted.set(false);
                    ctx.open_detail("a004_pm_plan", Some(&id), &dto.description);
                    ctx.close_tab(TAB_KEY);
                }
                Err(e) => notify_error(e),
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="page wizard">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("wizard")}
                    <h1 class="page__title">"Мастер плана ТО"</h1>
                </div>
            </div>

            <div class="page__content">
                <div class="wizard-steps">
                    {WizardStep::all()
                        .iter()
                        .copied()
                        .map(|s| view! {
                            <button
                                class=move || step_class(s, step.get(), draft.with(|d| d.can_proceed_from(s)))
                                on:click=move |_| go_to(s)
                            >
                                <span class="wizard-step__number">{s.index() + 1}</span>
                                <span class="wizard-step__title">{s.title()}</span>
                            </button>
                        })
                        .collect_view()}
                </div>

                <div class="wizard-body">
                    {move || match step.get() {
                        WizardStep::Metadata => view! { <MetadataStep draft=draft errors=errors/> }.into_any(),
                        WizardStep::Scheduling => view! {
                            <SchedulingStep draft=draft errors=errors template_options=template_options/>
                        }
                        .into_any(),
                        WizardStep::Equipment => view! { <EquipmentStep draft=draft available=available/> }.into_any(),
                        WizardStep::Review => view! { <ReviewStep draft=draft template_options=template_options/> }.into_any(),
                    }}
                    {move || {
                        let messages = errors.with(|e| row_messages(e));
                        (!messages.is_empty()).then(|| view! {
                            <div class="alert alert--error">
                                {messages.into_iter().map(|m| view! { <div>{m}</div> }).collect_view()}
                            </div>
                        })
                    }}
                </div>

                <div class="details-actions">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || step.get().is_first())
                        on_click=go_back
                    >
                        {icon("chevron-left")}" Назад"
                    </Button>
                    <Show
                        when=move || step.get().is_last()
                        fallback=move || view! {
                            <Button appearance=ButtonAppearance::Primary on_click=go_next>
                                "Далее "{icon("chevron-right")}
                            </Button>
                        }
                    >
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || !can_edit.get() || submitting.get())
                            on_click=submit
                        >
                            {icon("check")}" Создать план"
                        </Button>
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_class() {
        use WizardStep::*;
        assert_eq!(step_class(Scheduling, Scheduling, false), "wizard-step wizard-step--active");
        assert_eq!(step_class(Metadata, Scheduling, true), "wizard-step wizard-step--done");
        assert_eq!(step_class(Review, Scheduling, true), "wizard-step");
    }

    #[test]
    fn test_row_messages_only_rows() {
        let errors = vec![
            FieldError {
                field: "name".into(),
                message: "Заполните наименование".into(),
            },
            FieldError {
                field: "rows".into(),
                message: "Не указана плановая дата: 2 строк".into(),
            },
        ];
        assert_eq!(row_messages(&errors), vec!["Не указана плановая дата: 2 строк".to_string()]);
    }
}
