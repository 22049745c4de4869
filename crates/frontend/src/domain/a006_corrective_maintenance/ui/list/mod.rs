use contracts::domain::a006_corrective_maintenance::aggregate::{
    CorrectiveMaintenance, IncidentStatus, Priority,
};
use contracts::domain::common::{AggregateId, StatusWorkflow};
use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::selection::Selection;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_corrective_maintenance::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::option_select::enum_options;
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::components::status_badge::{PriorityBadge, StatusBadge};
use crate::shared::date_utils::{format_datetime, format_minutes};
use crate::shared::icons::icon;
use crate::shared::lookup::equipment_lookup;
use crate::shared::toast::{confirm, notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a006_corrective_maintenance";

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Номер", ColumnPriority::Secondary),
        ColumnDef::new("description", "Описание", ColumnPriority::Title),
        ColumnDef::new("equipment", "Оборудование", ColumnPriority::Primary),
        ColumnDef::new("priority", "Приоритет", ColumnPriority::Primary),
        ColumnDef::new("reported_at", "Зарегистрирован", ColumnPriority::Secondary),
        ColumnDef::new("downtime", "Простой", ColumnPriority::DesktopOnly),
        ColumnDef::new("status", "Статус", ColumnPriority::Primary),
    ]
}

/// Открытые инциденты выше, внутри по убыванию приоритета, затем новые раньше
fn sort_for_triage(items: &mut [CorrectiveMaintenance]) {
    items.sort_by(|a, b| {
        b.status
            .is_open()
            .cmp(&a.status.is_open())
            .then(b.priority.cmp(&a.priority))
            .then(b.reported_at.cmp(&a.reported_at))
    });
}

#[component]
pub fn IncidentList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();
    let equipment = equipment_lookup();

    let items = RwSignal::new(Vec::<CorrectiveMaintenance>::new());
    let filters = RwSignal::new(FilterSet::new());
    let selection = RwSignal::new(Selection::new());
    let page_size = RwSignal::new(DEFAULT_PAGE_SIZE);
    let loading = RwSignal::new(false);
    let exporting = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let load = move || {
        let pairs = filters.with_untracked(|f| f.to_query_pairs());
        loading.set(true);
        spawn_local(async move {
            match api::fetch_list(&pairs).await {
                Ok(mut v) => {
                    sort_for_triage(&mut v);
                    items.set(v);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    };
    Effect::new(move |_| {
        filters.track();
        if ctx.active.get().as_deref() == Some(AGGREGATE_KEY) {
            selection.update_untracked(|s| s.clear());
            load();
        }
    });

    let export = move || {
        let pairs = filters.with_untracked(|f| f.to_query_pairs());
        exporting.set(true);
        spawn_local(async move {
            if let Err(e) = api::export(&pairs).await {
                notify_error(format!("Ошибка выгрузки: {}", e));
            }
            exporting.set(false);
        });
    };

    let delete_selected = move || {
        let ids = selection.with_untracked(|s| s.ids());
        if ids.is_empty() || !confirm(&format!("Удалить выбранные инциденты? Количество: {}", ids.len())) {
            return;
        }
        spawn_local(async move {
            let mut failed = 0;
            for id in &ids {
                if let Err(e) = api::remove(id).await {
                    log::warn!("delete incident {}: {}", id, e);
                    failed += 1;
                }
            }
            if failed > 0 {
                notify_error(format!("Не удалось удалить: {}", failed));
            } else {
                notify_success(format!("Удалено: {}", ids.len()));
            }
            selection.update(|s| s.clear());
            load();
        });
    };

    let test_data = move || {
        spawn_local(async move {
            match api::create_test_data().await {
                Ok(()) => {
                    notify_success("Тестовые инциденты созданы");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(c, key): (CorrectiveMaintenance, String)| match key.as_str() {
        "code" => c.base.code.clone().into_any(),
        "description" => view! { <strong>{c.base.description.clone()}</strong> }.into_any(),
        "equipment" => equipment.with(|l| l.name(&c.equipment_id)).into_any(),
        "priority" => view! { <PriorityBadge priority=c.priority/> }.into_any(),
        "reported_at" => format_datetime(&c.reported_at).into_any(),
        "downtime" => c
            .effective_downtime()
            .map(format_minutes)
            .unwrap_or_else(|| "—".to_string())
            .into_any(),
        "status" => view! { <StatusBadge status=c.status/> }.into_any(),
        _ => ().into_any(),
    });

    let status_options = Signal::derive(|| {
        enum_options(IncidentStatus::all(), IncidentStatus::as_str, IncidentStatus::label)
    });
    let priority_options =
        Signal::derive(|| enum_options(Priority::all(), Priority::as_str, Priority::label));
    let equipment_options = Signal::derive(move || equipment.with(|l| l.options()));
    let open_only = move || filters.with(|f| f.value_of("open_only").is_some());

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("incident")}
                    <h1 class="page__title">"Инциденты"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_detail(AGGREGATE_KEY, None, "")
                    >
                        {icon("plus")}" Зарегистрировать"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}" Обновить"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || exporting.get())
                        on_click=move |_| export()
                    >
                        {icon("download")}" CSV"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || !can_edit.get() || selection.with(|s| s.is_empty()))
                        on_click=move |_| delete_selected()
                    >
                        {icon("delete")}
                        {move || format!(" Удалить ({})", selection.with(|s| s.len()))}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| test_data()
                    >
                        "Тестовые данные"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <FilterPanel filters=filters search_placeholder="Номер, описание или подробности">
                    <FilterSelect filters=filters field="status" label="Статус" options=status_options/>
                    <FilterSelect filters=filters field="priority" label="Приоритет" options=priority_options/>
                    <FilterSelect filters=filters field="equipment_id" label="Оборудование" options=equipment_options/>
                    <label class="form-group filter-panel__toggle">
                        <input
                            type="checkbox"
                            prop:checked=open_only
                            on:change=move |ev| {
                                let on = event_target_checked(&ev);
                                filters.update(|f| {
                                    if on {
                                        f.set("open_only", "true", "Только открытые");
                                    } else {
                                        f.remove("open_only");
                                    }
                                });
                            }
                        />
                        " Только открытые"
                    </label>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=items
                    row_id=Callback::new(|c: CorrectiveMaintenance| c.base.id.as_string())
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Client { page_size: page_size.get() })
                    on_page_size_change=Callback::new(move |size| page_size.set(size))
                    selection=selection
                    on_row_click=Callback::new(move |c: CorrectiveMaintenance| {
                        ctx.open_detail(AGGREGATE_KEY, Some(&c.to_string_id()), &c.base.code)
                    })
                    loading=loading
                    empty_text="Инцидентов не найдено"
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn incident(code: &str, priority: Priority, status: IncidentStatus, age_min: i64) -> CorrectiveMaintenance {
        let mut c = CorrectiveMaintenance::new_for_insert(code.into(), code.into(), "eq".into(), "u".into());
        c.priority = priority;
        c.status = status;
        c.reported_at = Utc::now() - Duration::minutes(age_min);
        c
    }

    #[test]
    fn test_sort_for_triage() {
        let mut v = vec![
            incident("closed-critical", Priority::Critical, IncidentStatus::Closed, 0),
            incident("low-old", Priority::Low, IncidentStatus::New, 100),
            incident("high-old", Priority::High, IncidentStatus::InProgress, 50),
            incident("high-new", Priority::High, IncidentStatus::New, 5),
        ];
        sort_for_triage(&mut v);
        let codes: Vec<_> = v.iter().map(|c| c.base.code.as_str()).collect();
        assert_eq!(codes, vec!["high-new", "high-old", "low-old", "closed-critical"]);
    }
}
