//! Журнал заказ-нарядов.
//!
//! Фильтрация выполняется на сервере (`WorkOrderListQuery`), выгрузка CSV
//! получает те же параметры, что и список.

use contracts::domain::a005_work_order::{WorkOrder, WorkOrderStatus};
use contracts::domain::common::{AggregateId, StatusWorkflow};
use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::selection::Selection;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_work_order::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::option_select::enum_options;
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::components::status_badge::{status_color, work_order_caption};
use crate::shared::date_utils::{format_date, today};
use crate::shared::icons::icon;
use crate::shared::lookup::{assignee_lookup, equipment_lookup};
use crate::shared::toast::{confirm, notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a005_work_order";
const OVERDUE_FIELD: &str = "overdue_only";

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Номер", ColumnPriority::Secondary),
        ColumnDef::new("description", "Наименование", ColumnPriority::Title),
        ColumnDef::new("equipment", "Оборудование", ColumnPriority::Primary),
        ColumnDef::new("planned_date", "Плановая дата", ColumnPriority::Primary),
        ColumnDef::new("assignee", "Исполнитель", ColumnPriority::Secondary),
        ColumnDef::new("failed", "Замечаний", ColumnPriority::DesktopOnly),
        ColumnDef::new("status", "Статус", ColumnPriority::Primary),
    ]
}

/// Переключение фильтра «только просроченные» (хранится чипом)
fn toggle_overdue(filters: &mut FilterSet, on: bool) {
    if on {
        filters.set(OVERDUE_FIELD, "true", "Только просроченные");
    } else {
        filters.remove(OVERDUE_FIELD);
    }
}

fn status_cell(w: &WorkOrder) -> AnyView {
    let overdue = w.is_overdue(today());
    let color = if overdue && w.status.is_open() {
        BadgeColor::Danger
    } else {
        status_color(w.status.as_str())
    };
    let caption = work_order_caption(w.status, overdue);
    view! { <Badge appearance=BadgeAppearance::Tint color=color>{caption}</Badge> }.into_any()
}

#[component]
pub fn WorkOrderList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();
    let equipment = equipment_lookup();
    let assignees = assignee_lookup();

    let items = RwSignal::new(Vec::<WorkOrder>::new());
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
                Ok(v) => {
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
        if ids.is_empty() || !confirm(&format!("Удалить выбранные наряды? Количество: {}", ids.len())) {
            return;
        }
        spawn_local(async move {
            let mut failed = 0;
            for id in &ids {
                if let Err(e) = api::remove(id).await {
                    log::warn!("delete work order {}: {}", id, e);
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
                    notify_success("Тестовые наряды созданы");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(w, key): (WorkOrder, String)| match key.as_str() {
        "code" => w.base.code.into_any(),
        "description" => view! { <strong>{w.base.description}</strong> }.into_any(),
        "equipment" => equipment.with(|l| l.name(&w.equipment_id)).into_any(),
        "planned_date" => format_date(&w.planned_date).into_any(),
        "assignee" => assignees
            .with(|l| l.name_opt(w.assignee_id.as_deref()))
            .into_any(),
        "failed" => match w.failed_count() {
            0 => "—".to_string().into_any(),
            n => view! { <span class="text-danger">{n}</span> }.into_any(),
        },
        "status" => status_cell(&w),
        _ => ().into_any(),
    });

    let status_options = Signal::derive(|| {
        enum_options(WorkOrderStatus::all(), WorkOrderStatus::as_str, WorkOrderStatus::label)
    });
    let equipment_options = Signal::derive(move || equipment.with(|l| l.options()));
    let assignee_options = Signal::derive(move || assignees.with(|l| l.options()));
    let overdue_only = move || filters.with(|f| f.value_of(OVERDUE_FIELD).is_some());

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("work-order")}
                    <h1 class="page__title">"Заказ-наряды"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_detail(AGGREGATE_KEY, None, "")
                    >
                        {icon("plus")}" Новый наряд"
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

                <FilterPanel filters=filters search_placeholder="Номер или наименование">
                    <FilterSelect filters=filters field="status" label="Статус" options=status_options/>
                    <FilterSelect filters=filters field="equipment_id" label="Оборудование" options=equipment_options/>
                    <FilterSelect filters=filters field="assignee_id" label="Исполнитель" options=assignee_options/>
                    <label class="form-group filter-panel__toggle">
                        <input
                            type="checkbox"
                            prop:checked=overdue_only
                            on:change=move |ev| {
                                let on = event_target_checked(&ev);
                                filters.update(|f| toggle_overdue(f, on));
                            }
                        />
                        " Только просроченные"
                    </label>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=items
                    row_id=Callback::new(|w: WorkOrder| w.base.id.as_string())
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Client { page_size: page_size.get() })
                    on_page_size_change=Callback::new(move |size| page_size.set(size))
                    selection=selection
                    on_row_click=Callback::new(move |w: WorkOrder| {
                        ctx.open_detail(AGGREGATE_KEY, Some(&w.to_string_id()), &w.base.code)
                    })
                    loading=loading
                    empty_text="Нарядов не найдено"
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdue_toggle_goes_to_query() {
        let mut f = FilterSet::new();
        f.set("status", "new", "Статус: Новый");
        toggle_overdue(&mut f, true);
        let pairs = f.to_query_pairs();
        assert!(pairs.contains(&("overdue_only".to_string(), "true".to_string())));
        assert!(pairs.contains(&("status".to_string(), "new".to_string())));

        toggle_overdue(&mut f, false);
        assert_eq!(f.value_of(OVERDUE_FIELD), None);
        assert_eq!(f.active_count(), 1);
    }
}
