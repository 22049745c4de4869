use chrono::NaiveDate;
use contracts::domain::a004_pm_plan::{Frequency, PlanStatus, PmPlan};
use contracts::domain::common::{AggregateId, StatusWorkflow};
use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::selection::Selection;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_pm_plan::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::option_select::enum_options;
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::components::status_badge::StatusBadge;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::lookup::factory_lookup;
use crate::shared::toast::{confirm, notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a004_pm_plan";

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Код", ColumnPriority::Secondary),
        ColumnDef::new("description", "Наименование", ColumnPriority::Title),
        ColumnDef::new("factory", "Завод", ColumnPriority::Primary),
        ColumnDef::new("frequency", "Периодичность", ColumnPriority::Primary),
        ColumnDef::new("period", "Период", ColumnPriority::Secondary),
        ColumnDef::new("items", "Единиц", ColumnPriority::DesktopOnly),
        ColumnDef::new("status", "Статус", ColumnPriority::Primary),
    ]
}

/// «с 01.03.2024» либо «01.03.2024 – 31.12.2024»
fn period_text(start: &NaiveDate, end: Option<&NaiveDate>) -> String {
    match end {
        Some(end) => format!("{} – {}", format_date(start), format_date(end)),
        None => format!("с {}", format_date(start)),
    }
}

#[component]
pub fn PmPlanList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();
    let factories = factory_lookup();

    let items = RwSignal::new(Vec::<PmPlan>::new());
    let filters = RwSignal::new(FilterSet::new());
    let selection = RwSignal::new(Selection::new());
    let page_size = RwSignal::new(DEFAULT_PAGE_SIZE);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match api::fetch_all().await {
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
        if ctx.active.get().as_deref() == Some(AGGREGATE_KEY) {
            load();
        }
    });

    let rows = Signal::derive(move || filters.with(|f| items.with(|all| f.apply(all))));

    let delete_selected = move || {
        let ids = selection.with_untracked(|s| s.ids());
        if ids.is_empty() || !confirm(&format!("Удалить выбранные планы? Количество: {}", ids.len())) {
            return;
        }
        spawn_local(async move {
            let mut failed = 0;
            for id in &ids {
                if let Err(e) = api::remove(id).await {
                    log::warn!("delete pm plan {}: {}", id, e);
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
                    notify_success("Тестовые планы созданы");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(p, key): (PmPlan, String)| match key.as_str() {
        "code" => p.base.code.into_any(),
        "description" => view! { <strong>{p.base.description}</strong> }.into_any(),
        "factory" => factories.with(|l| l.name(&p.factory_id)).into_any(),
        "frequency" => p.frequency.label().into_any(),
        "period" => period_text(&p.start_date, p.end_date.as_ref()).into_any(),
        "items" => p.items.len().to_string().into_any(),
        "status" => view! { <StatusBadge status=p.status/> }.into_any(),
        _ => ().into_any(),
    });

    let status_options =
        Signal::derive(|| enum_options(PlanStatus::all(), PlanStatus::as_str, PlanStatus::label));
    let frequency_options =
        Signal::derive(|| enum_options(Frequency::all(), Frequency::as_str, Frequency::label));
    let factory_options = Signal::derive(move || factories.with(|l| l.options()));

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("calendar")}
                    <h1 class="page__title">"Планы ТО"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_detail(AGGREGATE_KEY, None, "")
                    >
                        {icon("plus")}" Новый план"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_tab("u100_pm_plan_wizard", "Мастер плана ТО")
                    >
                        {icon("wizard")}" Мастер"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}" Обновить"
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

                <FilterPanel filters=filters search_placeholder="Код или наименование">
                    <FilterSelect filters=filters field="status" label="Статус" options=status_options/>
                    <FilterSelect filters=filters field="factory_id" label="Завод" options=factory_options/>
                    <FilterSelect filters=filters field="frequency" label="Периодичность" options=frequency_options/>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=rows
                    row_id=Callback::new(|p: PmPlan| p.base.id.as_string())
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Client { page_size: page_size.get() })
                    on_page_size_change=Callback::new(move |size| page_size.set(size))
                    selection=selection
                    on_row_click=Callback::new(move |p: PmPlan| {
                        ctx.open_detail(AGGREGATE_KEY, Some(&p.to_string_id()), &p.base.code)
                    })
                    loading=loading
                    empty_text="Планов ТО пока нет"
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_text() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(period_text(&start, None), "с 01.03.2024");
        assert_eq!(period_text(&start, Some(&end)), "01.03.2024 – 31.12.2024");
    }
}
