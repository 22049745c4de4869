//! Список оборудования с серверной пагинацией.
//!
//! Фильтры и строка поиска уходят в query string `/api/equipment`,
//! при их изменении выборка начинается с первой страницы.

use contracts::domain::a002_equipment::{Criticality, Equipment, EquipmentStatus};
use contracts::domain::common::{AggregateId, StatusWorkflow};
use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::selection::Selection;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_equipment::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::option_select::enum_options;
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::components::status_badge::StatusBadge;
use crate::shared::date_utils::format_date_opt;
use crate::shared::icons::icon;
use crate::shared::lookup::factory_lookup;
use crate::shared::toast::{confirm, notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a002_equipment";

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Код", ColumnPriority::Secondary),
        ColumnDef::new("description", "Наименование", ColumnPriority::Title),
        ColumnDef::new("factory", "Завод", ColumnPriority::Primary),
        ColumnDef::new("category", "Категория", ColumnPriority::Primary),
        ColumnDef::new("model", "Модель", ColumnPriority::DesktopOnly),
        ColumnDef::new("location", "Место", ColumnPriority::DesktopOnly),
        ColumnDef::new("install_date", "Введено", ColumnPriority::DesktopOnly),
        ColumnDef::new("criticality", "Критичность", ColumnPriority::Secondary),
        ColumnDef::new("status", "Статус", ColumnPriority::Primary),
    ]
}

/// Параметры запроса страницы
fn page_query(filters: &FilterSet, page: usize, page_size: usize) -> Vec<(String, String)> {
    let mut pairs = filters.to_query_pairs();
    pairs.push(("page".to_string(), page.to_string()));
    pairs.push(("page_size".to_string(), page_size.to_string()));
    pairs
}

fn criticality_badge(c: Criticality) -> AnyView {
    let color = match c {
        Criticality::Low => BadgeColor::Informative,
        Criticality::Medium => BadgeColor::Warning,
        Criticality::High => BadgeColor::Danger,
    };
    view! { <Badge appearance=BadgeAppearance::Outline color=color>{c.label()}</Badge> }.into_any()
}

#[component]
pub fn EquipmentList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();
    let factories = factory_lookup();

    let items = RwSignal::new(Vec::<Equipment>::new());
    let total = RwSignal::new(0usize);
    let total_pages = RwSignal::new(1usize);
    let filters = RwSignal::new(FilterSet::new());
    let selection = RwSignal::new(Selection::new());
    let page = RwSignal::new(0usize);
    let page_size = RwSignal::new(DEFAULT_PAGE_SIZE);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let load = move || {
        let pairs = filters.with_untracked(|f| {
            page_query(f, page.get_untracked(), page_size.get_untracked())
        });
        loading.set(true);
        spawn_local(async move {
            match api::fetch_page(&pairs).await {
                Ok(resp) => {
                    total.set(resp.total);
                    total_pages.set(resp.total_pages);
                    if resp.page != page.get_untracked() {
                        page.set(resp.page);
                    }
                    items.set(resp.items);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    };

    // Смена фильтров возвращает на первую страницу
    Effect::new(move |prev: Option<FilterSet>| {
        let current = filters.get();
        if prev.is_some_and(|p| p != current) {
            page.set(0);
            selection.update(|s| s.clear());
        }
        current
    });

    Effect::new(move |_| {
        filters.track();
        page.track();
        page_size.track();
        if ctx.active.get().as_deref() == Some(AGGREGATE_KEY) {
            load();
        }
    });

    let delete_selected = move || {
        let ids = selection.with_untracked(|s| s.ids());
        if ids.is_empty() || !confirm(&format!("Удалить выбранное оборудование? Количество: {}", ids.len())) {
            return;
        }
        spawn_local(async move {
            let mut failed = 0;
            for id in &ids {
                if let Err(e) = api::remove(id).await {
                    log::warn!("delete equipment {}: {}", id, e);
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
                    notify_success("Тестовое оборудование создано");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(e, key): (Equipment, String)| match key.as_str() {
        "code" => e.base.code.into_any(),
        "description" => view! { <strong>{e.base.description}</strong> }.into_any(),
        "factory" => factories.with(|l| l.name(&e.factory_id)).into_any(),
        "category" => e.category.into_any(),
        "model" => format!("{} {}", e.manufacturer, e.model).trim().to_string().into_any(),
        "location" => e.location.into_any(),
        "install_date" => format_date_opt(e.install_date.as_ref()).into_any(),
        "criticality" => criticality_badge(e.criticality),
        "status" => view! { <StatusBadge status=e.status/> }.into_any(),
        _ => ().into_any(),
    });

    let factory_options = Signal::derive(move || factories.with(|l| l.options()));
    let status_options = Signal::derive(|| {
        enum_options(EquipmentStatus::all(), EquipmentStatus::as_str, EquipmentStatus::label)
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("equipment")}
                    <h1 class="page__title">"Оборудование"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_detail(AGGREGATE_KEY, None, "")
                    >
                        {icon("plus")}" Добавить"
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

                <FilterPanel filters=filters search_placeholder="Код, наименование, модель, серийный номер">
                    <FilterSelect filters=filters field="factory_id" label="Завод" options=factory_options/>
                    <FilterSelect filters=filters field="status" label="Статус" options=status_options/>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=items
                    row_id=Callback::new(|e: Equipment| e.base.id.as_string())
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Server {
                        total_pages: total_pages.get(),
                        page_size: page_size.get(),
                    })
                    page=page
                    on_page_size_change=Callback::new(move |size| {
                        page.set(0);
                        page_size.set(size);
                    })
                    total_count=total
                    selection=selection
                    on_row_click=Callback::new(move |e: Equipment| {
                        ctx.open_detail(AGGREGATE_KEY, Some(&e.to_string_id()), &e.base.code)
                    })
                    loading=loading
                    empty_text="Оборудование не найдено"
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_includes_filters_and_paging() {
        let mut filters = FilterSet::new();
        filters.set("status", "active", "Статус: В работе");
        filters.set_search("насос");
        let pairs = page_query(&filters, 2, 50);
        assert!(pairs.contains(&("status".to_string(), "active".to_string())));
        assert!(pairs.contains(&("q".to_string(), "насос".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("page_size".to_string(), "50".to_string())));
    }
}
