use contracts::domain::a001_factory::{Factory, FactoryStatus};
use contracts::domain::common::{AggregateId, StatusWorkflow};
use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::selection::Selection;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_factory::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::option_select::enum_options;
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::components::status_badge::StatusBadge;
use crate::shared::icons::icon;
use crate::shared::toast::{confirm, notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a001_factory";

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Код", ColumnPriority::Secondary),
        ColumnDef::new("description", "Наименование", ColumnPriority::Title),
        ColumnDef::new("address", "Адрес", ColumnPriority::Primary),
        ColumnDef::new("manager_name", "Руководитель", ColumnPriority::DesktopOnly),
        ColumnDef::new("status", "Статус", ColumnPriority::Primary),
    ]
}

#[component]
pub fn FactoryList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();

    let items = RwSignal::new(Vec::<Factory>::new());
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
    // Перечитываем при возврате на вкладку
    Effect::new(move |_| {
        if ctx.active.get().as_deref() == Some(AGGREGATE_KEY) {
            load();
        }
    });

    let rows = Signal::derive(move || filters.with(|f| items.with(|all| f.apply(all))));

    let open = move |factory: Factory| {
        ctx.open_detail(
            AGGREGATE_KEY,
            Some(&factory.to_string_id()),
            &factory.base.code,
        );
    };

    let delete_selected = move || {
        let ids = selection.with_untracked(|s| s.ids());
        if ids.is_empty() || !confirm(&format!("Удалить выбранные заводы? Количество: {}", ids.len())) {
            return;
        }
        spawn_local(async move {
            let mut failed = 0;
            for id in &ids {
                if let Err(e) = api::remove(id).await {
                    log::warn!("delete factory {}: {}", id, e);
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
                    notify_success("Тестовые заводы созданы");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(f, key): (Factory, String)| match key.as_str() {
        "code" => f.base.code.into_any(),
        "description" => view! { <strong>{f.base.description}</strong> }.into_any(),
        "address" => f.address.into_any(),
        "manager_name" => f.manager_name.into_any(),
        "status" => view! { <StatusBadge status=f.status/> }.into_any(),
        _ => ().into_any(),
    });

    let status_options = Signal::derive(|| {
        enum_options(FactoryStatus::all(), FactoryStatus::as_str, FactoryStatus::label)
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("factory")}
                    <h1 class="page__title">"Заводы"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_detail(AGGREGATE_KEY, None, "")
                    >
                        {icon("plus")}" Новый завод"
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

                <FilterPanel filters=filters search_placeholder="Код, наименование или адрес">
                    <FilterSelect filters=filters field="status" label="Статус" options=status_options/>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=rows
                    row_id=Callback::new(|f: Factory| f.base.id.as_string())
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Client { page_size: page_size.get() })
                    on_page_size_change=Callback::new(move |size| page_size.set(size))
                    selection=selection
                    on_row_click=Callback::new(open)
                    loading=loading
                    empty_text="Заводов пока нет"
                />
            </div>
        </div>
    }
}
