use contracts::domain::a003_checklist_template::{ChecklistTemplate, TemplateStatus};
use contracts::domain::common::{AggregateId, StatusWorkflow};
use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::selection::Selection;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_checklist_template::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::option_select::enum_options;
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::components::status_badge::StatusBadge;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::toast::{confirm, notify_error, notify_success};
use crate::system::auth::context::use_can_edit;

const AGGREGATE_KEY: &str = "a003_checklist_template";

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("code", "Код", ColumnPriority::Secondary),
        ColumnDef::new("description", "Наименование", ColumnPriority::Title),
        ColumnDef::new("version", "Версия", ColumnPriority::Primary),
        ColumnDef::new("equipment_category", "Категория", ColumnPriority::Primary),
        ColumnDef::new("items", "Пунктов", ColumnPriority::Secondary),
        ColumnDef::new("updated_at", "Изменён", ColumnPriority::DesktopOnly),
        ColumnDef::new("status", "Статус", ColumnPriority::Primary),
    ]
}

/// Категории, встречающиеся в шаблонах, без повторов
fn category_options(templates: &[ChecklistTemplate]) -> Vec<(String, String)> {
    let mut categories: Vec<String> = templates
        .iter()
        .map(|t| t.equipment_category.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    categories.sort();
    categories.dedup();
    categories.into_iter().map(|c| (c.clone(), c)).collect()
}

#[component]
pub fn ChecklistTemplateList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_edit = use_can_edit();

    let items = RwSignal::new(Vec::<ChecklistTemplate>::new());
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
        if ids.is_empty() || !confirm(&format!("Удалить выбранные шаблоны? Количество: {}", ids.len())) {
            return;
        }
        spawn_local(async move {
            let mut failed = 0;
            for id in &ids {
                if let Err(e) = api::remove(id).await {
                    log::warn!("delete checklist template {}: {}", id, e);
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
                    notify_success("Тестовые шаблоны созданы");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(t, key): (ChecklistTemplate, String)| match key.as_str() {
        "code" => t.base.code.into_any(),
        "description" => view! { <strong>{t.base.description}</strong> }.into_any(),
        "version" => format!("v{}", t.version).into_any(),
        "equipment_category" => if t.equipment_category.is_empty() {
            "любая".to_string()
        } else {
            t.equipment_category
        }
        .into_any(),
        "items" => t.items.len().to_string().into_any(),
        "updated_at" => format_datetime(&t.base.metadata.updated_at).into_any(),
        "status" => view! { <StatusBadge status=t.status/> }.into_any(),
        _ => ().into_any(),
    });

    let status_options = Signal::derive(|| {
        enum_options(TemplateStatus::all(), TemplateStatus::as_str, TemplateStatus::label)
    });
    let categories = Signal::derive(move || items.with(|all| category_options(all)));

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("checklist")}
                    <h1 class="page__title">"Шаблоны чек-листов"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !can_edit.get())
                        on_click=move |_| ctx.open_detail(AGGREGATE_KEY, None, "")
                    >
                        {icon("plus")}" Новый шаблон"
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
                    <FilterSelect filters=filters field="equipment_category" label="Категория" options=categories/>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=rows
                    row_id=Callback::new(|t: ChecklistTemplate| t.base.id.as_string())
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Client { page_size: page_size.get() })
                    on_page_size_change=Callback::new(move |size| page_size.set(size))
                    selection=selection
                    on_row_click=Callback::new(move |t: ChecklistTemplate| {
                        ctx.open_detail(AGGREGATE_KEY, Some(&t.to_string_id()), &t.display_name())
                    })
                    loading=loading
                    empty_text="Шаблонов пока нет"
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_options_distinct_sorted() {
        let mut a = ChecklistTemplate::new_for_insert("CL-1".into(), "A".into());
        a.equipment_category = "Насос".into();
        let mut b = ChecklistTemplate::new_for_insert("CL-2".into(), "B".into());
        b.equipment_category = " Компрессор ".into();
        let mut c = ChecklistTemplate::new_for_insert("CL-3".into(), "C".into());
        c.equipment_category = "Насос".into();
        let d = ChecklistTemplate::new_for_insert("CL-4".into(), "D".into());

        let opts = category_options(&[a, b, c, d]);
        let values: Vec<_> = opts.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(values, vec!["Компрессор", "Насос"]);
    }
}
