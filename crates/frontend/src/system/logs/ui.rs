use contracts::shared::filter::{FilterSet, Filterable};
use contracts::shared::logger::{LogEntry, LogLevel};
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::api;
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::icons::icon;
use crate::shared::toast::{notify_error, notify_success};
use crate::system::auth::context::use_auth;

/// Строка журнала для фильтрации
#[derive(Clone)]
struct LogRow(LogEntry);

impl Filterable for LogRow {
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "level" => Some(LogLevel::parse(&self.0.level).as_str().to_string()),
            "source" => Some(self.0.source.clone()),
            "category" => Some(self.0.category.clone()),
            _ => None,
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.0.message.clone(), self.0.category.clone()]
    }
}

fn level_badge(level: &str) -> AnyView {
    let (color, text) = match LogLevel::parse(level) {
        LogLevel::Info => (BadgeColor::Informative, "INFO"),
        LogLevel::Warn => (BadgeColor::Warning, "WARN"),
        LogLevel::Error => (BadgeColor::Danger, "ERROR"),
    };
    view! { <Badge appearance=BadgeAppearance::Tint color=color>{text}</Badge> }.into_any()
}

#[component]
pub fn SystemLogPage() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let entries = RwSignal::new(Vec::<LogRow>::new());
    let filters = RwSignal::new(FilterSet::new());
    let loading = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match api::fetch_logs().await {
                Ok(mut logs) => {
                    logs.sort_by(|a, b| b.id.cmp(&a.id));
                    entries.set(logs.into_iter().map(LogRow).collect());
                }
                Err(e) => notify_error(e),
            }
            loading.set(false);
        });
    };
    load();

    let clear = move |_| {
        spawn_local(async move {
            match api::clear_logs().await {
                Ok(()) => {
                    notify_success("Журнал очищен");
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let rows = Signal::derive(move || filters.with(|f| entries.with(|e| f.apply(e))));
    let categories = Signal::derive(move || {
        let mut names: Vec<String> = entries.with(|e| e.iter().map(|r| r.0.category.clone()).collect());
        names.sort();
        names.dedup();
        names.into_iter().map(|c| (c.clone(), c)).collect::<Vec<_>>()
    });
    let levels = Signal::derive(|| {
        [LogLevel::Info, LogLevel::Warn, LogLevel::Error]
            .iter()
            .map(|l| (l.as_str().to_string(), l.as_str().to_uppercase()))
            .collect::<Vec<_>>()
    });
    let sources = Signal::derive(|| {
        vec![
            ("server".to_string(), "Сервер".to_string()),
            ("client".to_string(), "Клиент".to_string()),
        ]
    });

    let columns = vec![
        ColumnDef::new("message", "Сообщение", ColumnPriority::Title),
        ColumnDef::new("timestamp", "Время", ColumnPriority::Primary),
        ColumnDef::new("level", "Уровень", ColumnPriority::Primary),
        ColumnDef::new("category", "Категория", ColumnPriority::Secondary),
        ColumnDef::new("source", "Источник", ColumnPriority::DesktopOnly),
    ];

    let render_cell = Callback::new(|(row, key): (LogRow, String)| {
        let e = row.0;
        match key.as_str() {
            "timestamp" => e.timestamp.replace('T', " ").chars().take(19).collect::<String>().into_any(),
            "level" => level_badge(&e.level),
            "source" => e.source.into_any(),
            "category" => view! { <code>{e.category}</code> }.into_any(),
            "message" => e.message.into_any(),
            _ => ().into_any(),
        }
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("log")}
                    <h1 class="page__title">"Системный журнал"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}" Обновить"
                    </Button>
                    <Show when=move || auth_state.with(|s| s.is_admin())>
                        <Button appearance=ButtonAppearance::Secondary on_click=clear>
                            {icon("delete")}" Очистить"
                        </Button>
                    </Show>
                </div>
            </div>
            <div class="page__content">
                <FilterPanel filters=filters search_placeholder="Текст сообщения">
                    <FilterSelect filters=filters field="level" label="Уровень" options=levels/>
                    <FilterSelect filters=filters field="source" label="Источник" options=sources/>
                    <FilterSelect filters=filters field="category" label="Категория" options=categories/>
                </FilterPanel>
                <ResponsiveTable
                    columns=columns
                    rows=rows
                    row_id=Callback::new(|r: LogRow| r.0.id.to_string())
                    render_cell=render_cell
                    pagination=PaginationMode::Client { page_size: 50 }
                    loading=loading
                    empty_text="Журнал пуст"
                />
            </div>
        </div>
    }
}
