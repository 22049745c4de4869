//! Адаптивный список: таблица на десктопе, карточки на узком экране.
//!
//! Колонки описываются `ColumnDef`; в режиме карточек колонка `Title`
//! становится заголовком, `Primary`/`Secondary` полями, `DesktopOnly`
//! скрываются. Пагинация клиентская (таблица режет `rows` сама) или
//! серверная (`rows` уже одна страница, смена страницы уходит в
//! `on_page_change`).

use contracts::shared::selection::{HeaderCheckState, Selection};
use contracts::shared::table::{
    card_layout, layout_for_width, ColumnDef, LayoutMode, PaginationMode, MOBILE_BREAKPOINT_PX,
};
use leptos::prelude::*;
use thaw::*;

use super::pagination_controls::PaginationControls;
use super::table_checkbox::{HeaderCheckbox, TableCheckbox};

fn viewport_width() -> u32 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w as u32)
        .unwrap_or(MOBILE_BREAKPOINT_PX)
}

/// Текущий режим отображения, обновляется при изменении размера окна
pub fn use_layout_mode() -> Signal<LayoutMode> {
    let layout = RwSignal::new(layout_for_width(viewport_width()));
    let handle = window_event_listener(leptos::ev::resize, move |_| {
        let next = layout_for_width(viewport_width());
        if layout.get_untracked() != next {
            layout.set(next);
        }
    });
    on_cleanup(move || handle.remove());
    layout.into()
}

#[component]
pub fn ResponsiveTable<T>(
    columns: Vec<ColumnDef>,
    #[prop(into)]
    rows: Signal<Vec<T>>,
    /// Идентификатор строки для выбора
    row_id: Callback<T, String>,
    /// Содержимое ячейки по `(строка, ключ колонки)`
    render_cell: Callback<(T, String), AnyView>,
    #[prop(into)]
    pagination: Signal<PaginationMode>,
    /// Внешний сигнал страницы (управляемый режим)
    #[prop(optional)]
    page: Option<RwSignal<usize>>,
    #[prop(optional)]
    on_page_change: Option<Callback<usize>>,
    #[prop(optional)]
    on_page_size_change: Option<Callback<usize>>,
    /// Общее число строк для серверной пагинации
    #[prop(optional, into)]
    total_count: Option<Signal<usize>>,
    #[prop(optional)]
    selection: Option<RwSignal<Selection>>,
    #[prop(optional)]
    on_row_click: Option<Callback<T>>,
    #[prop(optional, into)]
    loading: Option<Signal<bool>>,
    #[prop(optional, into)]
    empty_text: Option<String>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    let page = page.unwrap_or_else(|| RwSignal::new(0));
    let layout = use_layout_mode();
    let card = StoredValue::new(card_layout(&columns));
    let columns = StoredValue::new(columns);
    let empty_text = empty_text.unwrap_or_else(|| "Нет данных".to_string());
    let loading = loading.unwrap_or_else(|| Signal::derive(|| false));

    let row_count = Signal::derive(move || rows.with(|r| r.len()));
    let page_count = Signal::derive(move || pagination.get().page_count(row_count.get()));
    let visible = Signal::derive(move || {
        let mode = pagination.get();
        rows.with(|r| mode.visible_rows(r, page.get()))
    });
    let visible_ids = Signal::derive(move || {
        visible
            .get()
            .into_iter()
            .map(|r| row_id.run(r))
            .collect::<Vec<_>>()
    });

    // Страница не должна выходить за пределы после фильтрации
    Effect::new(move |_| {
        let clamped = pagination.get().clamp(page.get_untracked(), row_count.get());
        if clamped != page.get_untracked() {
            page.set(clamped);
        }
    });

    // Выбор чистится от строк, которых больше нет в наборе.
    // При серверной пагинации набор неполный, поэтому сверка не делается.
    if let Some(sel) = selection {
        Effect::new(move |_| {
            if matches!(pagination.get(), PaginationMode::Server { .. }) {
                return;
            }
            let ids: Vec<String> =
                rows.with(|r| r.iter().cloned().map(|row| row_id.run(row)).collect());
            sel.update(|s| s.reconcile(ids.iter().map(String::as_str)));
        });
    }

    let change_page = Callback::new(move |p: usize| {
        let p = pagination.get_untracked().clamp(p, row_count.get_untracked());
        page.set(p);
        if let Some(cb) = on_page_change {
            cb.run(p);
        }
    });

    let header_state = Signal::derive(move || match selection {
        Some(sel) => {
            let ids = visible_ids.get();
            sel.with(|s| s.header_state(ids.iter().map(String::as_str)))
        }
        None => HeaderCheckState::None,
    });
    let toggle_all = Callback::new(move |_| {
        if let Some(sel) = selection {
            let ids = visible_ids.get_untracked();
            sel.update(|s| s.toggle_all(ids.iter().map(String::as_str)));
        }
    });

    let is_selected = move |id: &str| selection.map(|s| s.with(|s| s.is_selected(id)));
    let set_selected = move |id: String, checked: bool| {
        if let Some(sel) = selection {
            sel.update(|s| s.set(&id, checked));
        }
    };
    let click_row = move |row: T| {
        if let Some(cb) = on_row_click {
            cb.run(row);
        }
    };

    let table_view = move || {
        let cols = columns.get_value();
        let header = cols
            .into_iter()
            .map(|c| view! { <TableHeaderCell>{c.title}</TableHeaderCell> })
            .collect_view();
        let body = move || {
            visible
                .get()
                .into_iter()
                .map(|row| {
                    let id = row_id.run(row.clone());
                    let id_for_check = id.clone();
                    let id_for_change = id;
                    let row_for_click = row.clone();
                    let cells = columns
                        .get_value()
                        .into_iter()
                        .map(|c| {
                            let content = render_cell.run((row.clone(), c.key.clone()));
                            view! { <TableCell><TableCellLayout>{content}</TableCellLayout></TableCell> }
                        })
                        .collect_view();
                    view! {
                        <TableRow on:click=move |_| click_row(row_for_click.clone())>
                            {selection.map(|_| view! {
                                <TableCheckbox
                                    checked=Signal::derive(move || is_selected(&id_for_check).unwrap_or(false))
                                    on_change=Callback::new(move |checked| set_selected(id_for_change.clone(), checked))
                                />
                            })}
                            {cells}
                        </TableRow>
                    }
                })
                .collect_view()
        };

        view! {
            <Table>
                <TableHeader>
                    <TableRow>
                        {selection.map(|_| view! {
                            <TableHeaderCell class="table__cell--checkbox">
                                <HeaderCheckbox state=header_state on_toggle=toggle_all/>
                            </TableHeaderCell>
                        })}
                        {header}
                    </TableRow>
                </TableHeader>
                <TableBody>{body}</TableBody>
            </Table>
        }
        .into_any()
    };

    let cards_view = move || {
        let layout = card.get_value();
        let cols = columns.get_value();
        let title_of = |key: &str| {
            cols.iter()
                .find(|c| c.key == key)
                .map(|c| c.title.clone())
                .unwrap_or_default()
        };
        let field_titles: Vec<(String, String)> = layout
            .fields
            .iter()
            .map(|k| (k.clone(), title_of(k)))
            .collect();
        let field_titles = StoredValue::new(field_titles);
        let title_key = layout.title.clone();

        view! {
            <div class="responsive-table__cards">
                {move || {
                    visible
                        .get()
                        .into_iter()
                        .map(|row| {
                            let id = row_id.run(row.clone());
                            let id_for_check = id.clone();
                            let row_for_click = row.clone();
                            let title = title_key
                                .clone()
                                .map(|k| render_cell.run((row.clone(), k)));
                            let fields = field_titles
                                .get_value()
                                .into_iter()
                                .map(|(key, caption)| {
                                    let value = render_cell.run((row.clone(), key));
                                    view! {
                                        <div class="card-item__field">
                                            <span class="card-item__label">{caption}</span>
                                            <span class="card-item__value">{value}</span>
                                        </div>
                                    }
                                })
                                .collect_view();
                            view! {
                                <div
                                    class="card-item"
                                    class:card-item--selected=move || is_selected(&id).unwrap_or(false)
                                    on:click=move |_| click_row(row_for_click.clone())
                                >
                                    <div class="card-item__header">
                                        {selection.map(|_| {
                                            let id_for_change = id_for_check.clone();
                                            let id_for_state = id_for_check.clone();
                                            view! {
                                                <input
                                                    type="checkbox"
                                                    class="table__checkbox"
                                                    prop:checked=move || is_selected(&id_for_state).unwrap_or(false)
                                                    on:click=|e| e.stop_propagation()
                                                    on:change=move |ev| set_selected(id_for_change.clone(), event_target_checked(&ev))
                                                />
                                            }
                                        })}
                                        <div class="card-item__title">{title}</div>
                                    </div>
                                    <div class="card-item__fields">{fields}</div>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        }
        .into_any()
    };

    let show_pagination = move || !matches!(pagination.get(), PaginationMode::None);
    let count = Signal::derive(move || match total_count {
        Some(total) => total.get(),
        None => row_count.get(),
    });
    let page_size = Signal::derive(move || pagination.get().page_size(row_count.get()));

    view! {
        <div class="responsive-table">
            {move || {
                if loading.get() {
                    view! { <div class="responsive-table__loading"><Spinner/></div> }.into_any()
                } else if row_count.get() == 0 {
                    view! { <div class="empty-state">{empty_text.clone()}</div> }.into_any()
                } else {
                    match layout.get() {
                        LayoutMode::Table => table_view(),
                        LayoutMode::Cards => cards_view(),
                    }
                }
            }}
            <Show when=show_pagination>
                <div class="responsive-table__footer">
                    {selection.map(|sel| view! {
                        <span class="responsive-table__selected">
                            {move || {
                                let n = sel.with(|s| s.len());
                                if n > 0 { format!("Выбрано: {}", n) } else { String::new() }
                            }}
                        </span>
                    })}
                    <PaginationControls
                        current_page=page
                        total_pages=page_count
                        total_count=count
                        page_size=page_size
                        on_page_change=change_page
                        on_page_size_change=on_page_size_change
                    />
                </div>
            </Show>
        </div>
    }
}
