use crate::shared::icons::icon;
use contracts::shared::pagination::PAGE_SIZE_OPTIONS;
use leptos::prelude::*;

/// Переключатель страниц: первая, предыдущая, `N / M (всего)`, следующая, последняя.
///
/// Выбор размера страницы показывается только при заданном `on_page_size_change`.
#[component]
pub fn PaginationControls(
    /// Текущая страница (с нуля)
    #[prop(into)]
    current_page: Signal<usize>,
    #[prop(into)]
    total_pages: Signal<usize>,
    #[prop(into)]
    total_count: Signal<usize>,
    #[prop(into)]
    page_size: Signal<usize>,
    on_page_change: Callback<usize>,
    #[prop(default = None)]
    on_page_size_change: Option<Callback<usize>>,
) -> impl IntoView {
    let is_first = move || current_page.get() == 0;
    let is_last = move || current_page.get() + 1 >= total_pages.get().max(1);

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(0)
                disabled=is_first
                title="Первая страница"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get().saturating_sub(1))
                disabled=is_first
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    format!(
                        "{} / {} ({})",
                        current_page.get() + 1,
                        total_pages.get().max(1),
                        total_count.get()
                    )
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get() + 1)
                disabled=is_last
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(total_pages.get().max(1) - 1)
                disabled=is_last
                title="Последняя страница"
            >
                {icon("chevrons-right")}
            </button>
            {on_page_size_change.map(|on_change| view! {
                <select
                    class="page-size-select"
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                            on_change.run(size);
                        }
                    }
                    prop:value=move || page_size.get().to_string()
                >
                    {PAGE_SIZE_OPTIONS.iter().map(|&size| view! {
                        <option value=size.to_string() selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }).collect_view()}
                </select>
            })}
        </div>
    }
}
