use crate::shared::icons::icon;
use contracts::shared::filter::{FilterSet, MIN_SEARCH_LEN};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Сворачиваемая панель фильтров списка.
///
/// Строка поиска и чипы активных фильтров берутся из `filters`;
/// поля фильтров передаются дочерними элементами.
#[component]
pub fn FilterPanel(
    filters: RwSignal<FilterSet>,
    #[prop(optional)]
    is_expanded: Option<RwSignal<bool>>,
    #[prop(optional, into)]
    search_placeholder: Option<String>,
    children: Children,
) -> impl IntoView {
    let is_expanded = is_expanded.unwrap_or_else(|| RwSignal::new(true));
    let active_count = Signal::derive(move || filters.with(|f| f.active_count()));
    let search = RwSignal::new(filters.with_untracked(|f| f.search().to_string()));
    let placeholder = search_placeholder
        .unwrap_or_else(|| format!("Поиск (от {} символов)...", MIN_SEARCH_LEN));

    // Применяется только последний ввод после паузы
    let generation = StoredValue::new(0u32);
    Effect::new(move |_| {
        let text = search.get();
        generation.update_value(|g| *g = g.wrapping_add(1));
        let current = generation.get_value();
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            if generation.get_value() != current {
                return;
            }
            if filters.with_untracked(|f| f.search() != text) {
                filters.update(|f| f.set_search(&text));
            }
        });
    });

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div
                    class="filter-panel-header__left"
                    on:click=move |_| is_expanded.update(|e| *e = !*e)
                >
                    <span class=move || {
                        if is_expanded.get() {
                            "filter-panel__chevron filter-panel__chevron--expanded"
                        } else {
                            "filter-panel__chevron"
                        }
                    }>
                        {icon("chevron-down")}
                    </span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Фильтры"</span>
                    <Show when=move || { active_count.get() > 0 }>
                        <span class="badge badge--primary">{move || active_count.get()}</span>
                    </Show>
                </div>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <div class="form-group filter-panel__search">
                            <Input value=search placeholder=placeholder.clone()/>
                        </div>
                        {children()}
                    </Flex>
                    <Show when=move || { active_count.get() > 0 }>
                        <div class="filter-tags">
                            {move || {
                                filters
                                    .with(|f| f.chips().to_vec())
                                    .into_iter()
                                    .map(|chip| {
                                        let field = chip.field.clone();
                                        view! {
                                            <FilterTag
                                                label=chip.label.clone()
                                                on_remove=Callback::new(move |_| {
                                                    filters.update(|f| f.remove(&field))
                                                })
                                            />
                                        }
                                    })
                                    .collect_view()
                            }}
                            <button
                                class="filter-tags__clear"
                                on:click=move |_| {
                                    search.set(String::new());
                                    filters.update(|f| f.clear());
                                }
                            >
                                "Сбросить"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </div>
    }
}

/// Чип активного фильтра с кнопкой снятия
#[component]
pub fn FilterTag(
    #[prop(into)]
    label: String,
    on_remove: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}

/// Выпадающий список для одного поля фильтра.
///
/// `options` — пары `(value, label)`; пустое значение снимает фильтр.
#[component]
pub fn FilterSelect(
    filters: RwSignal<FilterSet>,
    #[prop(into)]
    field: String,
    #[prop(into)]
    label: String,
    #[prop(into)]
    options: Signal<Vec<(String, String)>>,
) -> impl IntoView {
    let field = StoredValue::new(field);
    let caption = label.clone();
    let current = move || {
        filters.with(|f| {
            f.value_of(&field.get_value())
                .map(str::to_string)
                .unwrap_or_default()
        })
    };

    view! {
        <div class="form-group">
            <label>{label}</label>
            <select
                class="form-select"
                prop:value=current
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    let chip_label = options
                        .with_untracked(|opts| {
                            opts.iter()
                                .find(|(v, _)| *v == value)
                                .map(|(_, l)| format!("{}: {}", caption, l))
                        })
                        .unwrap_or_default();
                    filters.update(|f| f.set(&field.get_value(), &value, &chip_label));
                }
            >
                <option value="">"Все"</option>
                {move || {
                    let selected = current();
                    options
                        .get()
                        .into_iter()
                        .map(|(value, text)| {
                            let is_selected = value == selected;
                            view! { <option value=value selected=is_selected>{text}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}
