use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::layout::tabs::TabPage;
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn Center(children: Children) -> impl IntoView {
    view! {
        <div data-zone="center" class="app-tabs" style="flex: 1; overflow: auto;">
            {children()}
        </div>
    }
}

#[component]
fn TabHeader(tab: TabData) -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    let key = StoredValue::new(tab.key.clone());
    let title = tab.title.clone();
    let hint = tab.title;
    let is_active = Memo::new(move |_| {
        tabs_store.active.get().as_deref() == Some(key.get_value().as_str())
    });

    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key.get_value());
    };

    view! {
        <div
            class="tabs__header"
            class:tabs__header--active=is_active
            title=hint
            on:click=move |_| tabs_store.activate_tab(&key.get_value())
        >
            <span class="tabs__title">{title}</span>
            <button class="tabs__close" on:click=on_close>{icon("x")}</button>
        </div>
    }
}

/// Полоса открытых табов и их содержимое
#[component]
pub fn Tabs() -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    view! {
        <div class="tabs">
            <div class="tabs__bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| (tab.key.clone(), tab.title.clone())
                    children=move |tab| view! { <TabHeader tab=tab /> }
                />
            </div>
            <div class="tabs__content">
                <Show when=move || tabs_store.opened.with(|t| t.is_empty())>
                    <div class="empty-state">"Выберите раздел в меню слева"</div>
                </Show>
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab: TabData| view! { <TabPage tab=tab tabs_store=tabs_store /> }
                />
            </div>
        </div>
    }
}
