//! Верхняя панель: переключатель меню, название, пользователь и выход

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        spawn_local(async move {
            do_logout(set_auth_state).await;
        });
    };

    let is_sidebar_visible = move || ctx.left_open.get();
    let user_name = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| u.full_name.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| u.username.clone()))
                .unwrap_or_else(|| "Гость".to_string())
        })
    };
    let user_role = move || {
        auth_state.with(|s| s.user_info.as_ref().map(|u| u.role.label()).unwrap_or_default())
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Скрыть меню" } else { "Показать меню" }
                >
                    {icon("menu")}
                </button>
                <span class="top-header__title">"CMMS · Техобслуживание"</span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("users")}
                    <span>{user_name}</span>
                    <span class="top-header__role">{user_role}</span>
                </div>
                <button class="top-header__icon-btn" on:click=logout title="Выход">
                    {icon("logout")}
                </button>
            </div>
        </div>
    }
}
