use contracts::shared::filter::FilterSet;
use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::table::{ColumnDef, ColumnPriority, PaginationMode};
use contracts::system::users::{User, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{ChangePasswordForm, UserForm};
use crate::shared::components::filter_panel::{FilterPanel, FilterSelect};
use crate::shared::components::responsive_table::ResponsiveTable;
use crate::shared::icons::icon;
use crate::shared::toast::{notify_error, notify_success};
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireAdmin;
use crate::system::users::api;

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireAdmin>
            <UsersList/>
        </RequireAdmin>
    }
}

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("username", "Логин", ColumnPriority::Title),
        ColumnDef::new("full_name", "ФИО", ColumnPriority::Primary),
        ColumnDef::new("role", "Роль", ColumnPriority::Primary),
        ColumnDef::new("is_active", "Статус", ColumnPriority::Secondary),
        ColumnDef::new("email", "Email", ColumnPriority::DesktopOnly),
        ColumnDef::new("last_login_at", "Последний вход", ColumnPriority::DesktopOnly),
        ColumnDef::new("actions", "", ColumnPriority::Secondary),
    ]
}

#[derive(Clone)]
enum Dialog {
    Create,
    Edit(User),
    Password(User),
}

#[component]
fn UsersList() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let all_users = RwSignal::new(Vec::<User>::new());
    let filters = RwSignal::new(FilterSet::new());
    let page_size = RwSignal::new(DEFAULT_PAGE_SIZE);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let dialog = RwSignal::new(Option::<Dialog>::None);

    let load = move || {
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(users) => all_users.set(users),
                Err(e) => error.set(Some(format!("Не удалось загрузить пользователей: {}", e))),
            }
            loading.set(false);
        });
    };
    load();

    let rows = Signal::derive(move || filters.with(|f| all_users.with(|users| f.apply(users))));

    let remove = move |user: User| {
        let me = auth_state.with_untracked(|s| s.user_id());
        if me.as_deref() == Some(user.id.as_str()) {
            notify_error("Нельзя удалить собственную учётную запись");
            return;
        }
        spawn_local(async move {
            match api::delete_user(&user.id).await {
                Ok(()) => {
                    notify_success(format!("Пользователь {} удалён", user.username));
                    load();
                }
                Err(e) => notify_error(e),
            }
        });
    };

    let render_cell = Callback::new(move |(user, key): (User, String)| match key.as_str() {
        "username" => view! { <strong>{user.username.clone()}</strong> }.into_any(),
        "full_name" => user.full_name.clone().unwrap_or_default().into_any(),
        "email" => user.email.clone().unwrap_or_default().into_any(),
        "role" => {
            let color = if user.role.is_admin() { BadgeColor::Danger } else { BadgeColor::Brand };
            view! { <Badge appearance=BadgeAppearance::Tint color=color>{user.role.label()}</Badge> }
                .into_any()
        }
        "is_active" => {
            if user.is_active {
                view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Активен"</Badge> }.into_any()
            } else {
                view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Subtle>"Отключён"</Badge> }.into_any()
            }
        }
        "last_login_at" => user
            .last_login_at
            .clone()
            .map(|s| s.replace('T', " ").chars().take(16).collect::<String>())
            .unwrap_or_else(|| "—".to_string())
            .into_any(),
        "actions" => {
            let for_edit = user.clone();
            let for_password = user.clone();
            let for_delete = user.clone();
            view! {
                <Space>
                    <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle
                        on_click=move |ev: leptos::ev::MouseEvent| {
                            ev.stop_propagation();
                            dialog.set(Some(Dialog::Edit(for_edit.clone())));
                        }
                    >{icon("edit")}</Button>
                    <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle
                        on_click=move |ev: leptos::ev::MouseEvent| {
                            ev.stop_propagation();
                            dialog.set(Some(Dialog::Password(for_password.clone())));
                        }
                    >"Пароль"</Button>
                    <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle
                        on_click=move |ev: leptos::ev::MouseEvent| {
                            ev.stop_propagation();
                            remove(for_delete.clone());
                        }
                    >{icon("delete")}</Button>
                </Space>
            }
            .into_any()
        }
        _ => ().into_any(),
    });

    let close = Callback::new(move |_| dialog.set(None));
    let saved = Callback::new(move |_| {
        dialog.set(None);
        load();
    });

    let role_options = Signal::derive(|| {
        UserRole::all()
            .iter()
            .map(|r| (r.as_str().to_string(), r.label().to_string()))
            .collect::<Vec<_>>()
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("users")}
                    <h1 class="page__title">"Пользователи"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| dialog.set(Some(Dialog::Create))>
                        {icon("plus")}" Новый пользователь"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}" Обновить"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <FilterPanel filters=filters search_placeholder="Логин, ФИО или email">
                    <FilterSelect filters=filters field="role" label="Роль" options=role_options/>
                </FilterPanel>

                <ResponsiveTable
                    columns=columns()
                    rows=rows
                    row_id=Callback::new(|u: User| u.id)
                    render_cell=render_cell
                    pagination=Signal::derive(move || PaginationMode::Client { page_size: page_size.get() })
                    on_page_size_change=Callback::new(move |size| page_size.set(size))
                    on_row_click=Callback::new(move |u: User| dialog.set(Some(Dialog::Edit(u))))
                    loading=loading
                    empty_text="Пользователи не найдены"
                />
            </div>

            {move || dialog.get().map(|d| match d {
                Dialog::Create => view! { <UserForm user=None on_close=close on_saved=saved/> }.into_any(),
                Dialog::Edit(user) => view! { <UserForm user=Some(user) on_close=close on_saved=saved/> }.into_any(),
                Dialog::Password(user) => view! {
                    <ChangePasswordForm
                        user_id=user.id.clone()
                        title=format!("Пароль: {}", user.username)
                        require_old=false
                        on_close=close
                    />
                }.into_any(),
            })}
        </div>
    }
}
