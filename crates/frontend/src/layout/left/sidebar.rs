//! Боковое меню с раскрывающимися группами

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    items: Vec<(&'static str, &'static str)>, // (tab key, icon)
    admin_only: bool,
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "references",
            label: "Справочники",
            icon: "folder",
            items: vec![
                ("a001_factory", "factory"),
                ("a002_equipment", "equipment"),
                ("a003_checklist_template", "checklist"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "planning",
            label: "Планирование ТО",
            icon: "calendar",
            items: vec![
                ("a004_pm_plan", "calendar"),
                ("u100_pm_plan_wizard", "wizard"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "maintenance",
            label: "Обслуживание",
            icon: "work-order",
            items: vec![
                ("a005_work_order", "work-order"),
                ("a006_corrective_maintenance", "incident"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "journal",
            label: "Журнал",
            icon: "log",
            items: vec![("sys_logs", "log")],
            admin_only: false,
        },
        MenuGroup {
            id: "settings",
            label: "Администрирование",
            icon: "settings",
            items: vec![("sys_users", "users"), ("sys_scheduler", "clock")],
            admin_only: true,
        },
    ]
}

/// Группы, видимые пользователю
fn visible_groups(is_admin: bool) -> Vec<MenuGroup> {
    get_menu_groups()
        .into_iter()
        .filter(|g| is_admin || !g.admin_only)
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();
    let is_admin = Memo::new(move |_| auth_state.with(|s| s.is_admin()));

    let expanded_groups = RwSignal::new(vec![
        "references".to_string(),
        "planning".to_string(),
        "maintenance".to_string(),
    ]);

    let is_active = move |key: &str| ctx.active.with(|a| a.as_deref() == Some(key));

    view! {
        <div class="app-sidebar__content">
            <div
                class="app-sidebar__item"
                class:app-sidebar__item--active=move || is_active("d100_overview")
                style:padding-left="12px"
                on:click=move |_| ctx.open_tab("d100_overview", tab_label_for_key("d100_overview"))
            >
                <div class="app-sidebar__item-content">
                    {icon("dashboard")}
                    <span>{tab_label_for_key("d100_overview")}</span>
                </div>
            </div>

            {move || visible_groups(is_admin.get()).into_iter().map(|group| {
                let gid = StoredValue::new(group.id.to_string());
                let toggle = move |_| {
                    let id = gid.get_value();
                    expanded_groups.update(|items| {
                        if let Some(pos) = items.iter().position(|x| x == &id) {
                            items.remove(pos);
                        } else {
                            items.push(id);
                        }
                    });
                };
                let is_expanded = move || expanded_groups.with(|g| g.contains(&gid.get_value()));

                view! {
                    <div>
                        <div class="app-sidebar__item" style:padding-left="12px" on:click=toggle>
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=is_expanded
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>

                        <Show when=is_expanded>
                            <div class="app-sidebar__children">
                                {group.items.iter().map(|&(key, icon_name)| {
                                    let label = tab_label_for_key(key);
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || is_active(key)
                                            style:padding-left="10px"
                                            on:click=move |_| ctx.open_tab(key, label)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(icon_name)}
                                                <span>{label}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_groups_hidden_for_others() {
        let ids: Vec<_> = visible_groups(false).iter().map(|g| g.id).collect();
        assert!(!ids.contains(&"settings"));
        let ids: Vec<_> = visible_groups(true).iter().map(|g| g.id).collect();
        assert!(ids.contains(&"settings"));
    }

    #[test]
    fn test_every_menu_item_has_label() {
        for group in get_menu_groups() {
            for (key, _) in group.items {
                assert!(!tab_label_for_key(key).is_empty(), "no label for {}", key);
            }
        }
    }
}
