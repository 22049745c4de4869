use crate::dashboards::d100_overview::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::option_select::OptionSelect;
use crate::shared::components::stat_card::{StatCard, StatFormat, StatTone};
use crate::shared::components::status_badge::{PriorityBadge, StatusBadge};
use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::icons::icon;
use crate::shared::lookup::{equipment_lookup, factory_lookup};
use contracts::dashboards::d100_overview::{CountByKey, OverviewResponse, DUE_SOON_DAYS};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn compliance_tone(percent: f64) -> StatTone {
    if percent >= 90.0 {
        StatTone::Good
    } else if percent >= 70.0 {
        StatTone::Warning
    } else {
        StatTone::Bad
    }
}

fn overdue_tone(count: usize) -> StatTone {
    if count == 0 {
        StatTone::Good
    } else {
        StatTone::Bad
    }
}

/// Ширина полосы в процентах от максимума группы
fn bar_width(count: usize, max: usize) -> f64 {
    if max == 0 {
        0.0
    } else {
        count as f64 * 100.0 / max as f64
    }
}

#[component]
fn CountBars(#[prop(into)] title: String, rows: Vec<CountByKey>) -> impl IntoView {
    let max = rows.iter().map(|r| r.count).max().unwrap_or(0);
    view! {
        <div class="dashboard-panel">
            <h3 class="dashboard-panel__title">{title}</h3>
            {rows
                .into_iter()
                .map(|r| {
                    let width = format!("width: {:.0}%", bar_width(r.count, max));
                    view! {
                        <div class="count-bar" data-key=r.key>
                            <span class="count-bar__label">{r.label}</span>
                            <span class="count-bar__track">
                                <span class="count-bar__fill" style=width></span>
                            </span>
                            <span class="count-bar__value">{r.count}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Дашборд «Обзор»: оборудование, наряды, инциденты и выполнение плана ТО
#[component]
pub fn OverviewDashboard() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let factories = factory_lookup();
    let equipment = equipment_lookup();

    let factory_id = RwSignal::new(String::new());
    let data = RwSignal::new(None::<OverviewResponse>);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let load = move || {
        let factory = factory_id.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::get_overview(&factory).await {
                Ok(resp) => data.set(Some(resp)),
                Err(e) => {
                    log::error!("Failed to load D100 overview: {}", e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| {
        factory_id.track();
        if ctx.active.get().as_deref() == Some("d100_overview") {
            load();
        }
    });

    let metric = move |f: fn(&OverviewResponse) -> f64| {
        Signal::derive(move || data.with(|d| d.as_ref().map(f)))
    };
    let compliance = metric(|d| d.pm_compliance_percent);
    let overdue = metric(|d| d.overdue_work_orders as f64);
    let open_incidents = metric(|d| {
        d.open_incidents_by_priority.iter().map(|c| c.count).sum::<usize>() as f64
    });
    let open_to = move |key: &'static str, title: &'static str| {
        Callback::new(move |_: ()| ctx.open_tab(key, title))
    };

    view! {
        <div class="page dashboard">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("dashboard")}
                    <h1 class="page__title">"Обзор"</h1>
                    {move || data.with(|d| d.as_ref().map(|d| view! {
                        <span class="page__subtitle">{format!("на {}", format_date(&d.as_of))}</span>
                    }))}
                </div>
                <div class="page__header-right">
                    <OptionSelect
                        value=factory_id
                        on_change=Callback::new(move |v| factory_id.set(v))
                        options=Signal::derive(move || factories.with(|l| l.options()))
                        placeholder="Все заводы"
                    />
                    <button
                        class="button button--secondary"
                        disabled=move || loading.get()
                        on:click=move |_| load()
                    >
                        {icon("refresh")}" Обновить"
                    </button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="stat-grid">
                    <StatCard
                        label="Заводы"
                        icon_name="factory"
                        value=metric(|d| d.factory_count as f64)
                        format=StatFormat::Integer
                        on_click=open_to("a001_factory", "Заводы")
                    />
                    <StatCard
                        label="Оборудование"
                        icon_name="equipment"
                        value=metric(|d| d.equipment_count as f64)
                        format=StatFormat::Integer
                        on_click=open_to("a002_equipment", "Оборудование")
                    />
                    <StatCard
                        label="Выполнение плана ТО"
                        icon_name="calendar"
                        value=compliance
                        format=StatFormat::Percent
                        tone=Signal::derive(move || compliance.get().map(compliance_tone).unwrap_or_default())
                        subtitle=Signal::derive(|| Some("нарядов в срок наступления".to_string()))
                    />
                    <StatCard
                        label="Просроченные наряды"
                        icon_name="clock"
                        value=overdue
                        format=StatFormat::Integer
                        tone=Signal::derive(move || overdue.get().map(|v| overdue_tone(v as usize)).unwrap_or_default())
                        on_click=open_to("a005_work_order", "Заказ-наряды")
                    />
                    <StatCard
                        label="Наряды на неделю"
                        icon_name="work-order"
                        value=metric(|d| d.due_soon_work_orders as f64)
                        format=StatFormat::Integer
                        subtitle=Signal::derive(|| Some(format!("ближайшие {} дней", DUE_SOON_DAYS)))
                        on_click=open_to("a005_work_order", "Заказ-наряды")
                    />
                    <StatCard
                        label="Открытые инциденты"
                        icon_name="incident"
                        value=open_incidents
                        format=StatFormat::Integer
                        tone=Signal::derive(move || open_incidents.get().map(|v| overdue_tone(v as usize)).unwrap_or_default())
                        on_click=open_to("a006_corrective_maintenance", "Инциденты")
                    />
                </div>

                {move || data.get().map(|d| view! {
                    <div class="dashboard-grid">
                        <CountBars title="Оборудование по статусам" rows=d.equipment_by_status.clone()/>
                        <CountBars title="Наряды по статусам" rows=d.work_orders_by_status.clone()/>
                        <CountBars title="Открытые инциденты по приоритету" rows=d.open_incidents_by_priority.clone()/>
                    </div>

                    <div class="dashboard-panel">
                        <h3 class="dashboard-panel__title">"Последние инциденты"</h3>
                        {if d.recent_incidents.is_empty() {
                            view! { <div class="empty-state">"Инцидентов нет"</div> }.into_any()
                        } else {
                            view! {
                                <table class="table__data">
                                    <tbody>
                                        {d.recent_incidents.iter().cloned().map(|i| {
                                            let id = i.id.clone();
                                            let code = i.code.clone();
                                            view! {
                                                <tr
                                                    class="table__row--clickable"
                                                    on:click=move |_| ctx.open_detail("a006_corrective_maintenance", Some(&id), &code)
                                                >
                                                    <td>{i.code}</td>
                                                    <td>{i.description}</td>
                                                    <td>{equipment.with(|l| l.name(&i.equipment_id))}</td>
                                                    <td><PriorityBadge priority=i.priority/></td>
                                                    <td><StatusBadge status=i.status/></td>
                                                    <td>{format_datetime(&i.reported_at)}</td>
                                                </tr>
                                            }
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            }.into_any()
                        }}
                    </div>
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_tone_thresholds() {
        assert_eq!(compliance_tone(100.0), StatTone::Good);
        assert_eq!(compliance_tone(90.0), StatTone::Good);
        assert_eq!(compliance_tone(75.5), StatTone::Warning);
        assert_eq!(compliance_tone(10.0), StatTone::Bad);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(0, 0), 0.0);
        assert_eq!(bar_width(5, 10), 50.0);
        assert_eq!(bar_width(10, 10), 100.0);
    }
}
