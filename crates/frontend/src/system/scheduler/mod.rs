//! Состояние планировщика ТО и ручной запуск

use contracts::system::scheduler::{SchedulerRunResult, SchedulerStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::api_utils::{get_json, post_json};
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::icons::icon;
use crate::shared::toast::{notify_error, notify_success};
use crate::system::auth::guard::RequireAdmin;

pub async fn fetch_status() -> Result<SchedulerStatus, String> {
    get_json("/api/system/scheduler").await
}

pub async fn run_now() -> Result<SchedulerRunResult, String> {
    post_json("/api/system/scheduler/run", &serde_json::json!({})).await
}

#[component]
pub fn SchedulerPage() -> impl IntoView {
    view! {
        <RequireAdmin>
            <SchedulerPanel/>
        </RequireAdmin>
    }
}

#[component]
fn SchedulerPanel() -> impl IntoView {
    let status = RwSignal::new(Option::<SchedulerStatus>::None);
    let running = RwSignal::new(false);
    let last_result = RwSignal::new(Option::<SchedulerRunResult>::None);

    let load = move || {
        spawn_local(async move {
            match fetch_status().await {
                Ok(s) => status.set(Some(s)),
                Err(e) => notify_error(e),
            }
        });
    };
    load();

    let run = move |_| {
        running.set(true);
        spawn_local(async move {
            match run_now().await {
                Ok(result) => {
                    notify_success(format!(
                        "Проверено планов: {}, создано нарядов: {}",
                        result.plans_checked, result.work_orders_created
                    ));
                    last_result.set(Some(result));
                    load();
                }
                Err(e) => notify_error(e),
            }
            running.set(false);
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("clock")}
                    <h1 class="page__title">"Планировщик ТО"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=run
                        disabled=Signal::derive(move || {
                            running.get() || status.with(|s| s.as_ref().map(|s| s.is_running).unwrap_or(false))
                        })
                    >
                        {icon("play")}" Запустить сейчас"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || match status.get() {
                    None => view! { <Spinner/> }.into_any(),
                    Some(s) => view! {
                        <Card>
                            <dl class="info-list">
                                <dt>"Состояние"</dt>
                                <dd>
                                    {if s.enabled {
                                        view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Включён"</Badge> }.into_any()
                                    } else {
                                        view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Subtle>"Выключен"</Badge> }.into_any()
                                    }}
                                    {s.is_running.then(|| view! { " " <Spinner size=SpinnerSize::Tiny/> " выполняется" })}
                                </dd>
                                <dt>"Расписание (cron)"</dt>
                                <dd><code>{s.cron.clone()}</code></dd>
                                <dt>"Горизонт планирования"</dt>
                                <dd>{format!("{} дн.", s.lookahead_days)}</dd>
                                <dt>"Последний запуск"</dt>
                                <dd>{format_datetime_opt(s.last_run_at.as_ref())}</dd>
                                <dt>"Результат"</dt>
                                <dd>
                                    {s.last_run_status.clone().unwrap_or_else(|| "—".to_string())}
                                    {format!(" (создано нарядов: {})", s.last_run_created)}
                                </dd>
                                <dt>"Следующий запуск"</dt>
                                <dd>{format_datetime_opt(s.next_run_at.as_ref())}</dd>
                            </dl>
                        </Card>
                    }.into_any(),
                }}
                {move || last_result.get().map(|r| view! {
                    <div class="alert alert--info">
                        {format!(
                            "Ручной запуск: проверено планов {}, создано нарядов {}",
                            r.plans_checked, r.work_orders_created
                        )}
                    </div>
                })}
            </div>
        </div>
    }
}
