use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::system::scheduler::SchedulerRunResult;
use cron::Schedule;
use std::str::FromStr;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use super::state;
use crate::domain::a004_pm_plan::{generator, repository as plan_repository};
use crate::domain::a005_work_order;
use crate::shared::config::SchedulerConfig;
use crate::shared::error::ServiceError;
use crate::shared::logger;

/// Как часто проверять, не наступило ли время прогона
const CHECK_INTERVAL_SECONDS: u64 = 30;

/// Разбор cron-выражения из конфигурации (формат с секундами)
pub fn parse_schedule(expr: &str) -> Result<Schedule> {
    Schedule::from_str(expr.trim())
        .map_err(|e| anyhow::anyhow!("Некорректное cron-выражение '{}': {}", expr, e))
}

/// Ближайший запуск строго после `after`
pub fn next_run_after(schedule: &Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&after).next()
}

/// Фоновый воркер планировщика ТО.
pub struct PmScheduler {
    schedule: Schedule,
    lookahead_days: i64,
}

impl PmScheduler {
    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        let schedule = parse_schedule(&config.cron)?;
        state::configure(config.enabled, &config.cron, config.lookahead_days);
        Ok(Self {
            schedule,
            lookahead_days: config.lookahead_days,
        })
    }

    /// Запускает цикл проверки расписания.
    pub async fn run_loop(self) {
        let mut next_run = next_run_after(&self.schedule, Utc::now());
        state::set_next_run(next_run);
        info!(
            "PM scheduler started, lookahead {} days, next run at {:?}",
            self.lookahead_days, next_run
        );

        let mut interval = time::interval(time::Duration::from_secs(CHECK_INTERVAL_SECONDS));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let now = Utc::now();
            let Some(due) = next_run else {
                warn!("PM scheduler: no upcoming run for the configured cron expression");
                return;
            };
            if due > now {
                continue;
            }

            if let Err(e) = run_once(self.lookahead_days).await {
                error!("PM scheduler run failed: {:?}", e);
            }
            next_run = next_run_after(&self.schedule, now);
            state::set_next_run(next_run);
        }
    }
}

/// Один прогон: по каждому действующему плану создаются наряды следующего периода.
///
/// Если прогон уже выполняется, возвращает ошибку.
pub async fn run_once(lookahead_days: i64) -> Result<SchedulerRunResult> {
    if !state::try_start() {
        return Err(ServiceError::conflict("Планировщик уже выполняется"));
    }
    let result = roll_forward(lookahead_days).await;
    state::finish(&result.as_ref().map(Clone::clone).map_err(|e| e.to_string()));

    if let Ok(r) = &result {
        if r.work_orders_created > 0 {
            logger::log(
                "scheduler",
                &format!(
                    "Планировщик ТО: проверено планов {}, создано нарядов {}",
                    r.plans_checked, r.work_orders_created
                ),
            );
        }
    }
    result
}

async fn roll_forward(lookahead_days: i64) -> Result<SchedulerRunResult> {
    let today = Utc::now().date_naive();
    let plans = plan_repository::list_active().await?;
    let mut result = SchedulerRunResult {
        plans_checked: plans.len(),
        work_orders_created: 0,
    };

    for plan in &plans {
        let existing = a005_work_order::repository::list_by_plan(&plan.to_string_id()).await?;
        for order in generator::rollover_orders(plan, &existing, today, lookahead_days) {
            a005_work_order::service::create_for_plan(plan, &order).await?;
            result.work_orders_created += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_schedule() {
        assert!(parse_schedule("0 */15 * * * *").is_ok());
        assert!(parse_schedule("every minute").is_err());
    }

    #[test]
    fn test_next_run_after_quarter_hour() {
        let schedule = parse_schedule("0 */15 * * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 1, 10, 7, 12).unwrap();
        assert_eq!(
            next_run_after(&schedule, after),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_next_run_after_daily() {
        let schedule = parse_schedule("0 30 6 * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
        assert_eq!(
            next_run_after(&schedule, after),
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 6, 30, 0).unwrap())
        );
    }
}
