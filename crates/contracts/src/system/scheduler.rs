use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Состояние планировщика ТО (ответ `GET /api/system/scheduler`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchedulerStatus {
    pub enabled: bool,
    pub cron: String,
    pub lookahead_days: i64,
    pub is_running: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_status: Option<String>,
    pub last_run_created: usize,
}

/// Итог одного прогона планировщика
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SchedulerRunResult {
    pub plans_checked: usize,
    pub work_orders_created: usize,
}
