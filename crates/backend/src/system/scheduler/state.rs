use chrono::{DateTime, Utc};
use contracts::system::scheduler::{SchedulerRunResult, SchedulerStatus};
use once_cell::sync::Lazy;
use std::sync::Mutex;

static STATE: Lazy<Mutex<SchedulerStatus>> = Lazy::new(|| Mutex::new(SchedulerStatus::default()));

fn with_state<T>(f: impl FnOnce(&mut SchedulerStatus) -> T) -> T {
    let mut guard = STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

/// Снимок состояния для API
pub fn snapshot() -> SchedulerStatus {
    with_state(|s| s.clone())
}

pub fn configure(enabled: bool, cron: &str, lookahead_days: i64) {
    with_state(|s| {
        s.enabled = enabled;
        s.cron = cron.to_string();
        s.lookahead_days = lookahead_days;
    });
}

pub fn set_next_run(next: Option<DateTime<Utc>>) {
    with_state(|s| s.next_run_at = next);
}

/// Занять планировщик. `false`, если прогон уже идёт.
pub fn try_start() -> bool {
    with_state(|s| {
        if s.is_running {
            false
        } else {
            s.is_running = true;
            true
        }
    })
}

pub fn finish(result: &Result<SchedulerRunResult, String>) {
    with_state(|s| {
        s.is_running = false;
        s.last_run_at = Some(Utc::now());
        match result {
            Ok(r) => {
                s.last_run_status = Some("ok".to_string());
                s.last_run_created = r.work_orders_created;
            }
            Err(e) => {
                s.last_run_status = Some(format!("error: {}", e));
                s.last_run_created = 0;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_guard_and_result() {
        configure(true, "0 0 * * * *", 14);
        assert!(try_start());
        assert!(!try_start());
        assert!(snapshot().is_running);

        finish(&Ok(SchedulerRunResult {
            plans_checked: 2,
            work_orders_created: 3,
        }));
        let s = snapshot();
        assert!(!s.is_running);
        assert_eq!(s.lookahead_days, 14);
        assert_eq!(s.last_run_created, 3);
        assert_eq!(s.last_run_status.as_deref(), Some("ok"));

        assert!(try_start());
        finish(&Err("db locked".into()));
        assert_eq!(snapshot().last_run_status.as_deref(), Some("error: db locked"));
    }
}
