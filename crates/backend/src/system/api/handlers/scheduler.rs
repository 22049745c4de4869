use axum::Json;
use contracts::system::scheduler::{SchedulerRunResult, SchedulerStatus};

use crate::shared::error::ApiResult;
use crate::system::scheduler::{self, state};

/// GET /api/system/scheduler
pub async fn get_status() -> Json<SchedulerStatus> {
    Json(state::snapshot())
}

/// POST /api/system/scheduler/run
///
/// Внеочередной прогон с горизонтом из конфигурации
pub async fn run_now() -> ApiResult<Json<SchedulerRunResult>> {
    let lookahead_days = state::snapshot().lookahead_days;
    Ok(Json(scheduler::run_once(lookahead_days).await?))
}
