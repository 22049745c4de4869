use contracts::domain::a004_pm_plan::{
    GenerateResult, PlanStatus, PlanStatusResponse, PmPlan, PmPlanDto,
};
use contracts::domain::common::StatusChangeRequest;

use crate::shared::api_utils::{delete, get_json, post_empty, post_json, post_upsert};

pub async fn fetch_all() -> Result<Vec<PmPlan>, String> {
    get_json("/api/pm_plan").await
}

pub async fn fetch_by_id(id: &str) -> Result<PmPlan, String> {
    get_json(&format!("/api/pm_plan/{}", id)).await
}

pub async fn save(dto: &PmPlanDto) -> Result<String, String> {
    post_upsert("/api/pm_plan", dto).await
}

/// Смена статуса; активация сразу создаёт наряды и возвращает итог
pub async fn change_status(id: &str, status: PlanStatus) -> Result<PlanStatusResponse, String> {
    post_json(
        &format!("/api/pm_plan/{}/status", id),
        &StatusChangeRequest::new(status),
    )
    .await
}

/// Догенерировать наряды по действующему плану (уже созданные пропускаются)
pub async fn generate(id: &str) -> Result<GenerateResult, String> {
    post_json(&format!("/api/pm_plan/{}/generate", id), &()).await
}

pub async fn remove(id: &str) -> Result<(), String> {
    delete(&format!("/api/pm_plan/{}", id)).await
}

pub async fn create_test_data() -> Result<(), String> {
    post_empty("/api/pm_plan/testdata").await
}
