use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a004_pm_plan::aggregate::{
    GenerateResult, PlanStatus, PlanStatusResponse, PmPlan, PmPlanDto,
};
use contracts::domain::common::StatusChangeRequest;
use serde_json::json;

use crate::domain::a004_pm_plan;
use crate::shared::error::{parse_id, ApiResult, ServiceError};

/// GET /api/pm_plan
pub async fn list_all() -> ApiResult<Json<Vec<PmPlan>>> {
    Ok(Json(a004_pm_plan::service::list_all().await?))
}

/// GET /api/pm_plan/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<PmPlan>> {
    let plan = a004_pm_plan::service::get_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ServiceError::not_found("План ТО не найден"))?;
    Ok(Json(plan))
}

/// POST /api/pm_plan
pub async fn upsert(Json(dto): Json<PmPlanDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone().filter(|id| !id.is_empty()) {
        Some(id) => {
            a004_pm_plan::service::update(dto).await?;
            id
        }
        None => a004_pm_plan::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// POST /api/pm_plan/:id/status
pub async fn change_status(
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> ApiResult<Json<PlanStatusResponse>> {
    let next = req.parse::<PlanStatus>().map_err(ServiceError::validation)?;
    let (plan, generated) = a004_pm_plan::service::change_status(parse_id(&id)?, next).await?;
    Ok(Json(PlanStatusResponse { plan, generated }))
}

/// POST /api/pm_plan/:id/generate
pub async fn generate(Path(id): Path<String>) -> ApiResult<Json<GenerateResult>> {
    Ok(Json(a004_pm_plan::service::generate(parse_id(&id)?).await?))
}

/// DELETE /api/pm_plan/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if a004_pm_plan::service::delete(parse_id(&id)?).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("План ТО не найден").into())
    }
}

/// POST /api/pm_plan/testdata
pub async fn insert_test_data() -> ApiResult<StatusCode> {
    a004_pm_plan::service::insert_test_data().await?;
    Ok(StatusCode::OK)
}
