use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use contracts::domain::a005_work_order::aggregate::{
    ChecklistResult, WorkOrder, WorkOrderDto, WorkOrderListQuery, WorkOrderStatus,
};
use contracts::domain::common::StatusChangeRequest;
use serde_json::json;

use crate::domain::a005_work_order;
use crate::shared::error::{parse_id, ApiResult, ServiceError};
use crate::system::auth::extractor::CurrentUser;

/// Заголовки ответа с CSV-файлом
pub(crate) fn csv_attachment(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// GET /api/work_order?status=&equipment_id=&pm_plan_id=&assignee_id=&date_from=&date_to=&overdue_only=
pub async fn list(Query(query): Query<WorkOrderListQuery>) -> ApiResult<Json<Vec<WorkOrder>>> {
    Ok(Json(a005_work_order::service::list(&query).await?))
}

/// GET /api/work_order/export (те же фильтры, что у списка)
pub async fn export_csv(Query(query): Query<WorkOrderListQuery>) -> ApiResult<impl IntoResponse> {
    let body = a005_work_order::service::export_csv(&query).await?;
    Ok(csv_attachment("work_orders.csv", body))
}

/// GET /api/work_order/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<WorkOrder>> {
    let order = a005_work_order::service::get_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ServiceError::not_found("Заказ-наряд не найден"))?;
    Ok(Json(order))
}

/// POST /api/work_order
pub async fn upsert(Json(dto): Json<WorkOrderDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone().filter(|id| !id.is_empty()) {
        Some(id) => {
            a005_work_order::service::update(dto).await?;
            id
        }
        None => a005_work_order::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// POST /api/work_order/:id/status
pub async fn change_status(
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> ApiResult<Json<WorkOrder>> {
    let next = req
        .parse::<WorkOrderStatus>()
        .map_err(ServiceError::validation)?;
    let order =
        a005_work_order::service::change_status(parse_id(&id)?, next, user.username()).await?;
    Ok(Json(order))
}

/// POST /api/work_order/:id/results
pub async fn record_results(
    Path(id): Path<String>,
    Json(results): Json<Vec<ChecklistResult>>,
) -> ApiResult<Json<WorkOrder>> {
    let order = a005_work_order::service::record_results(parse_id(&id)?, results).await?;
    Ok(Json(order))
}

/// DELETE /api/work_order/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if a005_work_order::service::delete(parse_id(&id)?).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Заказ-наряд не найден").into())
    }
}

/// POST /api/work_order/testdata
pub async fn insert_test_data() -> ApiResult<StatusCode> {
    a005_work_order::service::insert_test_data().await?;
    Ok(StatusCode::OK)
}
