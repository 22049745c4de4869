use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use contracts::domain::a006_corrective_maintenance::aggregate::{
    CorrectiveMaintenance, CorrectiveMaintenanceDto, IncidentListQuery, IncidentStatus,
};
use contracts::domain::common::StatusChangeRequest;
use serde_json::json;

use super::a005_work_order::csv_attachment;
use crate::domain::a006_corrective_maintenance;
use crate::shared::error::{parse_id, ApiResult, ServiceError};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/corrective_maintenance?status=&priority=&equipment_id=&open_only=&q=
pub async fn list(
    Query(query): Query<IncidentListQuery>,
) -> ApiResult<Json<Vec<CorrectiveMaintenance>>> {
    Ok(Json(a006_corrective_maintenance::service::list(&query).await?))
}

/// GET /api/corrective_maintenance/export
pub async fn export_csv(Query(query): Query<IncidentListQuery>) -> ApiResult<impl IntoResponse> {
    let body = a006_corrective_maintenance::service::export_csv(&query).await?;
    Ok(csv_attachment("incidents.csv", body))
}

/// GET /api/corrective_maintenance/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<CorrectiveMaintenance>> {
    let incident = a006_corrective_maintenance::service::get_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ServiceError::not_found("Инцидент не найден"))?;
    Ok(Json(incident))
}

/// POST /api/corrective_maintenance
///
/// Новый инцидент регистрируется от имени текущего пользователя
pub async fn upsert(
    user: CurrentUser,
    Json(dto): Json<CorrectiveMaintenanceDto>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone().filter(|id| !id.is_empty()) {
        Some(id) => {
            a006_corrective_maintenance::service::update(dto).await?;
            id
        }
        None => a006_corrective_maintenance::service::create(dto, user.user_id())
            .await?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// POST /api/corrective_maintenance/:id/status
pub async fn change_status(
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> ApiResult<Json<CorrectiveMaintenance>> {
    let next = req
        .parse::<IncidentStatus>()
        .map_err(ServiceError::validation)?;
    let incident =
        a006_corrective_maintenance::service::change_status(parse_id(&id)?, next, user.username())
            .await?;
    Ok(Json(incident))
}

/// DELETE /api/corrective_maintenance/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if a006_corrective_maintenance::service::delete(parse_id(&id)?).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Инцидент не найден").into())
    }
}

/// POST /api/corrective_maintenance/testdata
pub async fn insert_test_data(user: CurrentUser) -> ApiResult<StatusCode> {
    a006_corrective_maintenance::service::insert_test_data(user.user_id()).await?;
    Ok(StatusCode::OK)
}
