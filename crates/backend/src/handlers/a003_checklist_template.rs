use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a003_checklist_template::aggregate::{
    ChecklistTemplate, ChecklistTemplateDto, TemplateStatus,
};
use contracts::domain::common::StatusChangeRequest;
use serde_json::json;

use crate::domain::a003_checklist_template;
use crate::shared::error::{parse_id, ApiResult, ServiceError};

/// GET /api/checklist_template
pub async fn list_all() -> ApiResult<Json<Vec<ChecklistTemplate>>> {
    Ok(Json(a003_checklist_template::service::list_all().await?))
}

/// GET /api/checklist_template/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<ChecklistTemplate>> {
    let template = a003_checklist_template::service::get_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ServiceError::not_found("Шаблон чек-листа не найден"))?;
    Ok(Json(template))
}

/// POST /api/checklist_template
///
/// Изменение пунктов действующего шаблона создаёт новую версию, её id и возвращается
pub async fn upsert(Json(dto): Json<ChecklistTemplateDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = if dto.id.as_deref().is_some_and(|id| !id.is_empty()) {
        a003_checklist_template::service::update(dto).await?
    } else {
        a003_checklist_template::service::create(dto).await?
    };
    Ok(Json(json!({ "id": id.to_string() })))
}

/// POST /api/checklist_template/:id/new-version
pub async fn new_version(Path(id): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    let new_id = a003_checklist_template::service::new_version(parse_id(&id)?).await?;
    Ok(Json(json!({ "id": new_id.to_string() })))
}

/// POST /api/checklist_template/:id/status
pub async fn change_status(
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> ApiResult<Json<ChecklistTemplate>> {
    let next = req
        .parse::<TemplateStatus>()
        .map_err(ServiceError::validation)?;
    let template = a003_checklist_template::service::change_status(parse_id(&id)?, next).await?;
    Ok(Json(template))
}

/// DELETE /api/checklist_template/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if a003_checklist_template::service::delete(parse_id(&id)?).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Шаблон чек-листа не найден").into())
    }
}

/// POST /api/checklist_template/testdata
pub async fn insert_test_data() -> ApiResult<StatusCode> {
    a003_checklist_template::service::insert_test_data().await?;
    Ok(StatusCode::OK)
}
