use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_equipment::aggregate::{Equipment, EquipmentDto, EquipmentListQuery};
use contracts::shared::pagination::ListResponse;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a002_equipment;
use crate::shared::error::{parse_id, ApiResult, ServiceError};

/// GET /api/equipment?factory_id=&status=&category=&q=&page=&page_size=
pub async fn list_paginated(
    Query(query): Query<EquipmentListQuery>,
) -> ApiResult<Json<ListResponse<Equipment>>> {
    Ok(Json(a002_equipment::service::list_paginated(query).await?))
}

#[derive(Debug, Deserialize)]
pub struct AllQuery {
    pub factory_id: Option<String>,
}

/// GET /api/equipment/all?factory_id=
///
/// Полный список для выпадающих списков и мастера планов
pub async fn list_all(Query(query): Query<AllQuery>) -> ApiResult<Json<Vec<Equipment>>> {
    let items = match query.factory_id.as_deref().filter(|s| !s.is_empty()) {
        Some(factory_id) => a002_equipment::service::list_by_factory(factory_id).await?,
        None => a002_equipment::service::list_all().await?,
    };
    Ok(Json(items))
}

/// GET /api/equipment/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Equipment>> {
    let equipment = a002_equipment::service::get_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ServiceError::not_found("Оборудование не найдено"))?;
    Ok(Json(equipment))
}

/// POST /api/equipment
pub async fn upsert(Json(dto): Json<EquipmentDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone().filter(|id| !id.is_empty()) {
        Some(id) => {
            a002_equipment::service::update(dto).await?;
            id
        }
        None => a002_equipment::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/equipment/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if a002_equipment::service::delete(parse_id(&id)?).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Оборудование не найдено").into())
    }
}

/// POST /api/equipment/testdata
pub async fn insert_test_data() -> ApiResult<StatusCode> {
    a002_equipment::service::insert_test_data().await?;
    Ok(StatusCode::OK)
}
