use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_factory::aggregate::{Factory, FactoryDto};
use serde_json::json;

use crate::domain::a001_factory;
use crate::shared::error::{parse_id, ApiResult, ServiceError};

/// GET /api/factory
pub async fn list_all() -> ApiResult<Json<Vec<Factory>>> {
    Ok(Json(a001_factory::service::list_all().await?))
}

/// GET /api/factory/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<Factory>> {
    let factory = a001_factory::service::get_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ServiceError::not_found("Завод не найден"))?;
    Ok(Json(factory))
}

/// POST /api/factory
pub async fn upsert(Json(dto): Json<FactoryDto>) -> ApiResult<Json<serde_json::Value>> {
    let id = match dto.id.clone().filter(|id| !id.is_empty()) {
        Some(id) => {
            a001_factory::service::update(dto).await?;
            id
        }
        None => a001_factory::service::create(dto).await?.to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/factory/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if a001_factory::service::delete(parse_id(&id)?).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Завод не найден").into())
    }
}

/// POST /api/factory/testdata
pub async fn insert_test_data() -> ApiResult<StatusCode> {
    a001_factory::service::insert_test_data().await?;
    Ok(StatusCode::OK)
}
