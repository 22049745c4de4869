use axum::{extract::Query, Json};
use contracts::dashboards::d100_overview::dto::OverviewResponse;
use serde::Deserialize;

use crate::dashboards::d100_overview;
use crate::shared::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub factory_id: Option<String>,
}

/// GET /api/d100/overview?factory_id=
pub async fn get_overview(Query(query): Query<OverviewQuery>) -> ApiResult<Json<OverviewResponse>> {
    let factory_id = query.factory_id.as_deref().filter(|s| !s.is_empty());
    Ok(Json(d100_overview::service::get_overview(factory_id).await?))
}
