use contracts::dashboards::d100_overview::OverviewResponse;

use crate::shared::api_utils::{get_json, query_string};

const API_BASE: &str = "/api/d100";

/// Показатели «Обзора»; пустой `factory_id` значит все заводы
pub async fn get_overview(factory_id: &str) -> Result<OverviewResponse, String> {
    let pairs = vec![("factory_id".to_string(), factory_id.to_string())];
    get_json(&format!("{}/overview{}", API_BASE, query_string(&pairs))).await
}
