use contracts::domain::a002_equipment::{Equipment, EquipmentDto};
use contracts::shared::pagination::ListResponse;

use crate::shared::api_utils::{delete, get_json, post_empty, post_upsert, query_string};

/// Страница списка; `pairs` это фильтры плюс `page`/`page_size`
pub async fn fetch_page(pairs: &[(String, String)]) -> Result<ListResponse<Equipment>, String> {
    get_json(&format!("/api/equipment{}", query_string(pairs))).await
}

/// Полный список (для справочников и мастера), при необходимости по заводу
pub async fn fetch_all(factory_id: Option<&str>) -> Result<Vec<Equipment>, String> {
    let pairs: Vec<(String, String)> = factory_id
        .map(|id| vec![("factory_id".to_string(), id.to_string())])
        .unwrap_or_default();
    get_json(&format!("/api/equipment/all{}", query_string(&pairs))).await
}

pub async fn fetch_by_id(id: &str) -> Result<Equipment, String> {
    get_json(&format!("/api/equipment/{}", id)).await
}

pub async fn save(dto: &EquipmentDto) -> Result<String, String> {
    post_upsert("/api/equipment", dto).await
}

pub async fn remove(id: &str) -> Result<(), String> {
    delete(&format!("/api/equipment/{}", id)).await
}

pub async fn create_test_data() -> Result<(), String> {
    post_empty("/api/equipment/testdata").await
}
