use contracts::domain::a001_factory::{Factory, FactoryDto};

use crate::shared::api_utils::{delete, get_json, post_empty, post_upsert};

pub async fn fetch_all() -> Result<Vec<Factory>, String> {
    get_json("/api/factory").await
}

pub async fn fetch_by_id(id: &str) -> Result<Factory, String> {
    get_json(&format!("/api/factory/{}", id)).await
}

/// Создание или обновление, возвращает id
pub async fn save(dto: &FactoryDto) -> Result<String, String> {
    post_upsert("/api/factory", dto).await
}

pub async fn remove(id: &str) -> Result<(), String> {
    delete(&format!("/api/factory/{}", id)).await
}

pub async fn create_test_data() -> Result<(), String> {
    post_empty("/api/factory/testdata").await
}
