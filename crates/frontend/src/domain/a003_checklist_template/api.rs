use contracts::domain::a003_checklist_template::{
    ChecklistTemplate, ChecklistTemplateDto, TemplateStatus,
};
use contracts::domain::common::StatusChangeRequest;

use crate::shared::api_utils::{delete, get_json, post_empty, post_json, post_upsert};

pub async fn fetch_all() -> Result<Vec<ChecklistTemplate>, String> {
    get_json("/api/checklist_template").await
}

pub async fn fetch_by_id(id: &str) -> Result<ChecklistTemplate, String> {
    get_json(&format!("/api/checklist_template/{}", id)).await
}

/// Возвращает id сохранённого шаблона.
///
/// Правка пунктов действующего шаблона сохраняется новой версией с другим id.
pub async fn save(dto: &ChecklistTemplateDto) -> Result<String, String> {
    post_upsert("/api/checklist_template", dto).await
}

/// Черновик следующей версии, возвращает его id
pub async fn new_version(id: &str) -> Result<String, String> {
    post_upsert(&format!("/api/checklist_template/{}/new-version", id), &()).await
}

pub async fn change_status(id: &str, status: TemplateStatus) -> Result<ChecklistTemplate, String> {
    post_json(
        &format!("/api/checklist_template/{}/status", id),
        &StatusChangeRequest::new(status),
    )
    .await
}

pub async fn remove(id: &str) -> Result<(), String> {
    delete(&format!("/api/checklist_template/{}", id)).await
}

pub async fn create_test_data() -> Result<(), String> {
    post_empty("/api/checklist_template/testdata").await
}
