use contracts::domain::a005_work_order::{ChecklistResult, WorkOrder, WorkOrderDto, WorkOrderStatus};
use contracts::domain::common::StatusChangeRequest;

use crate::shared::api_utils::{
    delete, download_csv, get_json, post_empty, post_json, post_upsert, query_string,
};

/// Список с фильтрами `WorkOrderListQuery` (status, equipment_id, overdue_only, q ...)
pub async fn fetch_list(pairs: &[(String, String)]) -> Result<Vec<WorkOrder>, String> {
    get_json(&format!("/api/work_order{}", query_string(pairs))).await
}

pub async fn fetch_by_id(id: &str) -> Result<WorkOrder, String> {
    get_json(&format!("/api/work_order/{}", id)).await
}

pub async fn save(dto: &WorkOrderDto) -> Result<String, String> {
    post_upsert("/api/work_order", dto).await
}

pub async fn change_status(id: &str, status: WorkOrderStatus) -> Result<WorkOrder, String> {
    post_json(
        &format!("/api/work_order/{}/status", id),
        &StatusChangeRequest::new(status),
    )
    .await
}

/// Записать результаты чек-листа; сервер пересчитывает признаки замеров
pub async fn record_results(id: &str, results: &[ChecklistResult]) -> Result<WorkOrder, String> {
    post_json(&format!("/api/work_order/{}/results", id), &results).await
}

/// Выгрузка CSV с теми же фильтрами, что и у списка
pub async fn export(pairs: &[(String, String)]) -> Result<(), String> {
    download_csv(
        &format!("/api/work_order/export{}", query_string(pairs)),
        "work_orders.csv",
    )
    .await
}

pub async fn remove(id: &str) -> Result<(), String> {
    delete(&format!("/api/work_order/{}", id)).await
}

pub async fn create_test_data() -> Result<(), String> {
    post_empty("/api/work_order/testdata").await
}
