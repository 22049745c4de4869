use contracts::domain::a006_corrective_maintenance::aggregate::{
    CorrectiveMaintenance, CorrectiveMaintenanceDto, IncidentStatus,
};
use contracts::domain::common::StatusChangeRequest;

use crate::shared::api_utils::{
    delete, download_csv, get_json, post_empty, post_json, post_upsert, query_string,
};

pub async fn fetch_list(pairs: &[(String, String)]) -> Result<Vec<CorrectiveMaintenance>, String> {
    get_json(&format!("/api/corrective_maintenance{}", query_string(pairs))).await
}

pub async fn fetch_by_id(id: &str) -> Result<CorrectiveMaintenance, String> {
    get_json(&format!("/api/corrective_maintenance/{}", id)).await
}

pub async fn save(dto: &CorrectiveMaintenanceDto) -> Result<String, String> {
    post_upsert("/api/corrective_maintenance", dto).await
}

pub async fn change_status(
    id: &str,
    status: IncidentStatus,
) -> Result<CorrectiveMaintenance, String> {
    post_json(
        &format!("/api/corrective_maintenance/{}/status", id),
        &StatusChangeRequest::new(status),
    )
    .await
}

pub async fn export(pairs: &[(String, String)]) -> Result<(), String> {
    download_csv(
        &format!("/api/corrective_maintenance/export{}", query_string(pairs)),
        "incidents.csv",
    )
    .await
}

pub async fn remove(id: &str) -> Result<(), String> {
    delete(&format!("/api/corrective_maintenance/{}", id)).await
}

pub async fn create_test_data() -> Result<(), String> {
    post_empty("/api/corrective_maintenance/testdata").await
}
