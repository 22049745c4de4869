use contracts::shared::logger::{CreateLogRequest, LogEntry, LogLevel};

use crate::shared::api_utils::{delete, get_json, post_no_content};

pub async fn fetch_logs() -> Result<Vec<LogEntry>, String> {
    get_json("/api/logs").await
}

pub async fn clear_logs() -> Result<(), String> {
    delete("/api/logs").await
}

/// Запись клиентского события в системный лог
pub async fn write_log(level: LogLevel, category: &str, message: &str) -> Result<(), String> {
    let request = CreateLogRequest {
        level: level.as_str().to_string(),
        source: "client".to_string(),
        category: category.to_string(),
        message: message.to_string(),
    };
    post_no_content("/api/logs", &request).await
}
