pub mod repository;

use contracts::shared::logger::LogLevel;
use repository::log_event_internal;

/// Логирование события на сервере
///
/// # Примеры
/// ```ignore
/// logger::log("startup", "Сервер запущен");
/// logger::log("a004_pm_plan", "План PM-0003 активирован");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal(LogLevel::Info, "server", category, message);
}

pub fn warn(category: &str, message: &str) {
    log_event_internal(LogLevel::Warn, "server", category, message);
}

pub fn error(category: &str, message: &str) {
    log_event_internal(LogLevel::Error, "server", category, message);
}
