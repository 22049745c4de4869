use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

use crate::shared::config::{self, Config};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Собрать sqlite URL из пути к файлу (с поддержкой путей Windows)
pub fn build_sqlite_url(path: &std::path::Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Открыть соединение с БД по настройкам и сохранить его глобально
pub async fn initialize_database(cfg: &Config) -> anyhow::Result<()> {
    let db_path = config::get_database_path(cfg)?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(&db_path);
    tracing::info!("Connecting to database: {}", db_url);

    let conn = Database::connect(&db_url).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_unix_path_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/cmms/cmms.db")),
            "sqlite:///var/lib/cmms/cmms.db?mode=rwc"
        );
    }

    #[test]
    fn test_windows_path_url() {
        assert_eq!(
            build_sqlite_url(Path::new("C:\\cmms\\cmms.db")),
            "sqlite:///C:/cmms/cmms.db?mode=rwc"
        );
    }
}
