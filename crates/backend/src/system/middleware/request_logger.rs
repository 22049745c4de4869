use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_number;

/// Строка журнала запроса: `время | длительность | размер | статус метод путь`.
///
/// Время подсвечивается голубым для 2xx и коричневым для остальных ответов.
pub fn format_line(
    time: &str,
    millis: u128,
    size: Option<usize>,
    status: StatusCode,
    method: &Method,
    path: &str,
) -> String {
    let color = if status.is_success() { "36" } else { "33" };
    let size = size.map(format_number).unwrap_or_else(|| "error".to_string());
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color,
        time,
        millis,
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

/// Middleware для логирования HTTP запросов в консоль
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Тело читается целиком, чтобы узнать реальный размер
    let bytes = to_bytes(body, usize::MAX).await.ok();
    let time = Local::now().format("%H:%M:%S").to_string();

    println!(
        "{}",
        format_line(
            &time,
            start.elapsed().as_millis(),
            bytes.as_ref().map(|b| b.len()),
            parts.status,
            &method,
            &path,
        )
    );
    if parts.status.is_server_error() {
        tracing::warn!("{} {} -> {}", method, path, parts.status);
    }

    match bytes {
        Some(b) => Response::from_parts(parts, Body::from(b)),
        None => Response::from_parts(parts, Body::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line(
            "10:15:00",
            12,
            Some(15340),
            StatusCode::OK,
            &Method::GET,
            "/api/work_order",
        );
        assert!(line.starts_with("\x1b[36m10:15:00"));
        assert!(line.contains("15.340"));
        assert!(line.ends_with("200    GET /api/work_order"));
    }

    #[test]
    fn test_format_line_error_body() {
        let line = format_line(
            "10:15:00",
            3,
            None,
            StatusCode::CONFLICT,
            &Method::POST,
            "/api/pm_plan/1/status",
        );
        assert!(line.starts_with("\x1b[33m"));
        assert!(line.contains("error"));
        assert!(line.ends_with("409   POST /api/pm_plan/1/status"));
    }
}
