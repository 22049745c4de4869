//! API utilities for frontend-backend communication
//!
//! Все запросы к бизнес-API идут с Bearer-токеном из localStorage.
//! Ошибки сервера приходят как `{ "error": "..." }` и превращаются в `String`.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```ignore
/// let url = api_url("/api/equipment/123");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Строка запроса `?a=1&b=2` из пар; пустые значения пропускаются
pub fn query_string(pairs: &[(String, String)]) -> String {
    let encoded: Vec<String> = pairs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    if encoded.is_empty() {
        String::new()
    } else {
        format!("?{}", encoded.join("&"))
    }
}

/// Текст ошибки из ответа сервера
pub fn error_message(status: u16, body: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
    match (from_body, status) {
        (Some(msg), _) => msg,
        (None, 401) => "Сессия истекла, войдите заново".to_string(),
        (None, 403) => "Недостаточно прав".to_string(),
        (None, _) => format!("HTTP {}", status),
    }
}

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(error_message(status, &body))
}

async fn send(request: Result<Request, gloo_net::Error>) -> Result<Response, String> {
    let request = request.map_err(|e| format!("Failed to build request: {}", e))?;
    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check(response).await
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// GET с разбором JSON
pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = send(with_auth(Request::get(&api_url(path))).build()).await?;
    parse(response).await
}

/// POST JSON-тела с разбором JSON-ответа
pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let response = send(with_auth(Request::post(&api_url(path))).json(body)).await?;
    parse(response).await
}

/// POST без тела и без разбора ответа (testdata, run)
pub async fn post_empty(path: &str) -> Result<(), String> {
    send(with_auth(Request::post(&api_url(path))).build()).await?;
    Ok(())
}

/// POST JSON-тела, ответ не нужен
pub async fn post_no_content<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    send(with_auth(Request::post(&api_url(path))).json(body)).await?;
    Ok(())
}

pub async fn put_json<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    send(with_auth(Request::put(&api_url(path))).json(body)).await?;
    Ok(())
}

pub async fn delete(path: &str) -> Result<(), String> {
    send(with_auth(Request::delete(&api_url(path))).build()).await?;
    Ok(())
}

/// Upsert-ответ `{ "id": "..." }`
pub async fn post_upsert<B: Serialize>(path: &str, body: &B) -> Result<String, String> {
    let value: serde_json::Value = post_json(path, body).await?;
    Ok(value
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string())
}

/// Скачать CSV с авторизацией и отдать браузеру как файл
pub async fn download_csv(path: &str, filename: &str) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let response = send(with_auth(Request::get(&api_url(path))).build()).await?;
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(&text));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| format!("{e:?}"))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_string())?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{e:?}"))?
        .dyn_into()
        .map_err(|_| "bad anchor".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message(409, r#"{"error":"Недопустимый переход статуса"}"#),
            "Недопустимый переход статуса"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(500, ""), "HTTP 500");
        assert_eq!(error_message(403, "Forbidden"), "Недостаточно прав");
        assert_eq!(error_message(401, ""), "Сессия истекла, войдите заново");
    }

    #[test]
    fn test_query_string_skips_empty() {
        let pairs = vec![
            ("status".to_string(), "new".to_string()),
            ("q".to_string(), String::new()),
            ("equipment_id".to_string(), "a b".to_string()),
        ];
        assert_eq!(query_string(&pairs), "?status=new&equipment_id=a%20b");
        assert_eq!(query_string(&[]), "");
    }
}
