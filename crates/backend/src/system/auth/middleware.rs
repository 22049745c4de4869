use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::TokenClaims;

/// Bearer-токен из заголовка Authorization
fn bearer_token(headers: &HeaderMap) -> Result<String, StatusCode> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Claims по заголовкам запроса
async fn claims_from_headers(headers: &HeaderMap) -> Result<TokenClaims, StatusCode> {
    let token = bearer_token(headers)?;
    super::jwt::validate_token(&token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Проверка прав: для каких claims запрос разрешён
fn check_access(claims: &TokenClaims, allowed: fn(&TokenClaims) -> bool) -> Result<(), StatusCode> {
    if allowed(claims) {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

async fn guard(
    mut req: Request<Body>,
    next: Next,
    allowed: fn(&TokenClaims) -> bool,
) -> Result<Response, StatusCode> {
    let claims = claims_from_headers(req.headers()).await?;
    check_access(&claims, allowed)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    guard(req, next, |_| true).await
}

/// Middleware that requires admin privileges
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    guard(req, next, |c| c.role.is_admin()).await
}

/// Изменение бизнес-данных: все роли, кроме наблюдателя.
///
/// GET-запросы пропускаются для любого аутентифицированного пользователя.
pub async fn require_editor(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    if req.method() == axum::http::Method::GET {
        guard(req, next, |_| true).await
    } else {
        guard(req, next, |c| c.role.can_edit()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::users::UserRole;

    fn claims(role: UserRole) -> TokenClaims {
        super::super::jwt::build_claims("id", "user", role)
    }

    #[test]
    fn test_viewer_cannot_edit() {
        let viewer = claims(UserRole::Viewer);
        assert_eq!(
            check_access(&viewer, |c| c.role.can_edit()),
            Err(StatusCode::FORBIDDEN)
        );
        assert!(check_access(&claims(UserRole::Technician), |c| c.role.can_edit()).is_ok());
    }

    #[test]
    fn test_bearer_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert("Authorization", "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert("Authorization", "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Ok("abc.def".to_string()));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_guard_futures_are_send() {
        let headers = HeaderMap::new();
        assert_send(&claims_from_headers(&headers));
    }

    #[test]
    fn test_only_admin_passes_admin_check() {
        assert!(check_access(&claims(UserRole::Admin), |c| c.role.is_admin()).is_ok());
        assert!(check_access(&claims(UserRole::Manager), |c| c.role.is_admin()).is_err());
    }
}
