use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::{self, SESSION_COOKIE};
use crate::error::ApiError;

/// Custom header checked after the cookie and the Authorization header
pub const TOKEN_HEADER: &str = "x-session-token";

/// Where a session token candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    Cookie,
    Bearer,
    Header,
}

/// Authenticated session context extracted from a verified token
#[derive(Debug, Clone, Serialize)]
pub struct SessionIdentity {
    pub username: String,
    pub email: String,
    pub rol: String,
    pub expira: i64,
    pub source: TokenSource,
}

/// Locate the candidate token: session cookie, then `Authorization: Bearer`,
/// then the custom token header. The first present candidate wins; a later
/// source is never consulted once an earlier one produced a value.
pub fn extract_session_token(headers: &HeaderMap) -> Option<(String, TokenSource)> {
    if let Some(token) = cookie_token(headers) {
        return Some((token, TokenSource::Cookie));
    }
    if let Some(token) = bearer_token(headers) {
        return Some((token, TokenSource::Bearer));
    }
    if let Some(token) = header_token(headers) {
        return Some((token, TokenSource::Header));
    }
    None
}

/// Verify the request's candidate token, if any. `None` covers both the
/// no-candidate case and every verification failure.
pub fn authenticate(headers: &HeaderMap) -> Option<SessionIdentity> {
    let (token, source) = extract_session_token(headers)?;
    let claims = auth::verify_session_token(&token)?;
    Some(SessionIdentity {
        username: claims.sub,
        email: claims.email,
        rol: claims.rol,
        expira: claims.exp,
        source,
    })
}

/// Session middleware for protected routes. Injects `SessionIdentity` into
/// request extensions; every rejection is the same generic 401.
pub async fn session_auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let identity = authenticate(request.headers()).ok_or_else(ApiError::unauthenticated)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// Extractor form of the same gate, for routes whose method router mixes
// public and session-gated methods. Reuses the middleware-injected identity
// when one is present.
#[async_trait]
impl<S> FromRequestParts<S> for SessionIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<SessionIdentity>() {
            return Ok(identity.clone());
        }
        authenticate(&parts.headers).ok_or_else(ApiError::unauthenticated)
    }
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        let found = raw
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if found.is_some() {
            return found;
        }
    }
    None
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, http::StatusCode, middleware, routing::get, Extension, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::auth::Claims;

    fn valid_token() -> String {
        let claims = Claims::new(
            "juan".to_string(),
            "juan@example.com".to_string(),
            "agente".to_string(),
        );
        auth::issue_session_token(&claims).unwrap()
    }

    async fn whoami(Extension(identity): Extension<SessionIdentity>) -> String {
        identity.username
    }

    fn protected_app() -> Router {
        Router::new()
            .route("/protegida", get(whoami))
            .layer(middleware::from_fn(session_auth_middleware))
    }

    async fn send(app: Router, request: HttpRequest<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() {
        let request = HttpRequest::builder().uri("/protegida").body(Body::empty()).unwrap();
        let (status, _) = send(protected_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_gets_same_body_as_missing() {
        let missing = HttpRequest::builder().uri("/protegida").body(Body::empty()).unwrap();
        let (_, missing_body) = send(protected_app(), missing).await;

        let invalid = HttpRequest::builder()
            .uri("/protegida")
            .header("authorization", "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap();
        let (status, invalid_body) = send(protected_app(), invalid).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing_body, invalid_body);
    }

    #[tokio::test]
    async fn cookie_token_authenticates() {
        let request = HttpRequest::builder()
            .uri("/protegida")
            .header("cookie", format!("otra=1; {}={}", SESSION_COOKIE, valid_token()))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(protected_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "juan");
    }

    #[tokio::test]
    async fn bearer_token_authenticates() {
        let request = HttpRequest::builder()
            .uri("/protegida")
            .header("authorization", format!("Bearer {}", valid_token()))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(protected_app(), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn custom_header_token_authenticates() {
        let request = HttpRequest::builder()
            .uri("/protegida")
            .header(TOKEN_HEADER, valid_token())
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(protected_app(), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn first_present_candidate_wins_even_if_invalid() {
        // Invalid cookie with a valid bearer behind it: the cookie is the
        // candidate, so the request stays unauthenticated.
        let request = HttpRequest::builder()
            .uri("/protegida")
            .header("cookie", format!("{}=garbage", SESSION_COOKIE))
            .header("authorization", format!("Bearer {}", valid_token()))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(protected_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn extraction_order_is_cookie_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", format!("{}=from-cookie", SESSION_COOKIE).parse().unwrap());
        headers.insert("authorization", "Bearer from-bearer".parse().unwrap());
        headers.insert(TOKEN_HEADER, "from-header".parse().unwrap());

        let (token, source) = extract_session_token(&headers).unwrap();
        assert_eq!(token, "from-cookie");
        assert_eq!(source, TokenSource::Cookie);

        headers.remove("cookie");
        let (token, source) = extract_session_token(&headers).unwrap();
        assert_eq!(token, "from-bearer");
        assert_eq!(source, TokenSource::Bearer);

        headers.remove("authorization");
        let (token, source) = extract_session_token(&headers).unwrap();
        assert_eq!(token, "from-header");
        assert_eq!(source, TokenSource::Header);
    }

    #[tokio::test]
    async fn extractor_authenticates_without_middleware() {
        async fn whoami_extractor(identity: SessionIdentity) -> String {
            identity.username
        }
        let app = Router::new().route("/quien", get(whoami_extractor));

        let request = HttpRequest::builder()
            .uri("/quien")
            .header("authorization", format!("Bearer {}", valid_token()))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "juan");

        let request = HttpRequest::builder().uri("/quien").body(Body::empty()).unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_candidates_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", format!("{}=", SESSION_COOKIE).parse().unwrap());
        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert!(extract_session_token(&headers).is_none());
    }
}
