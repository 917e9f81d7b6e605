//! Auth gate middleware for the administrative routes
//!
//! Extracts the session token from a bearer Authorization header first,
//! falling back to the `admin-token` cookie, verifies it, and re-checks the
//! claimed username against the credential store so a deactivated admin is
//! denied even with a still-valid token.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::error;

use crate::{error::ApiError, state::AppState};

/// Name of the session cookie
pub const ADMIN_TOKEN_COOKIE: &str = "admin-token";

/// Extract a session token from the request
///
/// Authorization header wins over the cookie when both are present.
pub fn token_from_request(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    jar.get(ADMIN_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Build the session cookie carrying a freshly issued token
///
/// Http-only, SameSite=Strict, secure in production, max-age matching the
/// token's lifetime.
pub fn session_cookie(token: String, max_age_seconds: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age_seconds as i64))
        .build()
}

/// Build the cleared session cookie set on logout (max-age zero)
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Authentication middleware guarding the admin routes
///
/// Runs before any handler logic; on success the verified claims are made
/// available to handlers through the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        token_from_request(req.headers(), &jar).ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .verify(&token)
        .ok_or(ApiError::Unauthorized)?;

    // Active-flag re-check beyond the token claim: a valid token for a
    // deactivated admin must not pass the gate.
    let admin = state
        .admin_repository
        .find_by_username(&claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to look up admin during authentication: {}", e);
            ApiError::store(&e)
        })?;

    if admin.is_none() {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        let jar = CookieJar::new().add(Cookie::new(ADMIN_TOKEN_COOKIE, "cookie-token"));

        assert_eq!(
            token_from_request(&headers, &jar).as_deref(),
            Some("header-token")
        );
    }

    #[test]
    fn falls_back_to_cookie() {
        let headers = HeaderMap::new();
        let jar = CookieJar::new().add(Cookie::new(ADMIN_TOKEN_COOKIE, "cookie-token"));

        assert_eq!(
            token_from_request(&headers, &jar).as_deref(),
            Some("cookie-token")
        );
    }

    #[test]
    fn missing_credentials_yield_none() {
        let headers = HeaderMap::new();
        let jar = CookieJar::new();
        assert!(token_from_request(&headers, &jar).is_none());
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        let jar = CookieJar::new();
        assert!(token_from_request(&headers, &jar).is_none());
    }

    #[test]
    fn session_cookie_contract() {
        let cookie = session_cookie("token".to_string(), 86400, true);
        assert_eq!(cookie.name(), ADMIN_TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86400)));
    }

    #[test]
    fn clear_cookie_has_zero_max_age() {
        let cookie = clear_session_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
