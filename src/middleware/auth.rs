use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;

use crate::auth::{token_from_cookie_header, verify_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_ONLY: &[&str] = &["admin"];
pub const ANY_USER: &[&str] = &["user", "manager", "admin"];

/// Authenticated identity decoded from the token
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

/// Token from `Authorization: Bearer`, falling back to the `auth-token` cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    match bearer {
        Some(token) => Some(token.to_string()),
        None => token_from_cookie_header(headers),
    }
}

/// Verify the request token and attach the identity; 401 otherwise
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = extract_token(request.headers()) else {
        return ApiError::unauthorized("Not authenticated").into_response();
    };

    match verify_token(&token, &state.config.security) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser::from(claims));
            next.run(request).await
        }
        Err(err) => {
            warn!("Rejected token on {}: {}", request.uri().path(), err);
            ApiError::from(err).into_response()
        }
    }
}

/// Must run inside `authenticate`; 403 when the role is not allowed
pub async fn require_roles(allowed: &'static [&'static str], request: Request, next: Next) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return ApiError::unauthorized("Not authenticated").into_response();
    };

    if !allowed.contains(&user.role.as_str()) {
        warn!("User {} with role '{}' denied {}", user.email, user.role, request.uri().path());
        return ApiError::forbidden(format!("Access denied. Required roles: {}", allowed.join(", ")))
            .into_response();
    }

    next.run(request).await
}

pub async fn require_admin(request: Request, next: Next) -> Response {
    require_roles(ADMIN_ONLY, request, next).await
}

pub async fn require_any_user(request: Request, next: Next) -> Response {
    require_roles(ANY_USER, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("auth-token=from-cookie"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.insert(header::COOKIE, HeaderValue::from_static("auth-token=from-cookie"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn no_token_anywhere() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn claims_become_identity() {
        let claims = Claims {
            user_id: 3,
            email: "manager@iot-energy.com".to_string(),
            role: "manager".to_string(),
            iat: 0,
            exp: 0,
            iss: None,
        };
        let user = AuthUser::from(claims);
        assert_eq!(user.user_id, 3);
        assert_eq!(serde_json::to_value(&user).unwrap()["userId"], 3);
    }
}
