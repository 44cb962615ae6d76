use axum::http::{header, HeaderMap};
use cookie::{time::Duration, Cookie, SameSite};

use crate::config::SecurityConfig;

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE: &str = "auth-token";

pub fn session_cookie(token: &str, security: &SecurityConfig, same_site: SameSite) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(security.secure_cookies)
        .same_site(same_site)
        .max_age(Duration::days(security.cookie_max_age_days))
        .build()
}

/// Overwrites the session cookie with an empty, immediately expiring one
pub fn expired_session_cookie(security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(security.secure_cookies)
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .build()
}

/// Token from the `auth-token` cookie across all `Cookie` headers
pub fn token_from_cookie_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == AUTH_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}
