//! Page redirects for the browser-facing frontend.
//!
//! Decisions depend only on whether the `auth-token` cookie is present. The
//! token is verified later, when the page calls the API.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::token_from_cookie_header;
use crate::error::ApiError;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Pass,
    RedirectToLogin { from: String },
    RedirectToDashboard,
}

impl RouteDecision {
    /// Redirect target, or `None` when the request passes through
    pub fn location(&self) -> Option<String> {
        match self {
            RouteDecision::Pass => None,
            RouteDecision::RedirectToDashboard => Some(DASHBOARD_PATH.to_string()),
            RouteDecision::RedirectToLogin { from } => {
                let query: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("from", from)
                    .finish();
                Some(format!("{}?{}", LOGIN_PATH, query))
            }
        }
    }
}

fn is_protected(path: &str, protected_prefixes: &[String]) -> bool {
    protected_prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
    })
}

pub fn route_decision(path: &str, has_cookie: bool, protected_prefixes: &[String]) -> RouteDecision {
    if !has_cookie && is_protected(path, protected_prefixes) {
        return RouteDecision::RedirectToLogin { from: path.to_string() };
    }
    if has_cookie && path == LOGIN_PATH {
        return RouteDecision::RedirectToDashboard;
    }
    RouteDecision::Pass
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Applies `route_decision` to the static frontend fallback; unmatched API paths get a JSON 404
pub async fn page_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_api_path(&path) {
        return ApiError::not_found("API endpoint not found").into_response();
    }

    let has_cookie = token_from_cookie_header(request.headers()).is_some();
    let decision = route_decision(&path, has_cookie, &state.config.api.protected_pages);

    let Some(location) = decision.location() else {
        return next.run(request).await;
    };

    debug!("Redirecting {} to {}", path, location);
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> Vec<String> {
        vec!["/dashboard".to_string(), "/admin".to_string()]
    }

    #[test]
    fn anonymous_protected_page_goes_to_login() {
        let decision = route_decision("/dashboard/devices", false, &prefixes());
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                from: "/dashboard/devices".to_string()
            }
        );
        assert_eq!(decision.location().as_deref(), Some("/login?from=%2Fdashboard%2Fdevices"));
    }

    #[test]
    fn prefix_must_end_on_segment() {
        assert_eq!(route_decision("/dashboards", false, &prefixes()), RouteDecision::Pass);
        assert_eq!(route_decision("/admin", false, &prefixes()).location().as_deref(), Some("/login?from=%2Fadmin"));
    }

    #[test]
    fn signed_in_login_goes_to_dashboard() {
        assert_eq!(route_decision("/login", true, &prefixes()), RouteDecision::RedirectToDashboard);
        assert_eq!(RouteDecision::RedirectToDashboard.location().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn api_paths_are_recognised() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/unknown"));
        assert!(!is_api_path("/apiary"));
    }

    #[test]
    fn everything_else_passes() {
        assert_eq!(route_decision("/login", false, &prefixes()), RouteDecision::Pass);
        assert_eq!(route_decision("/dashboard", true, &prefixes()), RouteDecision::Pass);
        assert_eq!(route_decision("/", false, &prefixes()), RouteDecision::Pass);
    }
}
