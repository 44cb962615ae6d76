use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{authenticate, page_guard, require_admin, require_any_user};
use crate::state::AppState;

/// Full application: API route groups, the guarded frontend fallback and global layers
pub fn app(state: AppState) -> Router {
    let frontend: Router = Router::new()
        .fallback_service(ServeDir::new(&state.config.api.static_dir))
        .layer(from_fn_with_state(state.clone(), page_guard));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        .merge(debug_routes(&state.config))
        // Token required
        .merge(protected_routes(state.clone()))
        // Admin role required
        .merge(admin_routes(state.clone()))
        .merge(user_admin_routes(state.clone()))
        .fallback_service(frontend)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/logout", post(auth::logout_post))
}

fn debug_routes(config: &AppConfig) -> Router<AppState> {
    if !config.api.enable_debug_endpoints {
        return Router::new();
    }

    Router::new()
        .route("/api/health-check", get(public::debug::health_check))
        .route("/api/debug/env", get(public::debug::debug_env))
        .route("/api/debug/db", get(public::debug::debug_db))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(protected::me_get))
        .route("/api/profile", get(protected::profile_get))
        .route("/api/devices", get(protected::devices_get))
        .route("/api/devices/data", get(protected::device_data_get))
        .route("/api/devices/:device_id", get(protected::device_get))
        .route("/api/devices/:device_id/history", get(protected::device_history_get))
        .route_layer(from_fn(require_any_user))
        .route_layer(from_fn_with_state(state, authenticate))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/dashboard", get(elevated::dashboard_get))
        .route("/api/admin/login-stats", get(elevated::login_stats_get))
        .route("/api/admin/faculties", get(elevated::faculties_get).post(elevated::faculties_post))
        .route("/api/admin/faculties/:id", delete(elevated::faculty_delete))
        .route(
            "/api/admin/manufacturers",
            get(elevated::manufacturers_get).post(elevated::manufacturers_post),
        )
        .route("/api/admin/manufacturers/:id", delete(elevated::manufacturer_delete))
        .route(
            "/api/admin/power-specifications",
            get(elevated::power_specs_get).post(elevated::power_specs_post),
        )
        .route("/api/admin/power-specifications/:id", delete(elevated::power_spec_delete))
        .route(
            "/api/admin/responsible-persons",
            get(elevated::responsible_persons_get).post(elevated::responsible_persons_post),
        )
        .route(
            "/api/admin/responsible-persons/:id",
            put(elevated::responsible_person_put).delete(elevated::responsible_person_delete),
        )
        .route("/api/admin/devices", post(elevated::device_post))
        .route(
            "/api/admin/devices/:device_id",
            put(elevated::device_put).delete(elevated::device_delete),
        )
        .route("/api/admin/devices/:device_id/data", put(elevated::device_data_put))
        // Layers run bottom-up: authenticate (401) before require_admin (403)
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, authenticate))
}

fn user_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/users", get(elevated::users_get).post(elevated::users_post))
        .route(
            "/api/users/:id",
            get(elevated::user_get).put(elevated::user_put).delete(elevated::user_delete),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, authenticate))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
