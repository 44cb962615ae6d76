// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (token auth) → Elevated (token auth + admin role)
//
// Each tier only declares handlers; the authentication and role layers are
// attached where the route groups are assembled in routes.rs.
pub mod public;    // Tier 1: No authentication required (/, /health, /api/auth/*, debug probes)
pub mod protected; // Tier 2: Token authentication required (/api/auth/me, /api/profile, /api/devices/*)
pub mod elevated;  // Tier 3: Admin role required (/api/admin/*, /api/users/*)

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Json, Path, Query,
};

use crate::error::ApiError;

/// Unwrap a JSON body, turning axum's rejection into the failure envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text())))
}

/// Unwrap a path parameter such as a numeric id
pub(crate) fn path_param<T>(param: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    param
        .map(|Path(value)| value)
        .map_err(|rejection| ApiError::bad_request(format!("Invalid path parameter: {}", rejection.body_text())))
}

/// Unwrap query-string filters
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text())))
}

/*
DIRECTORY LAYOUT:

src/handlers/
├── public/
│   ├── mod.rs          ← root + health
│   ├── debug.rs        ← env presence and database probes
│   └── auth/           ← login, register, logout
├── protected/
│   ├── auth.rs         ← me, profile
│   └── devices.rs      ← device listing, detail, latest snapshot
└── elevated/
    ├── dashboard.rs    ← summary + login statistics
    ├── reference.rs    ← faculties, manufacturers, power specifications
    ├── responsible_persons.rs ← faculty contacts (soft delete)
    ├── devices.rs      ← device registry writes and updates
    └── users.rs        ← user administration

Handlers take `State<AppState>` and return `ApiResult<T>`; every failure goes
through `ApiError` so the body is always the `{success:false, message}` envelope.
*/
