pub mod auth;
pub mod response;
pub mod route_guard;

pub use auth::{authenticate, require_admin, require_any_user, AuthUser, ADMIN_ONLY, ANY_USER};
pub use response::{ApiResponse, ApiResult};
pub use route_guard::{page_guard, route_decision, RouteDecision};
