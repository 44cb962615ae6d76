// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints. Login and register both return the token in
// the body and set it as the `auth-token` cookie; logout only clears the cookie.

pub mod login;    // POST /api/auth/login
pub mod logout;   // POST /api/auth/logout
pub mod register; // POST /api/auth/register

pub use login::login_post;
pub use logout::logout_post;
pub use register::register_post;
