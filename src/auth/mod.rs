pub mod cookies;
pub mod jwt;
pub mod password;

pub use cookies::{expired_session_cookie, session_cookie, token_from_cookie_header, AUTH_COOKIE};
pub use jwt::{issue_token, verify_token, AuthError, Claims, TokenIdentity};
pub use password::{hash_password, is_valid_email, validate_strength, verify_password, PasswordError};
