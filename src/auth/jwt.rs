use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Signed token payload; field names are camelCase on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Who a token is being issued for
#[derive(Debug, Clone)]
pub struct TokenIdentity<'a> {
    pub user_id: i32,
    pub email: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT_SECRET is not defined in environment variables")]
    SecretMissing,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token lifetime of {0} hours is out of range")]
    ExpiryOutOfRange(i64),

    #[error("Token generation failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

impl Claims {
    pub fn new(identity: &TokenIdentity<'_>, security: &SecurityConfig) -> Result<Self, AuthError> {
        let hours = security.jwt_expiry_hours;
        let now = Utc::now();
        let exp = Duration::try_hours(hours)
            .filter(|lifetime| *lifetime > Duration::zero())
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(AuthError::ExpiryOutOfRange(hours))?
            .timestamp();

        Ok(Self {
            user_id: identity.user_id,
            email: identity.email.to_string(),
            role: identity.role.to_string(),
            iat: now.timestamp(),
            exp,
            iss: Some(security.jwt_issuer.clone()),
        })
    }
}

pub fn issue_token(identity: &TokenIdentity<'_>, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretMissing);
    }

    let claims = Claims::new(identity, security)?;
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key).map_err(AuthError::Encode)
}

/// Check signature and expiry and return the claims
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretMissing);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid,
        })
}
