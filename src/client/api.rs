// client/api.rs - typed calls against a running server

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{AuthStore, StoredSession};
use crate::database::models::UserSummary;
use crate::services::DeviceList;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success envelope; displays as the server's `message`
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Response carried no data")]
    MissingData,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SessionData {
    user: UserSummary,
    token: String,
}

#[derive(Debug, Deserialize)]
struct MeData {
    user: UserSummary,
}

/// One row of the admin user listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub is_active: bool,
    pub last_login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListView {
    pub users: Vec<UserRow>,
    pub total_users: usize,
    pub active_users: usize,
    pub admins: usize,
    pub new_this_month: usize,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: AuthStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: AuthStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, ClientError> {
        let request = match self.store.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("Response {} ({} bytes)", status, body.len());

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope.data),
            Ok(envelope) => Err(failure(status, envelope.message)),
            Err(_) if !status.is_success() => Err(failure(status, None)),
            Err(err) => Err(err.into()),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.http.get(self.url(path)))
            .await?
            .ok_or(ClientError::MissingData)
    }

    /// POST /api/auth/login; the returned token is kept in the store
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserSummary, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));

        let session: SessionData = self.send(request).await?.ok_or(ClientError::MissingData)?;
        self.store.set(StoredSession {
            token: session.token,
            user: session.user.clone(),
        })?;
        Ok(session.user)
    }

    /// Clears the local session even when the server cannot be reached
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if let Err(e) = self
            .send::<serde_json::Value>(self.http.post(self.url("/api/auth/logout")))
            .await
        {
            warn!("Server logout failed: {}", e);
        }
        self.store.clear()
    }

    pub async fn me(&self) -> Result<UserSummary, ClientError> {
        Ok(self.get::<MeData>("/api/auth/me").await?.user)
    }

    pub async fn devices(&self) -> Result<DeviceList, ClientError> {
        self.get("/api/devices").await
    }

    pub async fn users(&self) -> Result<UserListView, ClientError> {
        self.get("/api/users").await
    }
}

fn failure(status: StatusCode, message: Option<String>) -> ClientError {
    ClientError::Api {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| format!("Request failed with status {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_message() {
        let err = failure(StatusCode::FORBIDDEN, Some("Access denied. Required roles: admin".to_string()));
        assert_eq!(err.to_string(), "Access denied. Required roles: admin");

        let err = failure(StatusCode::BAD_GATEWAY, None);
        assert_eq!(err.to_string(), "Request failed with status 502 Bad Gateway");
    }

    #[test]
    fn user_listing_deserializes() {
        let body = json!({
            "users": [{
                "id": 1, "name": "Admin User", "email": "admin@iot-energy.com",
                "firstName": "Admin", "lastName": "User", "role": "admin",
                "status": "Active", "isActive": true, "lastLogin": "Never",
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            }],
            "totalUsers": 1, "activeUsers": 1, "admins": 1, "newThisMonth": 0
        });
        let view: UserListView = serde_json::from_value(body).unwrap();
        assert_eq!(view.users[0].last_login, "Never");
        assert_eq!(view.admins, 1);
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:3000/", AuthStore::in_memory());
        assert_eq!(client.url("/api/devices"), "http://localhost:3000/api/devices");
    }
}
