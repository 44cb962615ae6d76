use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use cookie::Cookie;
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that automatically adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: Option<String>,
    pub data: Option<T>,
    pub status_code: Option<StatusCode>,
    pub cookie: Option<Cookie<'static>>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            message: None,
            data: Some(data),
            status_code: None, // Default to 200 OK
            cookie: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::success(data).with_status(StatusCode::CREATED)
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a `Set-Cookie` header
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookie = Some(cookie);
        self
    }
}

impl ApiResponse<Value> {
    /// `{success:true, message}` with no data field
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: None,
            status_code: None,
            cookie: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = json!({ "success": true });
        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }

        if let Some(data) = self.data {
            // Convert data to JSON Value for consistent envelope format
            match serde_json::to_value(&data) {
                Ok(value) => envelope["data"] = value,
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        let mut response = (status, Json(envelope)).into_response();
        if let Some(cookie) = self.cookie {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::error!("Failed to encode Set-Cookie header: {}", e),
            }
        }
        response
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn wraps_data_with_message() {
        let response = ApiResponse::success(json!({"id": 1}))
            .with_message("Faculties retrieved successfully")
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Faculties retrieved successfully");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn null_data_is_kept() {
        let response = ApiResponse::success(Option::<i32>::None).into_response();
        let body = body_json(response).await;
        assert!(body.get("data").is_some());
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn message_only_has_no_data() {
        let response = ApiResponse::message_only("Logout successful").into_response();
        let body = body_json(response).await;
        assert_eq!(body, json!({"success": true, "message": "Logout successful"}));
    }

    #[tokio::test]
    async fn created_sets_status_and_cookie() {
        let response = ApiResponse::created(json!({}))
            .with_cookie(Cookie::new("auth-token", "abc"))
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }
}
