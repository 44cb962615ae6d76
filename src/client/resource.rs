use std::future::Future;

use tracing::error;

use crate::client::{ApiClient, ClientError, UserListView};
use crate::services::DeviceList;

/// A fetched value with its loading flag and last error message.
///
/// No caching or retry: every `refresh` goes to the server, and a failed
/// refresh keeps whatever data the previous one produced. `refresh` holds the
/// resource mutably for the whole fetch; callers that render while a request
/// is in flight drive `begin` and `finish` themselves.
#[derive(Debug)]
pub struct Resource<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch as in flight and clear the previous error
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record the outcome of the fetch started by `begin`
    pub fn finish(&mut self, result: Result<T, ClientError>) {
        match result {
            Ok(data) => self.data = Some(data),
            Err(e) => {
                error!("Fetch failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    pub async fn refresh<F, Fut>(&mut self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.begin();
        let result = fetch().await;
        self.finish(result);
    }
}

pub type DevicesResource = Resource<DeviceList>;
pub type UsersResource = Resource<UserListView>;

impl Resource<DeviceList> {
    /// GET /api/devices
    pub async fn refresh_devices(&mut self, client: &ApiClient) {
        self.refresh(|| client.devices()).await
    }
}

impl Resource<UserListView> {
    /// GET /api/users
    pub async fn refresh_users(&mut self, client: &ApiClient) {
        self.refresh(|| client.users()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_populates_data() {
        let mut resource: Resource<Vec<i32>> = Resource::new();
        resource.refresh(|| async { Ok(vec![1, 2, 3]) }).await;

        assert_eq!(resource.data, Some(vec![1, 2, 3]));
        assert!(resource.error.is_none());
        assert!(!resource.loading);
    }

    #[test]
    fn loading_is_visible_between_begin_and_finish() {
        let mut resource: Resource<Vec<i32>> = Resource::new();
        resource.error = Some("stale".to_string());

        resource.begin();
        assert!(resource.loading);
        assert!(resource.error.is_none());

        resource.finish(Ok(vec![4]));
        assert!(!resource.loading);
        assert_eq!(resource.data, Some(vec![4]));
    }

    #[tokio::test]
    async fn failure_sets_message_and_keeps_data() {
        let mut resource: Resource<Vec<i32>> = Resource::new();
        resource.refresh(|| async { Ok(vec![7]) }).await;

        resource
            .refresh(|| async {
                Err(ClientError::Api {
                    status: 401,
                    message: "Not authenticated".to_string(),
                })
            })
            .await;

        assert_eq!(resource.error.as_deref(), Some("Not authenticated"));
        assert_eq!(resource.data, Some(vec![7]));
        assert!(!resource.loading);

        resource.refresh(|| async { Ok(vec![8]) }).await;
        assert!(resource.error.is_none());
    }
}
