//! Client for the HTTP API: an auth store plus loading/error wrappers around
//! the device and user listings. The CLI's `remote` commands drive it.

pub mod api;
pub mod resource;
pub mod store;

pub use api::{ApiClient, ClientError, UserListView, UserRow};
pub use resource::{DevicesResource, Resource, UsersResource};
pub use store::{AuthStore, StoredSession};
