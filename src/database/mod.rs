pub mod manager;
pub mod migrate;
pub mod models;

pub use manager::{Database, DatabaseError, ServerInfo, TableColumn};
pub use migrate::{MigrationError, MigrationReport};
