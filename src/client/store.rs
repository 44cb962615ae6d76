use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::ClientError;
use crate::database::models::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub user: UserSummary,
}

/// Token and user of the signed-in account, persisted as JSON when backed by a file
#[derive(Debug, Default)]
pub struct AuthStore {
    path: Option<PathBuf>,
    session: Option<StoredSession>,
}

impl AuthStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read the session file at `path`; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let session = if path.exists() {
            let content = fs::read_to_string(&path)?;
            Some(serde_json::from_str(&content)?)
        } else {
            None
        };

        Ok(Self {
            path: Some(path),
            session,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn set(&mut self, session: StoredSession) -> Result<(), ClientError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(&session)?)?;
        }
        self.session = Some(session);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.session = None;
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StoredSession {
        StoredSession {
            token: "header.payload.signature".to_string(),
            user: UserSummary {
                id: 1,
                email: "admin@iot-energy.com".to_string(),
                first_name: Some("Admin".to_string()),
                last_name: None,
                role: "admin".to_string(),
            },
        }
    }

    #[test]
    fn persists_and_clears() {
        let dir = std::env::temp_dir().join(format!("iot-energy-store-{}", std::process::id()));
        let path = dir.join("auth.json");

        let mut store = AuthStore::load(&path).unwrap();
        assert!(!store.is_authenticated());

        store.set(session()).unwrap();
        let reloaded = AuthStore::load(&path).unwrap();
        assert_eq!(reloaded.token(), Some("header.payload.signature"));
        assert_eq!(reloaded.user().map(|u| u.role.as_str()), Some("admin"));

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(AuthStore::load(&path).unwrap().token().is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn in_memory_store_never_touches_disk() {
        let mut store = AuthStore::in_memory();
        store.set(session()).unwrap();
        assert!(store.is_authenticated());
        store.clear().unwrap();
        assert!(store.user().is_none());
    }
}
