//! User directory lookup.
//!
//! The directory is an external collaborator reached synchronously from
//! `start`, before any saga message is emitted. Only the narrow contract
//! lives here: find a user by id, distinguishing "not found" from a
//! lookup failure.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use thiserror::Error;
use tokio::sync::RwLock;

/// A directory lookup that could not complete.
#[derive(Debug, Clone, Error)]
#[error("user directory lookup failed: {0}")]
pub struct DirectoryError(String);

impl DirectoryError {
    /// Creates a directory error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The slice of a user profile the Order service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The user's id.
    pub user_id: UserId,

    /// Display name.
    pub name: String,
}

/// Lookup interface to the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by id. `Ok(None)` means the user does not exist.
    async fn find(&self, user_id: UserId) -> Result<Option<UserRecord>, DirectoryError>;
}

/// In-memory user directory for tests and demos.
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub async fn register(&self, user_id: UserId, name: impl Into<String>) {
        self.users.write().await.insert(
            user_id,
            UserRecord {
                user_id,
                name: name.into(),
            },
        );
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, user_id: UserId) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
