//! Explicit user session and the best-effort local cache mirror.
//!
//! The session object is passed to every store operation; there is no
//! ambient "current user". The cache mirrors the last session and
//! profile to disk for startup display only; it is never authoritative
//! and its failures are logged, not propagated.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::UserProfile;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Auth error: {0}")]
    Auth(String),
}

/// The authenticated user for the duration of a command.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub profile: Option<UserProfile>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Result<Self, SessionError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(SessionError::Auth("no user id provided".to_string()));
        }
        Ok(Self {
            user_id,
            profile: None,
        })
    }

    pub fn with_profile(mut self, profile: Option<UserProfile>) -> Self {
        self.profile = profile;
        self
    }
}

/// What gets mirrored to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSession {
    pub user_id: String,
    pub profile: Option<UserProfile>,
}

/// JSON file mirror of the last session.
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the cached session, if any. Malformed or unreadable cache is
    /// treated as absent.
    pub async fn load(&self) -> Option<CachedSession> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read session cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!("Ignoring malformed session cache: {}", e);
                None
            }
        }
    }

    /// Mirror the session to disk, best effort.
    pub async fn store(&self, cached: &CachedSession) {
        let json = match serde_json::to_string_pretty(cached) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize session cache: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("Failed to create cache directory: {}", e);
                return;
            }
        }

        if let Err(e) = tokio::fs::write(&self.path, json).await {
            warn!("Failed to write session cache: {}", e);
        }
    }

    /// Drop the mirror (sign-out).
    pub async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear session cache: {}", e),
        }
    }
}
