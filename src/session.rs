// src/session.rs
use crate::api::ApiClient;
use crate::auth::decode_claims;
use crate::error::ApiError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

pub trait SessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, ApiError>;
    fn save(&self, record: &SessionRecord) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Keeps the session as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, ApiError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&contents) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, record: &SessionRecord) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(record)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<SessionRecord>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, ApiError> {
        Ok(self.record.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<(), ApiError> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// The current user, set at login and cleared at logout.
pub struct Session<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn login(
        &self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<SessionRecord, ApiError> {
        let response = api.login(username, password).await?;
        let token = response
            .access_token
            .ok_or_else(|| ApiError::Token("login response carried no access_token".to_string()))?;
        let record = self.begin(&token, username)?;
        info!("Logged in as user {}", record.user_id);
        Ok(record)
    }

    /// Persists the session described by a freshly issued token.
    pub fn begin(&self, token: &str, username: &str) -> Result<SessionRecord, ApiError> {
        let claims = decode_claims(token)?;
        let record = SessionRecord {
            user_id: claims.sub.user_id,
            username: claims.sub.username.or_else(|| Some(username.to_string())),
            access_token: Some(token.to_string()),
        };
        self.store.save(&record)?;
        Ok(record)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        info!("Logging out");
        self.store.clear()
    }

    pub fn current_user(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.load()?.map(|r| r.user_id))
    }

    pub fn current_username(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.load()?.and_then(|r| r.username))
    }

    pub fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.load()?.and_then(|r| r.access_token))
    }

    pub fn require_user(&self) -> Result<String, ApiError> {
        self.current_user()?.ok_or(ApiError::NotLoggedIn)
    }
}
