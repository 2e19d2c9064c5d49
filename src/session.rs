//! User Session
//!
//! The signed-in user is held in an explicit [`SessionContext`] that callers
//! pass to whatever needs it. The context is created with [`SessionContext::init`]
//! (restoring a stored session) and torn down with [`SessionContext::logout`].
//!
//! Authentication is simulated: any credentials are accepted and the user
//! object is built locally, then persisted as JSON in the session file.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    fn new(id: impl Into<String>, email: &str, full_name: String) -> Self {
        Self {
            id: id.into(),
            email: email.to_string(),
            full_name,
            avatar: Some(avatar_url(email)),
        }
    }
}

/// Session state for one user of the tool
#[derive(Debug)]
pub struct SessionContext {
    path: PathBuf,
    user: Option<User>,
}

impl SessionContext {
    /// Restore the session stored at `path`
    ///
    /// A missing file means nobody is signed in. A file that cannot be read
    /// or parsed is logged and ignored.
    pub fn init(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let user = match read_user(&path) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Ignoring stored session");
                None
            }
        };

        if let Some(user) = &user {
            tracing::debug!(email = %user.email, "Restored session");
        }

        Self { path, user }
    }

    /// Sign in and persist the session
    pub fn login(&mut self, email: &str, _password: &str) -> Result<&User, SessionError> {
        let user = User::new("1", email, display_name_from_email(email)?);
        self.store(user)
    }

    /// Register and persist the session
    pub fn signup(
        &mut self,
        email: &str,
        _password: &str,
        full_name: &str,
    ) -> Result<&User, SessionError> {
        let id = Utc::now().timestamp_millis().to_string();
        let user = User::new(id, email, full_name.to_string());
        self.store(user)
    }

    /// Sign out and remove the stored session
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.user = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    error: e.to_string(),
                })
            }
        }
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn store(&mut self, user: User) -> Result<&User, SessionError> {
        write_user(&self.path, &user)?;
        tracing::info!(email = %user.email, "Signed in");
        Ok(self.user.insert(user))
    }
}

fn read_user(path: &Path) -> Result<Option<User>, SessionError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SessionError::Io {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| SessionError::Corrupt {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}

fn write_user(path: &Path, user: &User) -> Result<(), SessionError> {
    let io_err = |e: std::io::Error| SessionError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string(user).map_err(|e| SessionError::Corrupt {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(io_err)
}

/// Display name from an address: `jane.doe@x` becomes `Jane Doe`
pub fn display_name_from_email(email: &str) -> Result<String, SessionError> {
    let local = email.split('@').next().unwrap_or_default();

    let separators = regex::Regex::new(r"[^a-zA-Z0-9]")
        .map_err(|e| SessionError::Internal(e.to_string()))?;
    let word_start =
        regex::Regex::new(r"\b\w").map_err(|e| SessionError::Internal(e.to_string()))?;

    let spaced = separators.replace_all(local, " ");
    let name = word_start.replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase());

    if name.is_empty() {
        Ok("User".to_string())
    } else {
        Ok(name.into_owned())
    }
}

fn avatar_url(email: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
        urlencoding::encode(email)
    )
}

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Invalid session file {path:?}: {error}")]
    Corrupt { path: PathBuf, error: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("jane.doe@acme.io").unwrap(), "Jane Doe");
        assert_eq!(display_name_from_email("bob_fixit99@x").unwrap(), "Bob Fixit99");
        assert_eq!(display_name_from_email("@nowhere").unwrap(), "User");
    }

    #[test]
    fn test_init_without_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let session = SessionContext::init(dir.path().join("session.json"));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_login_persists_and_restores() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut session = SessionContext::init(&path);
        let user = session.login("alice.manager@gearguard.com", "secret").unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.full_name, "Alice Manager");
        assert_eq!(
            user.avatar.as_deref(),
            Some("https://api.dicebear.com/7.x/avataaars/svg?seed=alice.manager%40gearguard.com")
        );

        let restored = SessionContext::init(&path);
        assert!(restored.is_authenticated());
        assert_eq!(restored.user().unwrap().email, "alice.manager@gearguard.com");
    }

    #[test]
    fn test_signup_uses_given_name() {
        let dir = tempdir().unwrap();
        let mut session = SessionContext::init(dir.path().join("session.json"));
        let user = session.signup("c@x.io", "pw", "Charlie Spark").unwrap();
        assert_eq!(user.full_name, "Charlie Spark");
        assert!(user.id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_logout_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionContext::init(&path);
        session.login("bob@x.io", "pw").unwrap();
        assert!(path.exists());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!path.exists());

        // Logging out twice is fine
        session.logout().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let session = SessionContext::init(&path);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_stored_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = SessionContext::init(&path);
        session.login("bob@x.io", "pw").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["fullName"], "Bob");
        assert_eq!(raw["email"], "bob@x.io");
    }
}
