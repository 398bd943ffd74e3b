//! Signed-in user context
//!
//! Holds the locally cached [`UserProfile`] and mirrors it to
//! `<data_dir>/session.json` so it survives restarts.

use crate::error::SessionError;
use crate::models::UserProfile;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the persisted session inside the data directory
pub const SESSION_FILE: &str = "session.json";

/// Explicit owner of the current user's profile
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    profile: Option<UserProfile>,
    path: Option<PathBuf>,
}

impl SessionContext {
    /// Session that is never written to disk
    pub fn in_memory(profile: Option<UserProfile>) -> Self {
        Self {
            profile,
            path: None,
        }
    }

    /// Load the session stored in `<data_dir>/session.json`.
    /// A missing or unreadable file yields a signed-out session.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SESSION_FILE);
        let profile = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<UserProfile>(&content) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring corrupt session file");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Session file unreadable, starting signed out");
                None
            }
        };
        Self {
            profile,
            path: Some(path),
        }
    }

    pub fn current(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the signed-in user
    pub fn login(&mut self, profile: UserProfile) -> Result<(), SessionError> {
        self.persist(&profile)?;
        debug!(user = %profile.id, "Session started");
        self.profile = Some(profile);
        Ok(())
    }

    /// Clear the signed-in user and its stored copy
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SessionError::Remove {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        self.profile = None;
        Ok(())
    }

    /// Point the cached profile at a new image.
    ///
    /// The stored copy is written first; the in-memory profile only changes
    /// once that succeeded.
    pub fn set_profile_image(&mut self, file_path: &str) -> Result<(), SessionError> {
        let mut updated = self.profile.clone().ok_or(SessionError::NotSignedIn)?;
        updated.profile_img = Some(file_path.to_string());
        self.persist(&updated)?;
        self.profile = Some(updated);
        Ok(())
    }

    fn persist(&self, profile: &UserProfile) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(profile)?;
        std::fs::write(path, content).map_err(|source| SessionError::Write {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Dr. Rao".to_string(),
            role: "faculty".to_string(),
            email: None,
            profile_img: None,
        }
    }

    #[test]
    fn test_login_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionContext::load(dir.path());
        assert!(session.current().is_none());

        session.login(profile()).unwrap();
        session.set_profile_image("/uploads/u1.png").unwrap();

        let reloaded = SessionContext::load(dir.path());
        let user = reloaded.current().unwrap();
        assert_eq!(user.name, "Dr. Rao");
        assert_eq!(user.profile_img.as_deref(), Some("/uploads/u1.png"));
    }

    #[test]
    fn test_logout_clears_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionContext::load(dir.path());
        session.login(profile()).unwrap();
        session.logout().unwrap();

        assert!(session.current().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());
        // Second logout is a no-op
        session.logout().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert!(SessionContext::load(dir.path()).current().is_none());
    }

    #[test]
    fn test_unreadable_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(SESSION_FILE)).unwrap();

        let session = SessionContext::load(dir.path());
        assert!(session.current().is_none());
        assert_eq!(session.path(), Some(dir.path().join(SESSION_FILE).as_path()));
    }

    #[test]
    fn test_image_requires_session() {
        let mut session = SessionContext::in_memory(None);
        assert!(matches!(
            session.set_profile_image("/x.png"),
            Err(SessionError::NotSignedIn)
        ));
    }

    #[test]
    fn test_failed_write_leaves_profile_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the session file should be makes the write fail
        std::fs::create_dir_all(dir.path().join(SESSION_FILE)).unwrap();
        let mut session = SessionContext {
            profile: Some(profile()),
            path: Some(dir.path().join(SESSION_FILE)),
        };

        assert!(session.set_profile_image("/uploads/new.png").is_err());
        assert_eq!(session.current().unwrap().profile_img, None);
    }
}
