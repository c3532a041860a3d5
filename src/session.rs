//! Saving and restoring the login session to/from the filesystem.
//!
//! The original client kept the logged-in user and current view in
//! ambient browser storage; here the session lives in an explicit,
//! caller-owned store backed by a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::User;
use crate::screens::Screen;

const SESSION_FILE_NAME: &str = "session.json";

/// The session state persisted across launches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// The logged-in user as last fetched from the backend.
    pub user: User,
    /// The screen to restore to.
    pub screen: Screen,
}

/// A file-backed store for the login session.
#[derive(Clone, Debug)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at `dir`. The directory is created lazily
    /// on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_file_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE_NAME)
    }

    /// Writes the session to disk, replacing any previous one.
    pub fn save(&self, session: &PersistedSession) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating session dir {}", self.dir.display()))?;
        let serialized = serde_json::to_string_pretty(session)?;
        fs::write(self.session_file_path(), serialized)
            .with_context(|| format!("writing session file for {}", session.user.username))?;
        info!("Saved session for {}", session.user.username);
        Ok(())
    }

    /// Restores the previously saved session, if any.
    ///
    /// A missing file means no session; a corrupt file is logged and
    /// treated the same, so a bad save never locks the user out.
    pub fn restore(&self) -> Option<PersistedSession> {
        let path = self.session_file_path();
        let serialized = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&serialized) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring corrupt session file {}: {e}", path.display());
                None
            }
        }
    }

    /// Deletes the saved session (logout).
    pub fn clear(&self) {
        match fs::remove_file(self.session_file_path()) {
            Ok(()) => info!("Cleared saved session"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear saved session: {e}"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_user;

    fn sample_session() -> PersistedSession {
        PersistedSession {
            user: test_user(7, "alice"),
            screen: Screen::Profile,
        }
    }

    #[test]
    fn save_then_restore_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        let restored = store.restore().unwrap();
        assert_eq!(restored, sample_session());
    }

    #[test]
    fn restore_without_saved_session_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("never-created"));
        assert!(store.restore().is_none());
    }

    #[test]
    fn corrupt_session_file_restores_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join(SESSION_FILE_NAME), "{not json").unwrap();
        assert!(store.restore().is_none());
    }

    #[test]
    fn clear_removes_the_session_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&sample_session()).unwrap();

        store.clear();
        assert!(store.restore().is_none());
        // Clearing again must not fail.
        store.clear();
    }
}
