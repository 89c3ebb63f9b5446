//! File-backed [`IdentityProvider`].
//!
//! The user directory and the current session live in one JSON file. A
//! missing file starts from three seeded users with nobody signed in.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use taskboard_proto::profile::{NewProfile, Profile, UserId};

use super::{Credentials, IdentityError, IdentityProvider};

/// File name used inside the data directory.
pub const IDENTITY_FILE_NAME: &str = "identity.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdentityFile {
    users: Vec<Profile>,
    #[serde(default)]
    current: Option<UserId>,
}

impl Default for IdentityFile {
    fn default() -> Self {
        Self {
            users: default_users(),
            current: None,
        }
    }
}

impl IdentityFile {
    fn current_profile(&self) -> Option<Profile> {
        let id = self.current.as_ref()?;
        self.users.iter().find(|u| u.id == *id).cloned()
    }
}

fn default_users() -> Vec<Profile> {
    vec![
        Profile::new("user-1", "Taro Tanaka", "tanaka@example.com"),
        Profile::new("user-2", "Hanako Sato", "sato@example.com"),
        Profile::new("user-3", "Jiro Yamada", "yamada@example.com"),
    ]
}

/// Identity provider persisted to a JSON file.
pub struct LocalIdentityProvider {
    path: Option<PathBuf>,
    state: Mutex<IdentityFile>,
    current_tx: watch::Sender<Option<Profile>>,
}

impl LocalIdentityProvider {
    /// Opens the directory at `path`, seeding it if the file is missing.
    ///
    /// A stored session whose user no longer exists is dropped.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Storage`] if the file exists but is unreadable or
    /// malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IdentityError> {
        let path = path.into();
        let mut state: IdentityFile = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| IdentityError::Storage(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IdentityFile::default(),
            Err(e) => return Err(IdentityError::Storage(format!("{}: {e}", path.display()))),
        };
        let current = state.current_profile();
        if current.is_none() {
            state.current = None;
        }
        tracing::debug!(
            path = %path.display(),
            users = state.users.len(),
            signed_in = current.is_some(),
            "opened identity directory"
        );
        Ok(Self {
            path: Some(path),
            state: Mutex::new(state),
            current_tx: watch::Sender::new(current),
        })
    }

    /// Opens the identity file inside a data directory.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn open_in(data_dir: &Path) -> Result<Self, IdentityError> {
        Self::open(data_dir.join(IDENTITY_FILE_NAME))
    }

    /// An unpersisted provider holding the seeded users.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(IdentityFile::default()),
            current_tx: watch::Sender::new(None),
        }
    }

    /// Applies `mutate` to a copy of the directory, saves it, then publishes
    /// the resulting session.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut IdentityFile) -> Result<T, IdentityError>,
    ) -> Result<T, IdentityError> {
        let mut state = self.state.lock();
        let mut next = state.clone();
        let out = mutate(&mut next)?;
        self.save(&next)?;
        let current = next.current_profile();
        *state = next;
        drop(state);
        self.current_tx.send_replace(current);
        Ok(out)
    }

    fn save(&self, file: &IdentityFile) -> Result<(), IdentityError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(file)
            .map_err(|e| IdentityError::Storage(format!("encode: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| IdentityError::Storage(format!("{}: {e}", parent.display())))?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, path))
            .map_err(|e| IdentityError::Storage(format!("{}: {e}", path.display())))
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn current(&self) -> Option<Profile> {
        self.current_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.current_tx.subscribe()
    }

    fn profiles(&self) -> Vec<Profile> {
        self.state.lock().users.clone()
    }

    fn login(&self, credentials: &Credentials) -> Result<Profile, IdentityError> {
        let login = credentials.login.trim();
        let profile = self.commit(|file| {
            let profile = file
                .users
                .iter()
                .find(|u| u.email.eq_ignore_ascii_case(login) || u.id.as_str() == login)
                .cloned()
                .ok_or_else(|| IdentityError::UnknownUser(login.to_string()))?;
            file.current = Some(profile.id.clone());
            Ok(profile)
        })?;
        tracing::info!(user = %profile.id, "signed in");
        Ok(profile)
    }

    fn logout(&self) -> Result<(), IdentityError> {
        if self.state.lock().current.is_none() {
            return Ok(());
        }
        self.commit(|file| {
            file.current = None;
            Ok(())
        })?;
        tracing::info!("signed out");
        Ok(())
    }

    fn register(&self, profile: NewProfile) -> Result<Profile, IdentityError> {
        let name = profile.name.trim();
        let email = profile.email.trim();
        if name.is_empty() {
            return Err(IdentityError::NameEmpty);
        }
        if !email.contains('@') {
            return Err(IdentityError::InvalidEmail(email.to_string()));
        }
        let profile = self.commit(|file| {
            if file.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
                return Err(IdentityError::EmailTaken(email.to_string()));
            }
            let profile = Profile {
                id: UserId::generate(),
                name: name.to_string(),
                email: email.to_string(),
            };
            file.users.push(profile.clone());
            file.current = Some(profile.id.clone());
            Ok(profile)
        })?;
        tracing::info!(user = %profile.id, "registered");
        Ok(profile)
    }
}
