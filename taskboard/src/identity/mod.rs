//! Who is signed in.
//!
//! The board never reads identity from global state. It is handed a
//! [`watch::Receiver`] from an [`IdentityProvider`] and reloads whenever the
//! value changes (login, logout, registration).

pub mod local;

pub use local::LocalIdentityProvider;

use tokio::sync::watch;

use taskboard_proto::profile::{NewProfile, Profile};

/// Errors reported by an [`IdentityProvider`].
///
/// These are shown to the user next to the login form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// No user matches the credentials.
    #[error("no user with email or id {0:?}")]
    UnknownUser(String),

    /// Registration name is blank.
    #[error("name cannot be empty")]
    NameEmpty,

    /// Registration email is not an address.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Another user already registered this email.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// The profile directory could not be read or written.
    #[error("identity storage failed: {0}")]
    Storage(String),
}

/// Login form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Email address or user id.
    pub login: String,
}

impl Credentials {
    /// Credentials for the given email or user id.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

/// Source of the current identity.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in profile, if any.
    fn current(&self) -> Option<Profile>;

    /// A receiver that observes every identity change.
    fn subscribe(&self) -> watch::Receiver<Option<Profile>>;

    /// All known profiles, in registration order.
    fn profiles(&self) -> Vec<Profile>;

    /// Signs in as the user matching `credentials`.
    ///
    /// # Errors
    ///
    /// [`IdentityError::UnknownUser`] if nobody matches,
    /// [`IdentityError::Storage`] if the session cannot be saved.
    fn login(&self, credentials: &Credentials) -> Result<Profile, IdentityError>;

    /// Signs out. Signing out while signed out does nothing.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Storage`] if the session cannot be saved.
    fn logout(&self) -> Result<(), IdentityError>;

    /// Registers a new user and signs in as them.
    ///
    /// # Errors
    ///
    /// Validation errors for a blank name, a malformed or taken email;
    /// [`IdentityError::Storage`] if the directory cannot be saved.
    fn register(&self, profile: NewProfile) -> Result<Profile, IdentityError>;
}
