//! User identities.
//!
//! The board treats a [`Profile`] as an opaque reference: its id scopes which
//! tasks are visible, and its name is recorded as a comment author.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh `user-<uuid v7>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("user-{}", Uuid::now_v7()))
    }

    /// Returns the string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable identifier, used as the task owner key.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

impl Profile {
    /// Creates a profile.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Registration form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProfile {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}
