//! Task comments.
//!
//! Comments are append-only: they are never edited or reordered once
//! attached to a task.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a comment, unique within its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The author reference displayed next to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name of the commenting user.
    pub name: String,
}

impl Author {
    /// Placeholder used when a comment's author can no longer be resolved.
    pub const UNKNOWN_NAME: &'static str = "(unknown)";

    /// Creates an author reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Author for comments whose profile is missing.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN_NAME)
    }
}

/// A comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier unique within the owning task.
    pub id: CommentId,
    /// Comment body, never empty after trimming.
    pub text: String,
    /// Who wrote the comment.
    #[serde(deserialize_with = "deserialize_author")]
    pub author: Author,
}

impl Comment {
    /// Creates a comment.
    pub fn new(id: CommentId, text: impl Into<String>, author: Author) -> Self {
        Self {
            id,
            text: text.into(),
            author,
        }
    }
}

/// Shapes an author relation can arrive in, depending on how the
/// owning row was queried.
#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorShape {
    One(Author),
    Many(Vec<Author>),
}

impl From<AuthorShape> for Author {
    fn from(shape: AuthorShape) -> Self {
        match shape {
            AuthorShape::One(author) => author,
            AuthorShape::Many(authors) => authors.into_iter().next().unwrap_or_else(Self::unknown),
        }
    }
}

/// Accepts either `{"name": ..}` or `[{"name": ..}]` and yields a single
/// [`Author`].
///
/// # Errors
///
/// Returns the deserializer's error if the value matches neither shape.
pub fn deserialize_author<'de, D>(deserializer: D) -> Result<Author, D::Error>
where
    D: Deserializer<'de>,
{
    AuthorShape::deserialize(deserializer).map(Author::from)
}
