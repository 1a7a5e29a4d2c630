//! Synthetic task identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "task-";

/// Identifier of a task within one generation batch: `task-<n>`, where `n` is
/// the 1-based position of the task in the input sequence.
///
/// Any string can be held in a `TaskId` (identifiers may originate from other
/// numbering schemes); only canonical `task-<n>` values map back to a position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Identifier for the task at 1-based `position`.
    #[must_use]
    pub fn from_position(position: usize) -> Self {
        Self(format!("{PREFIX}{position}"))
    }

    /// Identifier for the task at 0-based `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::from_position(index + 1)
    }

    /// The 1-based position encoded in this identifier.
    ///
    /// Returns `None` unless the identifier is exactly `task-` followed by a
    /// positive decimal number without sign or leading zeros.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        let digits = self.0.strip_prefix(PREFIX)?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        digits.parse().ok()
    }

    /// The 0-based index encoded in this identifier.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.position().map(|p| p - 1)
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
