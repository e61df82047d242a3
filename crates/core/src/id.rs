//! Identifiers for TaskRank entities.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wrap a raw sequence number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one in the sequence.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier as supplied by a caller: an integer or a string.
///
/// Callers may reference tasks however they like, so dependency lists are
/// matched on this key rather than on [`TaskId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskKey {
    /// Numeric identifier
    Int(i64),
    /// Free-form identifier
    Text(String),
}

impl TaskKey {
    /// Whether the key is `0` or an empty string. Blank keys never match a
    /// dependency reference.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Int(v) => *v == 0,
            Self::Text(v) => v.is_empty(),
        }
    }
}

impl From<TaskId> for TaskKey {
    fn from(id: TaskId) -> Self {
        // Sequence numbers never approach i64::MAX in practice.
        Self::Int(id.0 as i64)
    }
}

impl From<i64> for TaskKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for TaskKey {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for TaskKey {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for TaskKey {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => v.fmt(f),
            Self::Text(v) => v.fmt(f),
        }
    }
}
