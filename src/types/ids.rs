use super::ValidationError;
use crate::constants::TASK_ID_UPPER_BOUND;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Numeric identifier of a wiki page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(u64);

impl PageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parses a page id from its decimal text form.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_matches('"');
        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        cleaned
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(input.to_string()))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier carried by every generated structured macro (`ac:macro-id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroId(String);

impl MacroId {
    /// Creates a fresh random v4 UUID id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a task inside a task list (`ac:task-id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u32);

impl TaskId {
    /// Draws a random task id below [`TASK_ID_UPPER_BOUND`].
    pub fn random() -> Self {
        Self(rand::rng().random_range(0..TASK_ID_UPPER_BOUND))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
