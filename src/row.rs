//! Read-only row model shared by repair run and repair schedule lists.
//!
//! Rows come from the backend. The console never mutates them; every action
//! derives a fresh command from the row as it is at the time of the action.

use crate::run_state::RunState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a run or schedule.
///
/// The backend hands out UUID strings, older endpoints numeric ids. Both are
/// carried verbatim so commands echo exactly what the row held.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Number(u64),
    Text(String),
}

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl RowId {
    /// Matches an id typed by an operator, regardless of how the backend encoded it.
    pub fn matches(&self, raw: &str) -> bool {
        self.to_string() == raw.trim()
    }
}

/// Creator of a run or schedule. Required to authorize deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Owner {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Whether a row describes a recurring schedule or a one-off run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Schedule,
    Run,
}

/// A repair run or repair schedule as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub owner: Owner,
    pub state: RunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_activation: Option<DateTime<Utc>>,
}

impl Row {
    pub fn new(id: impl Into<RowId>, owner: impl Into<Owner>, state: RunState) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            state,
            next_activation: None,
        }
    }

    /// Sets the next activation time, turning the row into a schedule.
    pub fn with_next_activation(mut self, at: DateTime<Utc>) -> Self {
        self.next_activation = Some(at);
        self
    }

    /// Presence of an activation time decides the kind, not whether it lies
    /// in the future.
    pub fn kind(&self) -> RowKind {
        if self.next_activation.is_some() {
            RowKind::Schedule
        } else {
            RowKind::Run
        }
    }
}

/// Finds a row by operator-supplied id.
pub fn find_row<'a>(rows: &'a [Row], raw_id: &str) -> Option<&'a Row> {
    rows.iter().find(|row| row.id.matches(raw_id))
}
