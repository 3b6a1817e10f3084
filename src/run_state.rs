//! Lifecycle states of repair runs and repair schedules.

use crate::error::ConsoleError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lifecycle state of a repair run or schedule as reported by the backend.
///
/// `ACTIVE` only ever applies to schedules; `RUNNING`, `DONE` and `ERROR`
/// only to runs. `PAUSED`, `NOT_STARTED`, `ABORTED` and `DELETED` are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    NotStarted,
    Running,
    Active,
    Paused,
    Aborted,
    Done,
    Error,
    Deleted,
    /// Any state name this build does not know about.
    #[serde(other)]
    Unknown,
}

impl RunState {
    /// Every named state, in lifecycle order.
    pub const ALL: [RunState; 8] = [
        RunState::NotStarted,
        RunState::Running,
        RunState::Active,
        RunState::Paused,
        RunState::Aborted,
        RunState::Done,
        RunState::Error,
        RunState::Deleted,
    ];

    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::NotStarted => "NOT_STARTED",
            RunState::Running => "RUNNING",
            RunState::Active => "ACTIVE",
            RunState::Paused => "PAUSED",
            RunState::Aborted => "ABORTED",
            RunState::Done => "DONE",
            RunState::Error => "ERROR",
            RunState::Deleted => "DELETED",
            RunState::Unknown => "UNKNOWN",
        }
    }

    /// States in which work is progressing and can be stopped.
    pub fn is_running_like(&self) -> bool {
        matches!(self, RunState::Active | RunState::Running)
    }

    /// States from which work can be (re)activated.
    pub fn is_paused_like(&self) -> bool {
        matches!(self, RunState::Paused | RunState::NotStarted)
    }

    /// States the backend will not leave again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Done | RunState::Error | RunState::Aborted | RunState::Deleted
        )
    }
}

impl Display for RunState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunState {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RunState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConsoleError::UnknownState {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_groups_are_disjoint() {
        for state in RunState::ALL {
            let groups = [
                state.is_running_like(),
                state.is_paused_like(),
                state.is_terminal(),
            ];
            assert!(
                groups.iter().filter(|g| **g).count() <= 1,
                "{} is in more than one group",
                state
            );
        }
    }

    #[test]
    fn test_wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&RunState::NotStarted).unwrap();
        assert_eq!(json, "\"NOT_STARTED\"");
        let parsed: RunState = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(parsed, RunState::Paused);
    }

    #[test]
    fn test_unrecognised_backend_state_is_tolerated() {
        let parsed: RunState = serde_json::from_str("\"STARTING\"").unwrap();
        assert_eq!(parsed, RunState::Unknown);
        assert!(!parsed.is_running_like());
        assert!(!parsed.is_paused_like());
    }

    #[test]
    fn test_from_str_is_case_insensitive_but_strict() {
        assert_eq!("running".parse::<RunState>().unwrap(), RunState::Running);
        assert_eq!(" ACTIVE ".parse::<RunState>().unwrap(), RunState::Active);
        assert_eq!(
            "UNKNOWN".parse::<RunState>(),
            Err(ConsoleError::UnknownState {
                name: "UNKNOWN".to_string()
            })
        );
    }
}
