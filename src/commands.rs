//! Commands published by the console and the results that come back.
//!
//! Field names match the JSON the backend transport sends, so these values
//! serialize straight onto the wire.

use crate::row::{Owner, Row, RowId};
use crate::run_state::RunState;
use serde::{Deserialize, Serialize};

/// Requested state transition for a run or schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommand {
    pub id: RowId,
    pub state: RunState,
}

impl UpdateCommand {
    pub fn new(row: &Row, state: RunState) -> Self {
        Self {
            id: row.id.clone(),
            state,
        }
    }
}

/// Requested removal of a run or schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCommand {
    pub id: RowId,
    pub owner: Owner,
}

impl From<&Row> for DeleteCommand {
    fn from(row: &Row) -> Self {
        Self {
            id: row.id.clone(),
            owner: row.owner.clone(),
        }
    }
}

/// Any command the console can publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Command {
    Update(UpdateCommand),
    Delete(DeleteCommand),
}

/// Outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            message: None,
        }
    }

    /// A failure carrying the backend's response text.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_command_wire_shape() {
        let row = Row::new(1, "ops", RunState::Paused);
        let json = serde_json::to_value(UpdateCommand::new(&row, RunState::Active)).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "state": "ACTIVE"}));
    }

    #[test]
    fn test_delete_command_copies_owner_verbatim() {
        let row = Row::new("run-9", " Ops Team ", RunState::Done);
        let cmd = DeleteCommand::from(&row);
        assert_eq!(cmd.owner, row.owner);
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            serde_json::json!({"id": "run-9", "owner": " Ops Team "})
        );
    }

    #[test]
    fn test_tagged_command_serialization() {
        let row = Row::new(3, "ops", RunState::Running);
        let cmd = Command::Update(UpdateCommand::new(&row, RunState::Paused));
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            serde_json::json!({"type": "Update", "id": 3, "state": "PAUSED"})
        );
    }
}
