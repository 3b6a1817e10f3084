//! Turns operator actions on a row into commands on the shared channels.
//!
//! Dispatch is fire-and-forget: each request publishes at most one command and
//! returns. Outcomes are never awaited here; delete outcomes reach the
//! [`ResultObserver`](crate::observer::ResultObserver) through the result
//! feed, update outcomes are not reported back at all.

use crate::bus::{CommandSink, ConsoleChannels, Subject};
use crate::commands::{Command, DeleteCommand, UpdateCommand};
use crate::resolver::resolve;
use crate::row::Row;
use crate::run_state::RunState;
use crate::structured_logger::StructuredLogger;
use std::sync::Arc;

const DELETE_CHANNEL: &str = "delete";
const UPDATE_CHANNEL: &str = "update-status";

/// What a dispatch request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Exactly this command was published.
    Sent(Command),
    /// The row offered no status transition; nothing was published.
    NoTransition,
}

/// Publishes row actions onto a delete channel and an update-status channel.
///
/// Same-row requests are not serialized: two quick clicks publish two
/// commands, both of which may be in flight at once.
pub struct ActionDispatcher<D = Subject<DeleteCommand>, U = Subject<UpdateCommand>> {
    deletes: D,
    updates: U,
    logger: Option<Arc<StructuredLogger>>,
}

impl ActionDispatcher {
    /// A dispatcher publishing onto the console's shared subjects.
    pub fn for_channels(channels: &ConsoleChannels) -> Self {
        Self::new(channels.deletes.clone(), channels.updates.clone())
    }
}

impl<D, U> ActionDispatcher<D, U>
where
    D: CommandSink<DeleteCommand>,
    U: CommandSink<UpdateCommand>,
{
    pub fn new(deletes: D, updates: U) -> Self {
        Self {
            deletes,
            updates,
            logger: None,
        }
    }

    /// Records every published command in the structured log.
    pub fn with_logger(mut self, logger: Arc<StructuredLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Requests removal of the row, authorized by its owner.
    pub fn request_delete(&self, row: &Row) -> Dispatched {
        let command = DeleteCommand::from(row);
        self.deletes.publish(command.clone());
        self.sent(DELETE_CHANNEL, Command::Delete(command))
    }

    /// Requests an abort. Offered in every state, so it is never gated.
    pub fn request_abort(&self, row: &Row) -> Dispatched {
        self.send_update(UpdateCommand::new(row, RunState::Aborted))
    }

    /// Requests the row's status toggle as resolved right now.
    pub fn request_status_change(&self, row: &Row) -> Dispatched {
        match resolve(row) {
            Some(transition) => self.send_update(UpdateCommand::new(row, transition.target)),
            None => {
                tracing::debug!(id = %row.id, state = %row.state, "No status transition offered");
                if let Some(logger) = &self.logger {
                    logger.log_no_transition(&row.id, row.state);
                }
                Dispatched::NoTransition
            }
        }
    }

    fn send_update(&self, command: UpdateCommand) -> Dispatched {
        self.updates.publish(command.clone());
        self.sent(UPDATE_CHANNEL, Command::Update(command))
    }

    fn sent(&self, channel: &str, command: Command) -> Dispatched {
        if let Some(logger) = &self.logger {
            logger.log_command_sent(channel, &command);
        }
        Dispatched::Sent(command)
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
