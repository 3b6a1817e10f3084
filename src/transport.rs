//! Bridge between the command channels and whatever talks to the backend.
//!
//! The REST client itself lives outside this crate behind [`Transport`]. The
//! [`CommandPump`] drains both command channels, hands each command to the
//! transport and reports delete outcomes on the result feed. Update outcomes
//! are only logged; nothing in the console observes them.

use crate::bus::{receiver_stream, ConsoleChannels, ResultFeed};
use crate::commands::{ActionResult, Command, DeleteCommand, UpdateCommand};
use crate::error::ConsoleError;
use crate::structured_logger::StructuredLogger;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Carries commands to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn update_state(&self, command: &UpdateCommand) -> Result<(), ConsoleError>;

    async fn delete(&self, command: &DeleteCommand) -> Result<(), ConsoleError>;
}

/// Counters for one pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub updates_sent: usize,
    pub updates_failed: usize,
    pub deletes_sent: usize,
    pub deletes_failed: usize,
}

/// Consumer of the command channels.
pub struct CommandPump {
    commands: stream::BoxStream<'static, Command>,
    results: ResultFeed,
    logger: Option<Arc<StructuredLogger>>,
}

impl CommandPump {
    /// Subscribes to the console's command channels. Only commands published
    /// after this call are pumped.
    pub fn subscribe(channels: &ConsoleChannels) -> Self {
        let updates = receiver_stream("update-status", channels.updates.subscribe())
            .map(Command::Update);
        let deletes =
            receiver_stream("delete", channels.deletes.subscribe()).map(Command::Delete);

        Self {
            commands: stream::select(updates, deletes).boxed(),
            results: channels.delete_results.clone(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<StructuredLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Runs until every sender of both command channels is gone.
    pub async fn run<T: Transport + ?Sized>(self, transport: &T) -> PumpStats {
        let Self {
            mut commands,
            results,
            logger,
        } = self;
        let mut stats = PumpStats::default();

        while let Some(command) = commands.next().await {
            match &command {
                Command::Update(update) => {
                    stats.updates_sent += 1;
                    if let Err(e) = transport.update_state(update).await {
                        stats.updates_failed += 1;
                        tracing::warn!(id = %update.id, "Update command failed: {}", e);
                        if let Some(logger) = &logger {
                            logger.log_transport_failure(&command, &e.to_string());
                        }
                    }
                }
                Command::Delete(delete) => {
                    stats.deletes_sent += 1;
                    let reporter = results.begin();
                    let outcome = match transport.delete(delete).await {
                        Ok(()) => ActionResult::success(),
                        Err(e) => {
                            stats.deletes_failed += 1;
                            if let Some(logger) = &logger {
                                logger.log_transport_failure(&command, &e.to_string());
                            }
                            ActionResult::failure(e.response_text())
                        }
                    };
                    reporter.report(outcome);
                }
            }
        }

        stats
    }
}

/// Transport that performs nothing and writes each command as a JSON line.
///
/// Deletes can be made to fail with a fixed response text to exercise the
/// error path without a backend.
pub struct DryRunTransport<W> {
    out: Mutex<W>,
    delete_failure: Option<String>,
}

impl<W: Write + Send> DryRunTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            delete_failure: None,
        }
    }

    pub fn failing_deletes(mut self, response_text: impl Into<String>) -> Self {
        self.delete_failure = Some(response_text.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, command: &Command) -> Result<(), ConsoleError> {
        let line = serde_json::to_string(command).map_err(|e| ConsoleError::Transport {
            status: None,
            response_text: e.to_string(),
        })?;
        let mut out = self.out.lock().map_err(|_| ConsoleError::Transport {
            status: None,
            response_text: "output lock poisoned".to_string(),
        })?;
        writeln!(out, "{}", line).map_err(|e| ConsoleError::Transport {
            status: None,
            response_text: e.to_string(),
        })
    }
}

#[async_trait]
impl<W: Write + Send> Transport for DryRunTransport<W> {
    async fn update_state(&self, command: &UpdateCommand) -> Result<(), ConsoleError> {
        self.emit(&Command::Update(command.clone()))
    }

    async fn delete(&self, command: &DeleteCommand) -> Result<(), ConsoleError> {
        self.emit(&Command::Delete(command.clone()))?;
        match &self.delete_failure {
            Some(response_text) => Err(ConsoleError::Transport {
                status: Some(409),
                response_text: response_text.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
