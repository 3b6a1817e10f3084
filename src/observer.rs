//! Projects delete outcomes into a row's transient error message.
//!
//! [`DeleteStatus`] is the pure state machine, [`ResultObserver`] the scoped
//! subscription that drives it from a stream of per-action result streams.

use crate::commands::ActionResult;
use crate::structured_logger::StructuredLogger;
use futures::stream::{SelectAll, Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Visible delete status of one row view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteStatus {
    /// No message shown.
    #[default]
    Idle,
    /// The most recent delete failed with this message.
    Error(String),
}

impl DeleteStatus {
    /// Status after an outcome arrives. A success clears any message, a
    /// failure replaces it. A failure without response text has nothing to
    /// show and clears it too.
    pub fn apply(&self, result: &ActionResult) -> DeleteStatus {
        match &result.message {
            Some(message) if !result.succeeded && !message.is_empty() => {
                DeleteStatus::Error(message.clone())
            }
            _ => DeleteStatus::Idle,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            DeleteStatus::Idle => None,
            DeleteStatus::Error(message) => Some(message),
        }
    }
}

/// Live subscription to delete outcomes, owned by one row view.
///
/// Dropping the observer releases the subscription. After release no
/// further outcome changes the status, and outcomes still in flight are
/// discarded without error on either side.
pub struct ResultObserver {
    status_rx: watch::Receiver<DeleteStatus>,
    released: Arc<AtomicBool>,
    final_status: Option<DeleteStatus>,
    task: Option<JoinHandle<()>>,
    logger: Option<Arc<StructuredLogger>>,
}

impl ResultObserver {
    /// Subscribes to `source`, a stream yielding one nested stream per
    /// dispatched action. Nested streams are observed concurrently and their
    /// outcomes applied in arrival order.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate<S, R>(source: S, logger: Option<Arc<StructuredLogger>>) -> Self
    where
        S: Stream<Item = R> + Send + 'static,
        R: Stream<Item = ActionResult> + Send + 'static,
    {
        let (status_tx, status_rx) = watch::channel(DeleteStatus::Idle);
        if let Some(logger) = &logger {
            logger.log_subscription("activated");
        }

        let released = Arc::new(AtomicBool::new(false));
        let task_released = released.clone();
        let task_logger = logger.clone();
        let task = tokio::spawn(async move {
            let mut actions = Box::pin(source);
            let mut pending = SelectAll::new();
            let mut source_done = false;

            while !task_released.load(Ordering::SeqCst) {
                // Lets abort land under an always-ready source.
                tokio::task::consume_budget().await;
                tokio::select! {
                    nested = actions.next(), if !source_done => match nested {
                        Some(nested) => pending.push(nested.boxed()),
                        None => source_done = true,
                    },
                    Some(result) = pending.next(), if !pending.is_empty() => {
                        let next = status_tx.borrow().apply(&result);
                        // Checked under the channel's write lock, so a
                        // release that has returned is never overtaken.
                        let applied = status_tx.send_if_modified(|status| {
                            if task_released.load(Ordering::SeqCst) {
                                return false;
                            }
                            *status = next.clone();
                            true
                        });
                        if applied {
                            if let Some(logger) = &task_logger {
                                logger.log_result_applied(&result, &next);
                            }
                        }
                    }
                    else => break,
                }
            }
        });

        Self {
            status_rx,
            released,
            final_status: None,
            task: Some(task),
            logger,
        }
    }

    /// Current status. Frozen once the observer is released.
    pub fn status(&self) -> DeleteStatus {
        match &self.final_status {
            Some(status) => status.clone(),
            None => self.status_rx.borrow().clone(),
        }
    }

    /// Message to show, if any.
    pub fn message(&self) -> Option<String> {
        self.status().message().map(str::to_string)
    }

    /// A receiver that is notified on every status change.
    pub fn watch(&self) -> watch::Receiver<DeleteStatus> {
        self.status_rx.clone()
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Waits until the source has ended and every nested stream has
    /// delivered, then returns the final status.
    pub async fn settled(mut self) -> DeleteStatus {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Result observer task ended abnormally: {}", e);
            }
        }
        self.status()
    }

    /// Stops observing. Safe to call more than once.
    ///
    /// Once this returns the status no longer changes, even while the task
    /// is still running on another worker.
    pub fn release(&mut self) {
        if let Some(task) = self.task.take() {
            self.released.store(true, Ordering::SeqCst);
            // Waits out a write already past the release check.
            self.final_status = Some(self.status_rx.borrow().clone());
            task.abort();
            if let Some(logger) = &self.logger {
                logger.log_subscription("released");
            }
        }
    }
}

impl Drop for ResultObserver {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "tests/observer_tests.rs"]
mod tests;
