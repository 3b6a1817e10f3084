//! Publish/subscribe channels connecting row actions to the backend.
//!
//! Commands travel over hot [`Subject`]s: every subscriber sees every message
//! published after it subscribed, nothing earlier. Delete outcomes travel over
//! a [`ResultFeed`], a subject whose elements are themselves one-shot result
//! streams, one per dispatched delete.

use crate::commands::{ActionResult, DeleteCommand, UpdateCommand};
use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::broadcast;

/// Default buffer of each subject before slow subscribers start lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Write side of a command channel.
///
/// Publishing never blocks and never fails from the caller's point of view.
pub trait CommandSink<T>: Send + Sync {
    fn publish(&self, message: T);
}

/// A hot multi-producer, multi-consumer channel.
pub struct Subject<T> {
    name: &'static str,
    tx: broadcast::Sender<T>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Subject<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { name, tx }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Subscribes now. Messages published before this call are not seen.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    /// Subscribes now and exposes the subscription as a stream.
    pub fn stream(&self) -> impl Stream<Item = T> + Send + 'static {
        receiver_stream(self.name, self.tx.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Send + 'static> CommandSink<T> for Subject<T> {
    fn publish(&self, message: T) {
        if self.tx.send(message).is_err() {
            tracing::debug!(channel = self.name, "No subscribers, message dropped");
        }
    }
}

/// Turns a broadcast subscription into a stream that skips over lag and ends
/// when every sender is gone.
pub fn receiver_stream<T: Clone + Send + 'static>(
    channel: &'static str,
    rx: broadcast::Receiver<T>,
) -> impl Stream<Item = T> + Send + 'static {
    stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(message) => return Some((message, rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(channel, skipped, "Subscriber lagged, messages skipped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

/// Stream of outcomes for a single dispatched action.
pub type ResultStream = BoxStream<'static, ActionResult>;

/// The not-yet-resolved outcome of one action, shareable between observers.
#[derive(Clone)]
pub struct PendingResult(Shared<oneshot::Receiver<ActionResult>>);

impl PendingResult {
    /// Yields the outcome once it arrives. Ends empty if the reporter is
    /// dropped without reporting.
    pub fn into_stream(self) -> ResultStream {
        self.0
            .into_stream()
            .filter_map(|outcome| async move { outcome.ok() })
            .boxed()
    }
}

impl std::fmt::Debug for PendingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PendingResult")
    }
}

/// Producer handle for one action's outcome.
pub struct ResultReporter {
    tx: oneshot::Sender<ActionResult>,
}

impl ResultReporter {
    /// Delivers the outcome. Returns false when nobody is observing anymore,
    /// which is not an error.
    pub fn report(self, result: ActionResult) -> bool {
        match self.tx.send(result) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Result arrived after every observer was released");
                false
            }
        }
    }
}

/// Stream-of-streams carrying delete outcomes.
#[derive(Clone)]
pub struct ResultFeed {
    subject: Subject<PendingResult>,
}

impl ResultFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            subject: Subject::new("delete-results", capacity),
        }
    }

    /// Opens the result stream for a newly dispatched action and announces it
    /// to current subscribers.
    pub fn begin(&self) -> ResultReporter {
        let (tx, rx) = oneshot::channel();
        self.subject.publish(PendingResult(rx.shared()));
        ResultReporter { tx }
    }

    /// Subscribes now; yields one nested stream per action begun afterwards.
    pub fn subscribe(&self) -> impl Stream<Item = ResultStream> + Send + 'static {
        self.subject.stream().map(PendingResult::into_stream)
    }
}

/// The command and result channels shared by every row of a console.
#[derive(Clone)]
pub struct ConsoleChannels {
    pub updates: Subject<UpdateCommand>,
    pub deletes: Subject<DeleteCommand>,
    pub delete_results: ResultFeed,
}

impl ConsoleChannels {
    pub fn new(capacity: usize) -> Self {
        Self {
            updates: Subject::new("update-status", capacity),
            deletes: Subject::new("delete", capacity),
            delete_results: ResultFeed::new(capacity),
        }
    }
}

impl Default for ConsoleChannels {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::CommandSink;
    use std::sync::Mutex;

    /// In-memory sink that records everything published to it.
    pub struct RecordingSink<T> {
        published: Mutex<Vec<T>>,
    }

    impl<T> Default for RecordingSink<T> {
        fn default() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
            }
        }
    }

    impl<T: Clone> RecordingSink<T> {
        pub fn published(&self) -> Vec<T> {
            self.published.lock().unwrap().clone()
        }
    }

    impl<T: Send> CommandSink<T> for RecordingSink<T> {
        fn publish(&self, message: T) {
            self.published.lock().unwrap().push(message);
        }
    }
}
