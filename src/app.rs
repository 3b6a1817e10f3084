//! Wires rows, dispatcher, pump and observer together for one operator action.

use crate::bus::ConsoleChannels;
use crate::dispatcher::{ActionDispatcher, Dispatched};
use crate::error::ConsoleError;
use crate::observer::{DeleteStatus, ResultObserver};
use crate::resolver::{offered_controls, Control};
use crate::row::{find_row, Row, RowId, RowKind};
use crate::run_state::RunState;
use crate::structured_logger::StructuredLogger;
use crate::transport::{CommandPump, PumpStats, Transport};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// The operator actions a row supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Toggle,
    Abort,
    Delete,
}

/// Reads the backend's JSON row list.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rows file as JSON: {}", path.display()))
}

/// Looks up a row by operator-supplied id.
pub fn select_row<'a>(rows: &'a [Row], id: &str) -> Result<&'a Row, ConsoleError> {
    find_row(rows, id).ok_or_else(|| ConsoleError::RowNotFound { id: id.to_string() })
}

/// One line of the controls listing.
#[derive(Debug, Clone, Serialize)]
pub struct RowControls {
    pub id: RowId,
    pub state: RunState,
    pub kind: &'static str,
    pub controls: Vec<Control>,
}

impl From<&Row> for RowControls {
    fn from(row: &Row) -> Self {
        Self {
            id: row.id.clone(),
            state: row.state,
            kind: match row.kind() {
                RowKind::Schedule => "schedule",
                RowKind::Run => "run",
            },
            controls: offered_controls(row),
        }
    }
}

/// Everything that happened for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub dispatched: Dispatched,
    pub stats: PumpStats,
    pub delete_status: DeleteStatus,
}

/// Runs one action against `row` through a fresh set of channels and waits
/// until the transport has handled every command and the row's delete
/// status has settled.
pub async fn perform<T: Transport + ?Sized>(
    action: RowAction,
    row: &Row,
    channel_capacity: usize,
    transport: &T,
    logger: Option<Arc<StructuredLogger>>,
) -> ActionReport {
    let channels = ConsoleChannels::new(channel_capacity);

    let mut pump = CommandPump::subscribe(&channels);
    let mut dispatcher: ActionDispatcher = ActionDispatcher::for_channels(&channels);
    if let Some(logger) = &logger {
        pump = pump.with_logger(logger.clone());
        dispatcher = dispatcher.with_logger(logger.clone());
    }
    let observer = ResultObserver::activate(channels.delete_results.subscribe(), logger);

    let dispatched = match action {
        RowAction::Toggle => dispatcher.request_status_change(row),
        RowAction::Abort => dispatcher.request_abort(row),
        RowAction::Delete => dispatcher.request_delete(row),
    };

    // The pump stops once no publisher is left.
    drop(dispatcher);
    drop(channels);

    let stats = pump.run(transport).await;
    let delete_status = observer.settled().await;

    ActionReport {
        dispatched,
        stats,
        delete_status,
    }
}
