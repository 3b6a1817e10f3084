//! Structured JSONL logger for auditing operator actions.
//!
//! This module provides machine-parseable logging with:
//! - Monotonic sequence numbers for ordering
//! - ISO 8601 timestamps with microsecond precision
//! - Session IDs for correlation
//! - Structured event data in JSON format

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::commands::{ActionResult, Command};
use crate::observer::DeleteStatus;
use crate::row::RowId;
use crate::run_state::RunState;

/// Structured JSONL logger for debugging and action reconstruction.
pub struct StructuredLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number (unique across entire session)
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds
    pub ts: String,
    /// Session ID
    pub session_id: String,
    /// Component that emitted the log
    pub component: String,
    /// Structured event data
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a new structured logger for the given session.
    ///
    /// Logs are written to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The logs directory cannot be created
    /// - The log file cannot be opened
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event.
    ///
    /// The event is serialized to JSON and written as a single line.
    /// This method is thread-safe.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs a command published on a command channel.
    pub fn log_command_sent(&self, channel: &str, command: &Command) {
        self.log(
            "Dispatcher",
            serde_json::json!({
                "type": "CommandSent",
                "channel": channel,
                "command": command
            }),
        );
    }

    /// Logs a status toggle that resolved to nothing.
    pub fn log_no_transition(&self, id: &RowId, state: RunState) {
        self.log(
            "Dispatcher",
            serde_json::json!({
                "type": "NoTransition",
                "id": id,
                "state": state
            }),
        );
    }

    /// Logs an outcome applied by a result observer.
    pub fn log_result_applied(&self, result: &ActionResult, status: &DeleteStatus) {
        self.log(
            "Observer",
            serde_json::json!({
                "type": "ResultApplied",
                "result": result,
                "message": status.message()
            }),
        );
    }

    /// Logs a result observer subscription change.
    pub fn log_subscription(&self, change: &str) {
        self.log(
            "Observer",
            serde_json::json!({
                "type": "Subscription",
                "change": change
            }),
        );
    }

    /// Logs a command the transport could not carry out.
    pub fn log_transport_failure(&self, command: &Command, error: &str) {
        self.log(
            "Transport",
            serde_json::json!({
                "type": "TransportFailure",
                "command": command,
                "error": error
            }),
        );
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

    /// Returns the current session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod tests;
