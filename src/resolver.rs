//! Decides which status transition a row offers to the operator.
//!
//! Resolution is a pure function of the row. Views call it on every render
//! and dispatchers call it again at click time, so a stale target from an
//! earlier render can never be sent.

use crate::row::{Row, RowKind};
use crate::run_state::RunState;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Label of the status toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToggleLabel {
    Stop,
    Activate,
}

impl ToggleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleLabel::Stop => "Stop",
            ToggleLabel::Activate => "Activate",
        }
    }
}

impl Display for ToggleLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition offered for a row: what the control says and where it leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub label: ToggleLabel,
    pub target: RunState,
}

/// Resolves the status toggle for a row, first match wins:
///
/// | state                  | label      | target                          |
/// |------------------------|------------|---------------------------------|
/// | ACTIVE, RUNNING        | Stop       | PAUSED                          |
/// | PAUSED, NOT_STARTED    | Activate   | ACTIVE (schedule) / RUNNING (run) |
/// | anything else          | none       |                                 |
pub fn resolve(row: &Row) -> Option<Transition> {
    if row.state.is_running_like() {
        return Some(Transition {
            label: ToggleLabel::Stop,
            target: RunState::Paused,
        });
    }

    if row.state.is_paused_like() {
        let target = match row.kind() {
            RowKind::Schedule => RunState::Active,
            RowKind::Run => RunState::Running,
        };
        return Some(Transition {
            label: ToggleLabel::Activate,
            target,
        });
    }

    None
}

/// A control a row view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "control")]
pub enum Control {
    Toggle(Transition),
    Abort,
    Delete,
}

/// Controls offered for a row, in display order.
///
/// Abort and delete are never gated on state; only the toggle depends on the
/// resolver.
pub fn offered_controls(row: &Row) -> Vec<Control> {
    let mut controls = Vec::with_capacity(3);
    if let Some(transition) = resolve(row) {
        controls.push(Control::Toggle(transition));
    }
    controls.push(Control::Abort);
    controls.push(Control::Delete);
    controls
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
