//! Error types for the repair console.

use std::fmt::{Display, Formatter};

/// Errors that can occur while resolving or carrying out row actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// A state name that is not part of the run/schedule lifecycle.
    UnknownState { name: String },
    /// No row with the requested identifier exists in the row set.
    RowNotFound { id: String },
    /// The backend rejected or failed a command.
    Transport {
        status: Option<u16>,
        response_text: String,
    },
    /// Configuration could not be read or parsed.
    Config { message: String },
}

impl ConsoleError {
    /// Text shown to the operator when this error ends up in a row's message.
    ///
    /// Transport failures surface the raw backend response body, everything
    /// else uses the `Display` form.
    pub fn response_text(&self) -> String {
        match self {
            Self::Transport { response_text, .. } => response_text.clone(),
            other => other.to_string(),
        }
    }
}

impl Display for ConsoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownState { name } => write!(f, "unknown run state: {}", name),
            Self::RowNotFound { id } => write!(f, "no row with id {}", id),
            Self::Transport {
                status: Some(status),
                response_text,
            } => write!(f, "transport failure ({}): {}", status, response_text),
            Self::Transport {
                status: None,
                response_text,
            } => write!(f, "transport failure: {}", response_text),
            Self::Config { message } => write!(f, "invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for ConsoleError {}
