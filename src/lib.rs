//! Lifecycle core of a Cassandra repair-management console.
//!
//! Decides which state transition a repair run or schedule row offers,
//! publishes operator actions as commands on shared channels, and projects
//! delete outcomes into a per-row error message.
//!
//! # Architecture
//!
//! - **RunState** (`run_state.rs`): lifecycle states and their groupings
//! - **Resolver** (`resolver.rs`): current state to offered transition
//! - **Dispatcher** (`dispatcher.rs`): operator action to one published command
//! - **Observer** (`observer.rs`): delete outcomes to a transient message
//! - **Bus** (`bus.rs`): hot subjects and the nested result feed
//! - **Transport** (`transport.rs`): pump from command channels to a backend

pub mod app;
pub mod bus;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console_paths;
pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod resolver;
pub mod row;
pub mod run_state;
pub mod structured_logger;
pub mod transport;

pub use bus::{CommandSink, ConsoleChannels, ResultFeed, Subject};
pub use commands::{ActionResult, Command, DeleteCommand, UpdateCommand};
pub use dispatcher::{ActionDispatcher, Dispatched};
pub use error::ConsoleError;
pub use observer::{DeleteStatus, ResultObserver};
pub use resolver::{resolve, Transition};
pub use row::{Owner, Row, RowId, RowKind};
pub use run_state::RunState;
