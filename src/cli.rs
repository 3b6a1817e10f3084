use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repair-console")]
#[command(about = "Lifecycle controls for Cassandra repair runs and schedules")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("REPAIR_CONSOLE_GIT_SHA"), ")"))]
pub struct Cli {
    /// Config file (default: ~/.repair-console/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Do not write the structured action log
    #[arg(long, global = true)]
    pub no_log: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// List the controls each row offers
    Controls {
        /// JSON array of rows as listed by the backend
        #[arg(long)]
        rows: PathBuf,
    },
    /// Stop or activate a row, depending on its current state
    Toggle(RowTarget),
    /// Abort a row
    Abort(RowTarget),
    /// Delete a row
    Delete {
        #[command(flatten)]
        target: RowTarget,

        /// Simulate the backend rejecting the delete with this response text
        #[arg(long)]
        fail_with: Option<String>,
    },
}

#[derive(Args)]
pub struct RowTarget {
    /// JSON array of rows as listed by the backend
    #[arg(long)]
    pub rows: PathBuf,

    /// Id of the row to act on
    #[arg(long)]
    pub id: String,
}
