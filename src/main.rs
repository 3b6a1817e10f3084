use anyhow::{bail, Context, Result};
use clap::Parser;
use repair_console::app::{load_rows, perform, select_row, RowAction, RowControls};
use repair_console::cli::{Cli, CliCommand, RowTarget};
use repair_console::config::ConsoleConfig;
use repair_console::console_paths;
use repair_console::structured_logger::StructuredLogger;
use repair_console::transport::DryRunTransport;
use repair_console::Dispatched;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::load_or_default(&console_paths::config_path()?)?,
    };

    let logger = if cli.no_log || !config.logging.enabled {
        None
    } else {
        let logs_dir = config.logs_dir()?;
        let logger = StructuredLogger::new(&config.session_id(), &logs_dir)
            .with_context(|| format!("Failed to open action log in {}", logs_dir.display()))?;
        Some(Arc::new(logger))
    };

    match cli.command {
        CliCommand::Controls { rows } => {
            for row in load_rows(&rows)? {
                println!("{}", serde_json::to_string(&RowControls::from(&row))?);
            }
            Ok(())
        }
        CliCommand::Toggle(target) => {
            run_action(RowAction::Toggle, &target, None, &config, logger).await
        }
        CliCommand::Abort(target) => {
            run_action(RowAction::Abort, &target, None, &config, logger).await
        }
        CliCommand::Delete { target, fail_with } => {
            run_action(RowAction::Delete, &target, fail_with, &config, logger).await
        }
    }
}

async fn run_action(
    action: RowAction,
    target: &RowTarget,
    fail_with: Option<String>,
    config: &ConsoleConfig,
    logger: Option<Arc<StructuredLogger>>,
) -> Result<()> {
    let rows = load_rows(&target.rows)?;
    let row = select_row(&rows, &target.id)?;

    let mut transport = DryRunTransport::new(std::io::stdout());
    if let Some(response_text) = fail_with {
        transport = transport.failing_deletes(response_text);
    }

    let report = perform(action, row, config.channel_capacity, &transport, logger).await;

    if report.dispatched == Dispatched::NoTransition {
        eprintln!(
            "Row {} is {}, which offers no status change",
            row.id, row.state
        );
    }
    if report.stats.deletes_failed > 0 {
        bail!(
            "Delete of row {} failed: {}",
            row.id,
            report.delete_status.message().unwrap_or("no response text")
        );
    }
    Ok(())
}
