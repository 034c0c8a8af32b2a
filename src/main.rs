//! Bubbly - chat client CLI
//!
//! Main entry point for the Bubbly chat application.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bubbly::cli::{Cli, Commands, HistoryCommand};
use bubbly::commands;
use bubbly::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse_args();

    // If the user supplied a storage path on the CLI (or via env), mirror it
    // into BUBBLY_HISTORY_DB so the storage initializer can pick it up.
    if let Some(db_path) = &cli.storage_path {
        std::env::set_var("BUBBLY_HISTORY_DB", db_path);
        tracing::info!("Using storage DB override from CLI: {}", db_path);
    }

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { resume } => {
            tracing::info!("Starting interactive chat");
            commands::chat(&config, resume).await?;
        }
        Commands::History { command } => {
            let history = commands::build_history(&config)?;
            match command {
                HistoryCommand::List => commands::history_list(&history)?,
                HistoryCommand::Show { id } => commands::history_show(&history, &id)?,
                HistoryCommand::Delete { id } => commands::history_delete(&history, &id)?,
            }
        }
        Commands::Export { id, output } => {
            let history = commands::build_history(&config)?;
            commands::export(&history, &id, output)?;
        }
        Commands::Fmt { file } => {
            commands::format_input(file)?;
        }
    }

    Ok(())
}

/// Initialize tracing with an env-filter; defaults to warnings only so the
/// chat surface stays clean
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
