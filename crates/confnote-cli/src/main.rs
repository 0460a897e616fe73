//! Confnote CLI - command-line interface for the confirmation-note
//! extraction pipeline.

use clap::Parser;
use confnote_cli::{commands, output, Cli, Command, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> confnote_cli::Result<()> {
    // Logs go to stderr; stdout is for tables, JSON, and summaries.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Run => {
            let summary = commands::execute_run(&config).await?;
            output::print_summary(&summary);
        }
        Command::Retrieve => {
            let summary = commands::execute_retrieve(&config)?;
            output::print_summary(&summary);
        }
        Command::Extract(args) => {
            let summary = commands::execute_extract(&config, &args).await?;
            output::print_summary(&summary);
        }
        Command::Status(args) => {
            commands::execute_status(&config, &args)?;
        }
    }

    Ok(())
}
