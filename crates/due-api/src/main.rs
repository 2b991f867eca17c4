//! Due CLI entry point.
//!
//! Binary name: `due`
//!
//! Parses CLI arguments, sets up tracing, loads configuration and storage,
//! then dispatches to the command handler.

mod cli;
mod corpus;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,due=debug",
        _ => "trace",
    };
    due_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "due", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Chat { user } => cli::chat::run(&state, &user).await,
        Commands::Show { id } => cli::episode::show(&state, id, cli.json).await,
        Commands::Extract {
            id,
            pairs,
            normalize,
            keep_holes,
        } => {
            let options = cli::episode::ExtractOptions {
                pairs,
                normalize,
                keep_holes,
            };
            cli::episode::extract(&state, id, options, cli.json).await
        }
        Commands::Episodes => cli::episode::list(&state, cli.json).await,
        Commands::Delete { id } => cli::episode::delete(&state, id, cli.json).await,
        Commands::Resources => cli::resources::list(&state, cli.json),
        Commands::Completions { .. } => Ok(()),
    };

    due_observe::tracing_setup::shutdown_tracing();
    result
}
