//! Agent Forge CLI entry point.
//!
//! Binary name: `aforge`
//!
//! Parses CLI arguments, sets up tracing, initializes the database and
//! registry, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use agentforge_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, ForgeOrder};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions::from_verbosity(cli.verbose, cli.quiet).with_otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Neither completions nor the catalog need app state
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "aforge", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Tiers => return cli::tiers::show_catalog(cli.json),
        _ => {}
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Forge { order } => {
            let order = match order {
                ForgeOrder::Tier { id } => cli::forge::tier_order(&id)?,
                ForgeOrder::Custom {
                    name,
                    bot_type,
                    features,
                    personality,
                    tactic,
                } => cli::forge::custom_order(
                    name,
                    &bot_type,
                    &features,
                    personality.as_deref(),
                    tactic.as_deref(),
                )?,
            };
            cli::forge::forge(&state, order, cli.json, cli.quiet).await?;
        }

        Commands::Agents => {
            cli::agent::list_agents(&state, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::agent::show_agent(&state, &id, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::agent::delete_agent(&state, &id, force, cli.json).await?;
        }

        Commands::Export { id, out } => {
            cli::agent::export_agent(&state, &id, out, cli.json).await?;
        }

        Commands::Terminal { id } => {
            cli::terminal::loop_runner::run_terminal(&state, &id).await?;
        }

        // Handled before state init
        Commands::Tiers | Commands::Completions { .. } => {}
    }

    Ok(())
}
