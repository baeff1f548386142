//! CLI command definitions for the `aforge` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod agent;
pub mod forge;
pub mod terminal;
pub mod tiers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Forge AI agents from a tier or a custom build, then drive them from the Command Center.
#[derive(Parser)]
#[command(name = "aforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and essential results.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the pricing tiers and the custom builder options.
    Tiers,

    /// Forge a new agent.
    Forge {
        #[command(subcommand)]
        order: ForgeOrder,
    },

    /// List forged agents.
    #[command(alias = "ls")]
    Agents,

    /// Show details of an agent.
    Show {
        /// Agent id or unique id prefix.
        id: String,
    },

    /// Delete an agent.
    #[command(alias = "rm")]
    Delete {
        /// Agent id or unique id prefix.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Write an agent's generated project to disk.
    Export {
        /// Agent id or unique id prefix.
        id: String,

        /// Target directory (defaults to `<data dir>/exports/<name>-<id>`).
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Open the interactive Command Center for an agent.
    #[command(alias = "cc")]
    Terminal {
        /// Agent id or unique id prefix.
        id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ForgeOrder {
    /// Order one of the fixed pricing tiers.
    Tier {
        /// Tier id (see `aforge tiers`), e.g. `hunter_agent`.
        id: String,
    },

    /// Configure a custom build option by option.
    Custom {
        /// Agent name.
        #[arg(long)]
        name: String,

        /// Bot type, e.g. "Conversational AI" or "Trading Bot".
        #[arg(long = "bot-type")]
        bot_type: String,

        /// Feature to include (repeatable).
        #[arg(long = "feature", short = 'f')]
        features: Vec<String>,

        /// Personality, e.g. "Witty & Creative".
        #[arg(long)]
        personality: Option<String>,

        /// Trading tactic (required for trading bots).
        #[arg(long)]
        tactic: Option<String>,
    },
}
