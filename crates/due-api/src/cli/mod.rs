//! CLI command definitions and dispatch for the `due` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod episode;
pub mod resources;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

/// Chat with a learning agent and manage recorded episodes.
#[derive(Parser)]
#[command(name = "due", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "DUE_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the agent on the console. Type `,,,leave` to end the episode.
    Chat {
        /// Id you appear under in the episode.
        #[arg(long, default_value = "default@human.im")]
        user: String,
    },

    /// Show a recorded episode.
    Show {
        /// Episode id.
        id: Uuid,
    },

    /// Extract utterances or training pairs from a recorded episode.
    Extract {
        /// Episode id.
        id: Uuid,

        /// Emit input/output pairs instead of the utterance list.
        #[arg(long)]
        pairs: bool,

        /// Normalize texts (lowercase, collapse whitespace, trim punctuation).
        #[arg(long)]
        normalize: bool,

        /// Keep a placeholder for every non-utterance event.
        #[arg(long, conflicts_with = "pairs")]
        keep_holes: bool,
    },

    /// List recorded episodes.
    #[command(alias = "ls")]
    Episodes,

    /// Delete a recorded episode.
    #[command(alias = "rm")]
    Delete {
        /// Episode id.
        id: Uuid,
    },

    /// List registered resources and whether their files are present.
    Resources,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
