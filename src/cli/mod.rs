//! CLI module for Undertekst.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::FetchMode;
use clap::{Parser, Subcommand};

/// Undertekst - YouTube caption extraction
///
/// Resolves the best available caption track of a video (uploaded, auto-generated,
/// or machine-translated) and flattens it into plain text.
#[derive(Parser, Debug)]
#[command(name = "undertekst")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "UNDERTEKST_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the transcript of a video
    Fetch {
        /// YouTube URL or video ID
        url: String,

        /// Caption language code (defaults to captions.default_language)
        #[arg(short, long)]
        language: Option<String>,

        /// Print the full result record as JSON
        #[arg(long)]
        json: bool,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Payload retrieval mode (direct, materialize); overrides captions.fetch_mode
        #[arg(long)]
        fetch_mode: Option<FetchMode>,
    },

    /// List the caption tracks available for a video
    Tracks {
        /// YouTube URL or video ID
        url: String,
    },

    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
