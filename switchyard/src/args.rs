use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Switchyard LLM gateway core
#[derive(Debug, Parser)]
#[command(name = "switchyard", about = "Route, translate and repair LLM gateway traffic")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml", env = "SWITCHYARD_CONFIG")]
    pub config: PathBuf,

    /// Log filter directives, e.g. `info` or `switchyard_routing=debug`
    #[arg(long, default_value = "info", env = "SWITCHYARD_LOG")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the configuration and summarize providers and routing
    Check,

    /// Route a canonical request and print the upstream request
    Route {
        /// Request payload file, or `-` for stdin
        payload: PathBuf,

        /// Treat the payload as an `OpenAI` chat completions request
        #[arg(long)]
        openai: bool,

        /// Recorded upstream response body to translate back
        #[arg(long)]
        response: Option<PathBuf>,
    },

    /// Recover tool calls from model output text
    Extract {
        /// Model that produced the text
        #[arg(short, long)]
        model: String,

        /// Text file, or `-` for stdin
        input: PathBuf,
    },
}
