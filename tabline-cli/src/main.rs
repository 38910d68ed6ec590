//! Tabline CLI: interactive console with multi-token tab completion.
//!
//! Runs a raw-mode line editor on a terminal, or reads lines from stdin
//! when input is piped.

mod commands;
mod demo;
mod editor;

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use tabline_core::Console;

use crate::editor::ScreenSink;

/// Tabline: a console that completes multi-word commands as you type
#[derive(Parser, Debug)]
#[command(name = "tabline", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (reads `.tabline/config.toml` from it)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Read lines from stdin even when attached to a terminal
    #[arg(long)]
    no_interactive: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Complete a partial line against the demo command set and print it
    Complete {
        /// The partial line
        line: String,

        /// Only complete the identifying tokens of each command
        #[arg(long)]
        fixed_only: bool,

        /// Also print the ranked suggestion listing
        #[arg(long)]
        suggest: bool,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default configuration file in the workspace
    Init,
    /// Show the current configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // stderr stays silent while raw mode owns the terminal
    let interactive =
        cli.command.is_none() && !cli.no_interactive && std::io::stdin().is_terminal();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = stderr_filter(cli.verbose, cli.quiet, interactive);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "tabline", "tabline")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "tabline.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    // Handle subcommands
    if let Some(command) = cli.command {
        return commands::handle_command(command, &workspace);
    }

    let config = tabline_core::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    tracing::info!(workspace = %workspace.display(), "Starting console");

    let sink = ScreenSink::new(config.output.capacity);
    let mut console = Console::with_sink(config, sink);
    let session = demo::register_demo_commands(&mut console);

    if interactive {
        editor::run_interactive(&mut console, &session)?;
    } else {
        editor::run_lines(&mut console, &session)?;
    }

    Ok(())
}

/// Filter directive for the stderr layer. Interactive sessions log to the file only.
fn stderr_filter(verbose: u8, quiet: bool, interactive: bool) -> &'static str {
    if interactive {
        return "off";
    }
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
