//! Command-line interface.
//!
//! Every subcommand talks to the backend named by `--server` (or the
//! `RENAMER_DASH_SERVER` environment variable), falling back to the URL in
//! the local settings file. Running without a subcommand opens the GUI.

mod commands;
mod output;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::config::Settings;

pub use output::OutputFormat;

/// Renamer Dash - dashboard for the AudioRenamer backend
#[derive(Parser, Debug)]
#[command(name = "renamer-dash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides the settings file)
    #[arg(long, global = true, env = "RENAMER_DASH_SERVER")]
    pub server: Option<String>,

    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    /// Subcommand; the GUI starts when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show whether a scan is running
    Status,

    /// Start a scan
    Start,

    /// Stop the running scan
    Stop,

    /// Refresh the catalog database from upstream
    UpdateDb,

    /// Automatic scan scheduler
    Scheduler {
        #[command(subcommand)]
        command: commands::scheduler::SchedulerCommands,
    },

    /// Backend and local configuration
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Catalog inventory
    Inventory {
        #[command(subcommand)]
        command: commands::inventory::InventoryCommands,
    },

    /// Print backend log lines
    Logs {
        /// Keep reconnecting and printing until Ctrl-C
        #[arg(short, long)]
        follow: bool,
    },

    /// Stream logs and status changes until Ctrl-C
    Watch,

    /// Interactive shell
    Shell,
}

/// Shared inputs for every subcommand
#[derive(Debug, Clone)]
pub struct Invocation {
    pub settings: Settings,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Invocation {
    /// Load local settings and apply the command-line overrides
    pub fn new(server: Option<String>, output: &OutputOptions) -> Self {
        let mut settings = Settings::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        });
        if let Some(server) = server {
            settings.server.base_url = server;
        }
        Self {
            settings,
            format: output.format(),
            quiet: output.quiet,
        }
    }

    /// REST client for the selected backend
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.settings.server.base_url)
            .with_context(|| format!("Invalid server URL '{}'", self.settings.server.base_url))
    }
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> Result<()> {
    let invocation = Invocation::new(cli.server, &cli.output);

    match cli.command {
        Some(Commands::Shell) => shell::run(invocation).await,
        Some(command) => dispatch(command, &invocation).await,
        None => Ok(()),
    }
}

/// Run one non-shell subcommand
async fn dispatch(command: Commands, invocation: &Invocation) -> Result<()> {
    match command {
        Commands::Status => commands::status::run(invocation).await,
        Commands::Start => commands::control::start(invocation).await,
        Commands::Stop => commands::control::stop(invocation).await,
        Commands::UpdateDb => commands::control::update_db(invocation).await,
        Commands::Scheduler { command } => commands::scheduler::run(command, invocation).await,
        Commands::Config { command } => commands::config::run(command, invocation).await,
        Commands::Inventory { command } => commands::inventory::run(command, invocation).await,
        Commands::Logs { follow } => commands::logs::logs(follow, invocation).await,
        Commands::Watch => commands::logs::watch(invocation).await,
        Commands::Shell => anyhow::bail!("Already in shell mode."),
    }
}
