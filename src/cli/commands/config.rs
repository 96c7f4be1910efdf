//! Configuration commands
//!
//! `show` and `set-library` work on the backend's configuration; `local`
//! and `path` on this client's settings file.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use crate::cli::Invocation;
use crate::cli::output::{OutputFormat, print_formatted};
use crate::commands::Command;
use crate::config::Settings;
use crate::config_store;

use super::control;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the backend configuration
    Show,

    /// Set the library path on the backend
    SetLibrary {
        /// Directory the backend organizes
        path: String,
    },

    /// Show local client settings
    Local,

    /// Show the local settings file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, invocation: &Invocation) -> Result<()> {
    match command {
        ConfigCommands::Show => show(invocation).await,
        ConfigCommands::SetLibrary { path } => set_library(path, invocation).await,
        ConfigCommands::Local => local(invocation),
        ConfigCommands::Path => path(invocation.format),
    }
}

async fn show(invocation: &Invocation) -> Result<()> {
    let config = invocation
        .client()?
        .config()
        .await
        .context("Failed to fetch backend configuration")?;

    print_formatted(&config, invocation.format, |c| {
        format!("library_path = {}", c.library_path)
    });
    Ok(())
}

async fn set_library(path: String, invocation: &Invocation) -> Result<()> {
    let client = invocation.client()?;

    // Send the full record with only the library path replaced
    let mut config = client
        .config()
        .await
        .context("Failed to fetch backend configuration")?;
    config.library_path = path.trim().to_string();
    config_store::validate(&config)?;

    control::send(Command::SaveConfig(config), invocation).await
}

fn local(invocation: &Invocation) -> Result<()> {
    match invocation.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&invocation.settings)?);
        }
        OutputFormat::Text => {
            println!("{}", toml::to_string_pretty(&invocation.settings)?);
        }
    }
    Ok(())
}

fn path(format: OutputFormat) -> Result<()> {
    let path = Settings::config_path()?;
    let result = ConfigPathResult {
        path: path.display().to_string(),
        exists: path.exists(),
    };

    print_formatted(&result, format, |r| {
        if r.exists {
            r.path.clone()
        } else {
            format!("{} (not created yet)", r.path)
        }
    });
    Ok(())
}
