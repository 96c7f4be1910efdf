//! Scheduler commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use crate::cli::Invocation;
use crate::cli::output::print_formatted;
use crate::commands::Command;

use super::control;

#[derive(Subcommand, Debug)]
pub enum SchedulerCommands {
    /// Show whether automatic scans are enabled
    Show,

    /// Enable automatic scans
    On,

    /// Disable automatic scans
    Off,

    /// Flip the current setting
    Toggle,
}

#[derive(Serialize)]
struct SchedulerResult {
    active: bool,
}

pub async fn run(command: SchedulerCommands, invocation: &Invocation) -> Result<()> {
    match command {
        SchedulerCommands::Show => show(invocation).await,
        SchedulerCommands::On => control::send(Command::SetScheduler(true), invocation).await,
        SchedulerCommands::Off => control::send(Command::SetScheduler(false), invocation).await,
        SchedulerCommands::Toggle => {
            let active = fetch(invocation).await?;
            control::send(Command::SetScheduler(!active), invocation).await
        }
    }
}

async fn fetch(invocation: &Invocation) -> Result<bool> {
    let state = invocation
        .client()?
        .scheduler()
        .await
        .context("Failed to fetch scheduler state")?;
    Ok(state.active)
}

async fn show(invocation: &Invocation) -> Result<()> {
    let result = SchedulerResult {
        active: fetch(invocation).await?,
    };
    print_formatted(&result, invocation.format, |r| {
        if r.active {
            "Scheduler: active".to_string()
        } else {
            "Scheduler: inactive".to_string()
        }
    });
    Ok(())
}
