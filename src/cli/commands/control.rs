//! Scan and database commands
//!
//! These only send the request. Whether a scan actually started shows up
//! in the next `status`.

use anyhow::Result;
use serde::Serialize;

use crate::cli::Invocation;
use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::commands::{self, Command, CommandOutcome};

#[derive(Serialize)]
struct CommandResult<'a> {
    command: &'static str,
    ok: bool,
    severity: &'static str,
    message: &'a str,
}

pub async fn start(invocation: &Invocation) -> Result<()> {
    send(Command::Start, invocation).await
}

pub async fn stop(invocation: &Invocation) -> Result<()> {
    send(Command::Stop, invocation).await
}

pub async fn update_db(invocation: &Invocation) -> Result<()> {
    send(Command::UpdateDb, invocation).await
}

/// Dispatch `command` and report its outcome; a failed command is an error
pub async fn send(command: Command, invocation: &Invocation) -> Result<()> {
    let client = invocation.client()?;
    let outcome = commands::dispatch(&client, command).await;
    report(&outcome, invocation.format, invocation.quiet);

    if !outcome.ok {
        anyhow::bail!("{}", outcome.notification.message);
    }
    Ok(())
}

fn report(outcome: &CommandOutcome, format: OutputFormat, quiet: bool) {
    match format {
        OutputFormat::Text if outcome.ok => print_success(&outcome.notification.message, quiet),
        // Failures surface through the returned error
        OutputFormat::Text => {}
        OutputFormat::Json => {
            let result = CommandResult {
                command: outcome.command.describe(),
                ok: outcome.ok,
                severity: outcome.notification.severity.label(),
                message: &outcome.notification.message,
            };
            print_formatted(&result, format, |r| r.message.to_string());
        }
    }
}
