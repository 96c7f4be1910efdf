//! Command dispatch.
//!
//! Each operator command is one request with no retry. Whatever happens,
//! the result comes back as a `CommandOutcome` carrying a notification, so
//! every command reports through the same surface.
//!
//! Start and stop never touch the cached run status: the next status poll
//! is the only authority on whether the backend changed state.

use crate::api::{ApiClient, ApiError};
use crate::model::ServerConfig;
use crate::notify::{Notification, Severity};

/// A state-changing request to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    UpdateDb,
    SetScheduler(bool),
    SaveConfig(ServerConfig),
}

impl Command {
    /// Short description used in messages
    pub fn describe(&self) -> &'static str {
        match self {
            Command::Start => "start scan",
            Command::Stop => "stop scan",
            Command::UpdateDb => "update database",
            Command::SetScheduler(true) => "enable scheduler",
            Command::SetScheduler(false) => "disable scheduler",
            Command::SaveConfig(_) => "save configuration",
        }
    }
}

/// What happened when a command was sent
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub command: Command,
    pub ok: bool,
    pub notification: Notification,
}

/// Send `command` and describe the result
pub async fn dispatch(client: &ApiClient, command: Command) -> CommandOutcome {
    tracing::info!("Sending command: {}", command.describe());
    let result = execute(client, &command).await;
    outcome(command, result)
}

async fn execute(client: &ApiClient, command: &Command) -> Result<Option<String>, ApiError> {
    match command {
        Command::Start => Ok(client.start().await?.status),
        Command::Stop => Ok(client.stop().await?.status),
        Command::UpdateDb => Ok(Some(client.update_db().await?.status)),
        Command::SetScheduler(enable) => Ok(client.set_scheduler(*enable).await?.status),
        Command::SaveConfig(config) => {
            client.save_config(config).await?;
            Ok(None)
        }
    }
}

/// Map a raw request result to an outcome
pub fn outcome(command: Command, result: Result<Option<String>, ApiError>) -> CommandOutcome {
    let (ok, notification) = match result {
        Ok(status) => (true, success_notification(&command, status)),
        Err(e) => (
            false,
            Notification::error(format!("Failed to {}: {}", command.describe(), e)),
        ),
    };
    CommandOutcome {
        command,
        ok,
        notification,
    }
}

fn success_notification(command: &Command, status: Option<String>) -> Notification {
    match command {
        Command::Start => Notification::info(format!(
            "Scan requested ({})",
            status.as_deref().unwrap_or("acknowledged")
        )),
        Command::Stop => Notification::info(format!(
            "Stop requested ({})",
            status.as_deref().unwrap_or("acknowledged")
        )),
        Command::UpdateDb => Notification::new(
            Severity::Success,
            format!(
                "{}. Progress appears in the live logs.",
                status.as_deref().unwrap_or("Database update started")
            ),
        ),
        Command::SetScheduler(true) => Notification::success("Scheduler enabled"),
        Command::SetScheduler(false) => Notification::success("Scheduler disabled"),
        Command::SaveConfig(_) => Notification::success("Configuration saved"),
    }
}
