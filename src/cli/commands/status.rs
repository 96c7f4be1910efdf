//! Run status command

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::Invocation;
use crate::cli::output::print_formatted;
use crate::model::RunStatus;

#[derive(Serialize)]
struct StatusResult {
    server: String,
    running: bool,
    badge: &'static str,
}

pub async fn run(invocation: &Invocation) -> Result<()> {
    let client = invocation.client()?;
    let status = client
        .status()
        .await
        .context("Failed to fetch run status")?;

    let result = StatusResult {
        server: client.base_url().to_string(),
        running: status.running,
        badge: RunStatus::badge(status.running),
    };

    print_formatted(&result, invocation.format, |r| {
        format!("{}  ({})", r.badge, r.server)
    });
    Ok(())
}
