//! Live log and status commands

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::cli::Invocation;
use crate::cli::output::{OutputFormat, print_json_line};
use crate::dashboard::Dashboard;
use crate::model::LogEvent;
use crate::stream::{ConnectionState, LogStream, StreamUpdate};

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WatchLine<'a> {
    Log(&'a LogEvent),
    Connection { state: &'static str },
    Status { running: bool, badge: &'static str },
}

fn print_event(event: &LogEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json_line(&WatchLine::Log(event)),
        OutputFormat::Text => println!(
            "{} [{}] {}",
            event.local_time(),
            event.level,
            event.message
        ),
    }
}

fn print_connection(state: ConnectionState, format: OutputFormat, quiet: bool) {
    match format {
        OutputFormat::Json => print_json_line(&WatchLine::Connection {
            state: state.label(),
        }),
        OutputFormat::Text if !quiet => eprintln!("-- {} --", state.label()),
        OutputFormat::Text => {}
    }
}

/// Print log lines as they arrive.
///
/// Without `follow`, returns when the first connection closes (an error if
/// it never opened); with it, keeps reconnecting until Ctrl-C.
pub async fn logs(follow: bool, invocation: &Invocation) -> Result<()> {
    let client = invocation.client()?;
    let url = client.log_stream_url(&invocation.settings.server.log_stream_path)?;
    let (tx, mut rx) = mpsc::unbounded_channel::<StreamUpdate>();
    let stream = LogStream::spawn(url, invocation.settings.sync.reconnect_delay(), tx);

    let format = invocation.format;
    let mut was_open = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = rx.recv() => {
                let Some(update) = update else { break };
                match update {
                    StreamUpdate::Event(event) => print_event(&event, format),
                    StreamUpdate::DecodeFailed(reason) => {
                        tracing::warn!("Skipped unreadable log frame: {}", reason);
                    }
                    StreamUpdate::State(state) => {
                        print_connection(state, format, invocation.quiet);
                        match state {
                            ConnectionState::Open => was_open = true,
                            ConnectionState::Closed if !follow => break,
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    stream.stop().await;
    if !follow && !was_open {
        anyhow::bail!("Could not connect to the log stream at {}", client.base_url());
    }
    Ok(())
}

/// Run the full dashboard runtime headless, printing what changes
pub async fn watch(invocation: &Invocation) -> Result<()> {
    let mut dashboard = Dashboard::start(&invocation.settings)?;
    let format = invocation.format;

    let mut printed_logs = 0;
    let mut notifications_seen = 0;
    let mut last_running = None;
    let mut last_connection = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            applied = dashboard.next() => {
                if applied.is_none() {
                    break;
                }
            }
        }

        let state = dashboard.state();

        if last_connection != Some(state.connection()) {
            last_connection = Some(state.connection());
            print_connection(state.connection(), format, invocation.quiet);
        }

        // Status only counts once a poll has been applied
        if state.status_known() && last_running != Some(state.running()) {
            last_running = Some(state.running());
            match format {
                OutputFormat::Json => print_json_line(&WatchLine::Status {
                    running: state.running(),
                    badge: state.badge(),
                }),
                OutputFormat::Text => eprintln!("== {} ==", state.badge()),
            }
        }

        for event in &state.logs()[printed_logs..] {
            print_event(event, format);
        }
        printed_logs = state.logs().len();

        // Notifications are bounded; compare by total pushed, not position
        let pushed = state.notifications.pushed();
        let fresh = pushed - notifications_seen;
        let len = state.notifications.len();
        for notification in state.notifications.iter().skip(len.saturating_sub(fresh)) {
            if format == OutputFormat::Text && !invocation.quiet {
                eprintln!("!! {}: {}", notification.severity.label(), notification.message);
            }
        }
        notifications_seen = pushed;
    }

    dashboard.stop().await;
    Ok(())
}
