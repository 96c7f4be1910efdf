//! WebSocket driver for the log stream.
//!
//! Runs `ConnectionMachine` on a tokio task: performs its effects against a
//! real socket and forwards state changes and decoded events to a single
//! subscriber channel.

use std::collections::VecDeque;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::machine::{ConnectionMachine, ConnectionState, TransportEffect, TransportInput};
use crate::model::LogEvent;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the stream reports to its subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    State(ConnectionState),
    Event(LogEvent),
    DecodeFailed(String),
}

/// Handle to a running log stream.
///
/// Dropping the handle cancels the stream: the socket is closed and no
/// further reconnect is scheduled.
#[derive(Debug)]
pub struct LogStream {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl LogStream {
    /// Spawn the stream task for `url`, reporting to `tx`
    pub fn spawn<E>(url: Url, reconnect_delay: Duration, tx: mpsc::UnboundedSender<E>) -> Self
    where
        E: From<StreamUpdate> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(url, reconnect_delay, tx, token.clone()));
        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Stop the stream
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the stream and wait for the task to exit
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Log stream task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run<E>(
    url: Url,
    reconnect_delay: Duration,
    tx: mpsc::UnboundedSender<E>,
    token: CancellationToken,
) where
    E: From<StreamUpdate> + Send + 'static,
{
    let mut machine = ConnectionMachine::new(reconnect_delay);
    let mut pending: VecDeque<TransportEffect> = machine.start().into();
    let mut socket: Option<Socket> = None;

    tracing::info!("Starting log stream for {}", url);

    loop {
        while let Some(effect) = pending.pop_front() {
            let input = match effect {
                TransportEffect::Connect => {
                    tracing::debug!("Connecting to {} (attempt {})", url, machine.attempts());
                    tokio::select! {
                        _ = token.cancelled() => Some(TransportInput::Shutdown),
                        result = tokio_tungstenite::connect_async(url.as_str()) => match result {
                            Ok((ws, _response)) => {
                                socket = Some(ws);
                                tracing::info!("Log stream connected");
                                Some(TransportInput::Opened)
                            }
                            Err(e) => Some(TransportInput::Error(e.to_string())),
                        },
                    }
                }
                TransportEffect::ScheduleReconnect(delay) => {
                    tracing::debug!("Reconnecting log stream in {:?}", delay);
                    tokio::select! {
                        _ = token.cancelled() => Some(TransportInput::Shutdown),
                        _ = tokio::time::sleep(delay) => Some(TransportInput::TimerFired),
                    }
                }
                TransportEffect::Deliver(event) => {
                    if tx.send(StreamUpdate::Event(event).into()).is_err() {
                        Some(TransportInput::Shutdown)
                    } else {
                        None
                    }
                }
                TransportEffect::DecodeFailed(reason) => {
                    tracing::warn!("Dropping malformed log frame: {}", reason);
                    let _ = tx.send(StreamUpdate::DecodeFailed(reason).into());
                    None
                }
                TransportEffect::StateChanged(state) => {
                    if state == ConnectionState::Closed && !machine.is_stopped() {
                        tracing::warn!("Log stream disconnected");
                    }
                    if tx.send(StreamUpdate::State(state).into()).is_err() && !machine.is_stopped() {
                        Some(TransportInput::Shutdown)
                    } else {
                        None
                    }
                }
                TransportEffect::Disconnect => {
                    if let Some(mut ws) = socket.take() {
                        if let Err(e) = ws.close(None).await {
                            tracing::debug!("Error closing log stream: {}", e);
                        }
                    }
                    None
                }
            };

            if let Some(input) = input {
                if input == TransportInput::Shutdown {
                    // Effects queued before shutdown are moot
                    pending.clear();
                }
                pending.extend(machine.handle(input));
            }
        }

        if machine.is_stopped() {
            tracing::info!("Log stream stopped");
            return;
        }

        let Some(ws) = socket.as_mut() else {
            // Nothing to read and nothing scheduled; only reachable after shutdown
            return;
        };

        let input = tokio::select! {
            _ = token.cancelled() => TransportInput::Shutdown,
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => TransportInput::Frame(text),
                Some(Ok(Message::Close(_))) | None => TransportInput::Closed,
                Some(Ok(_)) => continue,
                Some(Err(e)) => TransportInput::Error(e.to_string()),
            },
        };

        if matches!(input, TransportInput::Closed | TransportInput::Error(_)) {
            socket = None;
        }
        pending.extend(machine.handle(input));
    }
}
