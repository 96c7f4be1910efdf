//! Dashboard runtime.
//!
//! Wires the log stream, the status poller and command requests into one
//! `DashboardState`. Background tasks never touch the state directly: they
//! post `DashboardEvent`s to a channel and the owner applies them in arrival
//! order with `drain` or `next`.

use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError};
use crate::commands::{self, Command};
use crate::config::Settings;
use crate::notify::Notifications;
use crate::poller::StatusPoller;
use crate::state::{DashboardEvent, DashboardState, Effect};
use crate::stream::LogStream;

/// Live connection to one backend.
///
/// Must be created inside a tokio runtime. Dropping it stops the stream and
/// the poller.
pub struct Dashboard {
    client: ApiClient,
    state: DashboardState,
    tx: mpsc::UnboundedSender<DashboardEvent>,
    rx: mpsc::UnboundedReceiver<DashboardEvent>,
    stream: Option<LogStream>,
    poller: Option<StatusPoller>,
}

impl Dashboard {
    /// Connect to the backend described by `settings` and start both loops
    pub fn start(settings: &Settings) -> Result<Self, ApiError> {
        let client = ApiClient::new(&settings.server.base_url)?;
        let stream_url = client.log_stream_url(&settings.server.log_stream_path)?;
        let (tx, rx) = mpsc::unbounded_channel();

        tracing::info!("Starting dashboard for {}", client.base_url());

        let stream = LogStream::spawn(stream_url, settings.sync.reconnect_delay(), tx.clone());
        let poller = StatusPoller::spawn(client.clone(), settings.sync.poll_interval(), tx.clone());

        let mut dashboard = Self {
            client,
            state: DashboardState::new(Notifications::with_capacity(settings.ui.max_notifications)),
            tx,
            rx,
            stream: Some(stream),
            poller: Some(poller),
        };

        dashboard.apply(DashboardEvent::ReloadRequested);
        dashboard.apply(DashboardEvent::SchedulerRefreshRequested);

        Ok(dashboard)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Apply one event and start whatever it asks for
    pub fn apply(&mut self, event: DashboardEvent) {
        let (state, effects) = std::mem::take(&mut self.state).apply(event);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Apply every queued event; returns how many were applied
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event and apply it
    pub async fn next(&mut self) -> Option<()> {
        let event = self.rx.recv().await?;
        self.apply(event);
        Some(())
    }

    fn run_effect(&self, effect: Effect) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        match effect {
            Effect::Send(command) => {
                tokio::spawn(async move {
                    let outcome = commands::dispatch(&client, command).await;
                    let _ = tx.send(DashboardEvent::CommandFinished(outcome));
                });
            }
            Effect::FetchScheduler(seq) => {
                tokio::spawn(async move {
                    let result = client
                        .scheduler()
                        .await
                        .map(|s| s.active)
                        .map_err(|e| e.to_string());
                    let _ = tx.send(DashboardEvent::SchedulerFetched { seq, result });
                });
            }
            Effect::FetchConfig => {
                tokio::spawn(async move {
                    let result = client.config().await.map_err(|e| e.to_string());
                    let _ = tx.send(DashboardEvent::ConfigLoaded(result));
                });
            }
        }
    }

    /// Send `command`; its outcome arrives later as a notification
    pub fn send(&mut self, command: Command) {
        self.apply(DashboardEvent::CommandRequested(command));
    }

    pub fn start_scan(&mut self) {
        self.send(Command::Start);
    }

    pub fn stop_scan(&mut self) {
        self.send(Command::Stop);
    }

    pub fn update_db(&mut self) {
        self.send(Command::UpdateDb);
    }

    pub fn toggle_scheduler(&mut self) {
        self.apply(DashboardEvent::SchedulerToggled);
    }

    pub fn edit_library_path(&mut self, path: String) {
        self.apply(DashboardEvent::DraftEdited(path));
    }

    pub fn save_config(&mut self) {
        self.apply(DashboardEvent::SaveRequested);
    }

    pub fn reload_config(&mut self) {
        self.apply(DashboardEvent::ReloadRequested);
    }

    pub fn dismiss_notification(&mut self, index: usize) {
        self.apply(DashboardEvent::NotificationDismissed(index));
    }

    /// Stop the stream and the poller. Events already queued can still be
    /// drained.
    pub fn shutdown(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.shutdown();
        }
        if let Some(poller) = self.poller.take() {
            poller.shutdown();
        }
        tracing::info!("Dashboard stopped");
    }

    /// Stop both loops and wait for their tasks to exit
    pub async fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop().await;
        }
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        tracing::info!("Dashboard stopped");
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }
}
