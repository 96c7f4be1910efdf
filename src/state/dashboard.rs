//! Dashboard state snapshot and its transitions.

use crate::commands::{Command, CommandOutcome};
use crate::config_store::ConfigStore;
use crate::model::{LogEvent, RunStatus};
use crate::notify::{Notification, Notifications};
use crate::poller::{PollUpdate, StatusTracker};
use crate::state::{DashboardEvent, Effect};
use crate::stream::{ConnectionState, StreamUpdate};

/// Everything the dashboard shows, in one value.
///
/// `apply` consumes a snapshot and returns the next one together with the
/// work the runtime must start. Each field has one writer: the log list and
/// connection flag change only on stream updates, the run status only on
/// poll responses.
#[derive(Debug, Clone)]
pub struct DashboardState {
    connection: ConnectionState,
    status: StatusTracker,
    logs: Vec<LogEvent>,
    decode_failures: u64,
    scheduler: Option<bool>,
    /// Number given to the most recently issued scheduler fetch
    scheduler_fetches: u64,
    /// Fetches numbered below this were issued before the latest toggle
    scheduler_floor: u64,
    /// Scheduler writes sent but not yet answered
    scheduler_writes: usize,
    pub config: ConfigStore,
    pub notifications: Notifications,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Notifications::default())
    }
}

impl DashboardState {
    pub fn new(notifications: Notifications) -> Self {
        Self {
            connection: ConnectionState::Closed,
            status: StatusTracker::default(),
            logs: Vec::new(),
            decode_failures: 0,
            scheduler: None,
            scheduler_fetches: 0,
            scheduler_floor: 0,
            scheduler_writes: 0,
            config: ConfigStore::default(),
            notifications,
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn running(&self) -> bool {
        self.status.running()
    }

    /// Whether any status poll has been applied yet
    pub fn status_known(&self) -> bool {
        self.status.last_applied().is_some()
    }

    /// Status badge text
    pub fn badge(&self) -> &'static str {
        RunStatus::badge(self.running())
    }

    /// Log events in delivery order
    pub fn logs(&self) -> &[LogEvent] {
        &self.logs
    }

    /// Stream frames dropped because they could not be decoded
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures
    }

    /// Local belief about the scheduler; `None` until first fetched or toggled
    pub fn scheduler(&self) -> Option<bool> {
        self.scheduler
    }

    /// Produce the next snapshot
    pub fn apply(mut self, event: DashboardEvent) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match event {
            DashboardEvent::Stream(update) => self.on_stream(update),
            DashboardEvent::Poll(update) => self.on_poll(update),
            DashboardEvent::ConfigLoaded(Ok(config)) => {
                tracing::debug!("Loaded server config: {:?}", config);
                self.config.load(config);
            }
            DashboardEvent::ConfigLoaded(Err(e)) => {
                tracing::warn!("Config fetch failed: {}", e);
            }
            DashboardEvent::SchedulerFetched { seq, result } => self.on_scheduler_fetched(seq, result),
            DashboardEvent::SchedulerRefreshRequested => effects.push(self.fetch_scheduler()),
            DashboardEvent::DraftEdited(path) => self.config.set_library_path(path),
            DashboardEvent::SaveRequested => match self.config.begin_save() {
                Ok(config) => effects.push(Effect::Send(Command::SaveConfig(config))),
                Err(e) => self.notifications.push(Notification::warning(e.to_string())),
            },
            DashboardEvent::ReloadRequested => effects.push(Effect::FetchConfig),
            DashboardEvent::SchedulerToggled => {
                // Optimistic: the flip is shown before the backend answers
                let enable = !self.scheduler.unwrap_or(false);
                self.scheduler = Some(enable);
                self.scheduler_floor = self.scheduler_fetches + 1;
                self.scheduler_writes += 1;
                effects.push(Effect::Send(Command::SetScheduler(enable)));
            }
            DashboardEvent::CommandRequested(command) => effects.push(Effect::Send(command)),
            DashboardEvent::CommandFinished(outcome) => {
                self.on_command_finished(outcome, &mut effects)
            }
            DashboardEvent::NotificationDismissed(index) => self.notifications.dismiss(index),
        }

        (self, effects)
    }

    fn on_stream(&mut self, update: StreamUpdate) {
        match update {
            StreamUpdate::State(state) => self.connection = state,
            StreamUpdate::Event(event) => self.logs.push(event),
            StreamUpdate::DecodeFailed(_) => self.decode_failures += 1,
        }
    }

    fn on_poll(&mut self, update: PollUpdate) {
        match update.result {
            Ok(running) => {
                let was_running = self.status.running();
                if self.status.apply(update.seq, running) && was_running != running {
                    tracing::info!("Backend status changed: {}", RunStatus::badge(running));
                }
            }
            Err(e) => tracing::debug!("Keeping cached status after failed poll: {}", e),
        }
    }

    fn fetch_scheduler(&mut self) -> Effect {
        self.scheduler_fetches += 1;
        Effect::FetchScheduler(self.scheduler_fetches)
    }

    fn on_scheduler_fetched(&mut self, seq: u64, result: Result<bool, String>) {
        match result {
            Ok(active) if seq < self.scheduler_floor || self.scheduler_writes > 0 => {
                tracing::debug!("Dropping scheduler fetch #{} ({}) issued before a toggle", seq, active);
            }
            Ok(active) => self.scheduler = Some(active),
            Err(e) => tracing::warn!("Scheduler fetch failed: {}", e),
        }
    }

    fn on_command_finished(&mut self, outcome: CommandOutcome, effects: &mut Vec<Effect>) {
        match &outcome.command {
            Command::SaveConfig(sent) => self.config.finish_save(sent, outcome.ok),
            Command::SetScheduler(_) => {
                // Shown value stays until the backend is re-read, failed or not.
                // Only the write that settles last triggers the read.
                self.scheduler_writes = self.scheduler_writes.saturating_sub(1);
                if self.scheduler_writes == 0 {
                    effects.push(self.fetch_scheduler());
                }
            }
            _ => {}
        }
        self.notifications.push(outcome.notification);
    }
}
