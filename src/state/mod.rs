//! Application state modules
//!
//! `DashboardState` is the single container for live backend state. Every
//! change arrives as a `DashboardEvent`; applying one yields the next
//! snapshot plus the `Effect`s the runtime must carry out.

mod dashboard;
mod inventory;
mod ui;

pub use dashboard::DashboardState;
pub use inventory::InventoryState;
pub use ui::{Tab, UiState};

use crate::commands::{Command, CommandOutcome};
use crate::model::ServerConfig;
use crate::poller::PollUpdate;
use crate::stream::StreamUpdate;

/// Inputs to the dashboard state
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// Log stream state change, event, or dropped frame
    Stream(StreamUpdate),

    /// Status poll response
    Poll(PollUpdate),

    /// Server configuration fetched (or not)
    ConfigLoaded(Result<ServerConfig, String>),

    /// Scheduler state fetched (or not); `seq` is the number the fetch was issued with
    SchedulerFetched { seq: u64, result: Result<bool, String> },

    /// Re-read the scheduler state from the backend
    SchedulerRefreshRequested,

    /// Operator edited the library path draft
    DraftEdited(String),

    /// Operator pressed save
    SaveRequested,

    /// Operator asked to discard the draft and re-read the server copy
    ReloadRequested,

    /// Operator flipped the scheduler switch
    SchedulerToggled,

    /// Operator asked for a start/stop/update
    CommandRequested(Command),

    /// A command request completed
    CommandFinished(CommandOutcome),

    /// Operator closed a notification
    NotificationDismissed(usize),
}

impl From<StreamUpdate> for DashboardEvent {
    fn from(update: StreamUpdate) -> Self {
        DashboardEvent::Stream(update)
    }
}

impl From<PollUpdate> for DashboardEvent {
    fn from(update: PollUpdate) -> Self {
        DashboardEvent::Poll(update)
    }
}

/// Work requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a command to the backend
    Send(Command),
    /// Re-read the scheduler state, tagged with its issue number
    FetchScheduler(u64),
    /// Re-read the server configuration
    FetchConfig,
}
