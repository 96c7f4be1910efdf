//! Connection state machine for the log stream.
//!
//! The machine owns no socket and no timer. It consumes discrete inputs
//! (handshake done, frame, error, close, timer fired, shutdown) and answers
//! with the effects the driver must perform. That keeps the reconnect policy
//! testable without a network.
//!
//! ```text
//!   start ──► Connecting ──Opened──► Open
//!                 ▲                   │
//!            TimerFired          Error/Closed
//!                 │                   ▼
//!                 └──(backoff)──── Closed
//! ```

use std::time::Duration;

use crate::model::LogEvent;

/// Visible state of the stream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    Connecting,
    Open,
    #[default]
    Closed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Open => "Connected",
            ConnectionState::Closed => "Disconnected",
        }
    }
}

/// Something that happened to the connection
#[derive(Debug, Clone, PartialEq)]
pub enum TransportInput {
    /// Handshake completed
    Opened,
    /// A text frame arrived
    Frame(String),
    /// Handshake or read failed
    Error(String),
    /// Peer closed the connection
    Closed,
    /// The backoff delay elapsed
    TimerFired,
    /// The owner is going away
    Shutdown,
}

/// Work the driver must carry out, in order
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEffect {
    /// Open a new connection
    Connect,
    /// Fire `TimerFired` after the delay
    ScheduleReconnect(Duration),
    /// Hand a decoded event to the subscriber
    Deliver(LogEvent),
    /// A frame could not be decoded; the connection stays up
    DecodeFailed(String),
    /// Tell the subscriber the state changed
    StateChanged(ConnectionState),
    /// Close the current connection without reconnecting
    Disconnect,
}

/// Reconnecting stream state machine
#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    reconnect_delay: Duration,
    reconnect_pending: bool,
    stopped: bool,
    attempts: u64,
}

impl ConnectionMachine {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Closed,
            reconnect_delay,
            reconnect_pending: false,
            stopped: false,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Connection attempts made so far, including the first
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Begin the first connection attempt.
    ///
    /// Does nothing while an attempt is outstanding, a connection is open,
    /// a reconnect is already scheduled, or the machine has been shut down.
    pub fn start(&mut self) -> Vec<TransportEffect> {
        if self.stopped || self.reconnect_pending || self.state != ConnectionState::Closed {
            return Vec::new();
        }
        self.begin_attempt()
    }

    fn begin_attempt(&mut self) -> Vec<TransportEffect> {
        self.attempts += 1;
        self.state = ConnectionState::Connecting;
        vec![
            TransportEffect::StateChanged(ConnectionState::Connecting),
            TransportEffect::Connect,
        ]
    }

    /// Feed one input and collect the resulting effects
    pub fn handle(&mut self, input: TransportInput) -> Vec<TransportEffect> {
        if self.stopped {
            return Vec::new();
        }

        match input {
            TransportInput::Opened => {
                if self.state != ConnectionState::Connecting {
                    return Vec::new();
                }
                self.state = ConnectionState::Open;
                vec![TransportEffect::StateChanged(ConnectionState::Open)]
            }
            TransportInput::Frame(text) => {
                if self.state != ConnectionState::Open {
                    return Vec::new();
                }
                match LogEvent::from_frame(&text) {
                    Ok(event) => vec![TransportEffect::Deliver(event)],
                    Err(e) => vec![TransportEffect::DecodeFailed(e.to_string())],
                }
            }
            TransportInput::Error(_) | TransportInput::Closed => {
                if self.state == ConnectionState::Closed {
                    // Error followed by close: one reconnect per lost connection
                    return Vec::new();
                }
                self.state = ConnectionState::Closed;
                self.reconnect_pending = true;
                vec![
                    TransportEffect::StateChanged(ConnectionState::Closed),
                    TransportEffect::ScheduleReconnect(self.reconnect_delay),
                ]
            }
            TransportInput::TimerFired => {
                if self.state != ConnectionState::Closed || !self.reconnect_pending {
                    return Vec::new();
                }
                self.reconnect_pending = false;
                self.begin_attempt()
            }
            TransportInput::Shutdown => {
                self.stopped = true;
                self.reconnect_pending = false;
                let mut effects = Vec::new();
                if self.state != ConnectionState::Closed {
                    effects.push(TransportEffect::Disconnect);
                    self.state = ConnectionState::Closed;
                    effects.push(TransportEffect::StateChanged(ConnectionState::Closed));
                }
                effects
            }
        }
    }
}
