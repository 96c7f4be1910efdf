//! Status polling.
//!
//! A fixed-cadence loop asks the backend whether a scan is running. Each
//! request carries a sequence number so a slow response can never overwrite
//! a newer one. Failures are logged and otherwise ignored: the cached status
//! goes stale rather than wrong.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;

/// Result of one status request
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    pub seq: u64,
    /// `Ok(running)` or the error text
    pub result: Result<bool, String>,
}

/// Orders poll responses.
///
/// Requests are numbered by the poller in issue order; `apply` accepts a
/// response only if it belongs to a newer request than the last one applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTracker {
    last_applied: Option<u64>,
    running: bool,
}

impl StatusTracker {
    /// Record a successful response; returns whether it was applied
    pub fn apply(&mut self, seq: u64, running: bool) -> bool {
        if self.last_applied.is_some_and(|last| seq <= last) {
            tracing::debug!(
                "Discarding stale status response #{} (last applied #{:?})",
                seq,
                self.last_applied
            );
            return false;
        }
        self.last_applied = Some(seq);
        self.running = running;
        true
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }
}

/// Handle to the polling loop; dropping it stops the loop
#[derive(Debug)]
pub struct StatusPoller {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Spawn the loop, sending every response to `tx`.
    ///
    /// Each tick spawns its own request so a hung call never delays the next
    /// tick; the sequence numbers sort out the arrivals.
    pub fn spawn<E>(client: ApiClient, interval: Duration, tx: mpsc::UnboundedSender<E>) -> Self
    where
        E: From<PollUpdate> + Send + 'static,
    {
        let token = CancellationToken::new();
        let loop_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut next_seq: u64 = 0;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!("Polling status every {:?}", interval);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if tx.is_closed() {
                    break;
                }

                let seq = next_seq;
                next_seq += 1;
                let client = client.clone();
                let tx = tx.clone();
                let request_token = loop_token.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        _ = request_token.cancelled() => return,
                        result = client.status() => result,
                    };
                    let result = match result {
                        Ok(status) => Ok(status.running),
                        Err(e) => {
                            tracing::debug!("Status check #{} failed: {}", seq, e);
                            Err(e.to_string())
                        }
                    };
                    let _ = tx.send(PollUpdate { seq, result }.into());
                });
            }

            tracing::info!("Status polling stopped");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Stop polling and wait for the loop to exit
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Status poller ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
