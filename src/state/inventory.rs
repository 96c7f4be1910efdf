//! Inventory tab state

use eframe::egui;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, ApiError};
use crate::covers::CoverCache;
use crate::inventory::{self, InventoryLoad, Projection, ViewState};
use crate::model::InventoryItem;
use crate::task::{PollResult, poll_task};

const NOT_CONNECTED: &str = "not connected to a backend";

/// Inventory fetched for the current visit to the tab.
///
/// The collection lives only while the tab is shown: leaving the tab drops
/// it, coming back fetches it again.
#[derive(Default)]
pub struct InventoryState {
    /// Fetch progress and result
    pub load: InventoryLoad,
    /// Sort and filter choice
    pub view: ViewState,
    /// Thumbnails requested during this visit
    pub covers: CoverCache,
    /// Async task for the fetch
    task: Option<JoinHandle<Result<Vec<InventoryItem>, ApiError>>>,
    /// Whether the tab is currently shown
    active: bool,
}

impl InventoryState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a fetch when the tab is shown; `None` means there is no backend to ask
    pub fn activate(&mut self, client: Option<&ApiClient>) {
        if self.active {
            return;
        }
        self.active = true;
        self.fetch(client);
    }

    /// Fetch again from a new backend while the tab is shown, keeping sort and filter
    pub fn reconnect(&mut self, client: Option<&ApiClient>) {
        if self.active {
            self.fetch(client);
        }
    }

    fn fetch(&mut self, client: Option<&ApiClient>) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.covers.clear();
        let Some(client) = client else {
            self.load = InventoryLoad::Failed(NOT_CONNECTED.to_string());
            return;
        };
        self.load = InventoryLoad::Loading;
        let client = client.clone();
        self.task = Some(tokio::spawn(async move { client.inventory().await }));
    }

    /// Drop the collection and any fetch in flight when the tab is left
    pub fn deactivate(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.active = false;
        self.load = InventoryLoad::Loading;
        self.view = ViewState::default();
        self.covers.clear();
    }

    /// Poll the fetch task for completion
    pub fn poll(&mut self, ctx: &egui::Context) {
        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(items))) => {
                self.load = InventoryLoad::Loaded(items);
            }
            PollResult::Complete(Ok(Err(e))) => {
                tracing::error!("Inventory fetch failed: {}", e);
                self.load = InventoryLoad::Failed(e.to_string());
            }
            PollResult::Complete(Err(e)) => {
                tracing::error!("Inventory task panicked: {}", e);
                self.load = InventoryLoad::Failed(e.to_string());
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }
        if self.covers.poll(ctx) > 0 {
            ctx.request_repaint();
        }
    }

    /// Rows for the current render
    pub fn projection(&self) -> Projection<'_> {
        inventory::project(self.load.items(), &self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_client() -> ApiClient {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        ApiClient::new(&format!("http://{}", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_leaving_tab_discards_collection() {
        let mut state = InventoryState::default();
        state.activate(Some(&unreachable_client()));
        assert!(state.is_active());
        assert!(state.load.is_loading());

        state.load = InventoryLoad::Loaded(vec![InventoryItem {
            ean: "1".into(),
            title: Some("Dune".into()),
            author: None,
            release_date: None,
            exists: true,
            has_cover: false,
            cover_path: None,
        }]);
        state.view.filter = "dune".into();
        state.view.toggle_sort(inventory::SortKey::Title);

        state.deactivate();
        assert!(!state.is_active());
        assert_eq!(state.load, InventoryLoad::Loading);
        assert_eq!(state.view, ViewState::default());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_reported() {
        let ctx = egui::Context::default();
        let mut state = InventoryState::default();
        state.activate(Some(&unreachable_client()));

        tokio::time::timeout(Duration::from_secs(5), async {
            while state.load.is_loading() {
                state.poll(&ctx);
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert!(matches!(state.load, InventoryLoad::Failed(_)));
        assert!(state.projection().rows.is_empty());
    }

    #[test]
    fn test_showing_tab_without_backend_fails_at_once() {
        let mut state = InventoryState::default();
        state.activate(None);

        assert!(state.is_active());
        assert!(!state.load.is_loading());
        let message = state.load.empty_message(&state.view).unwrap();
        assert!(message.contains("not connected"), "{}", message);
    }

    #[tokio::test]
    async fn test_reconnect_refetches_only_while_shown() {
        let mut state = InventoryState::default();
        state.reconnect(Some(&unreachable_client()));
        assert!(!state.is_active());
        assert!(state.task.is_none());

        state.activate(None);
        state.view.filter = "herbert".into();

        state.reconnect(Some(&unreachable_client()));
        assert!(state.load.is_loading());
        assert!(state.task.is_some());
        assert_eq!(state.view.filter, "herbert");

        // Losing the backend again replaces the pending fetch
        state.reconnect(None);
        assert!(state.task.is_none());
        assert!(matches!(state.load, InventoryLoad::Failed(_)));
    }
}
