//! The egui application shell.

use std::time::Duration;

use eframe::egui;

use crate::config::Settings;
use crate::dashboard::Dashboard;
use crate::state::{InventoryState, Tab, UiState};
use crate::ui::{self, theme::Theme};

/// Repaint cadence while live data may arrive
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct DashboardApp {
    /// Local client settings
    pub settings: Settings,
    /// Live backend connection; `None` when the server URL is unusable
    pub dashboard: Option<Dashboard>,
    /// Why the last connect attempt could not start
    pub connect_error: Option<String>,
    /// Inventory tab state
    pub inventory: InventoryState,
    /// UI-related state
    pub ui: UiState,
}

impl DashboardApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let ui = UiState::new(Theme::default(), &settings.server.base_url);
        let mut app = Self {
            settings,
            dashboard: None,
            connect_error: None,
            inventory: InventoryState::default(),
            ui,
        };
        app.connect();
        app
    }

    /// (Re)start the live connection from the current settings
    pub fn connect(&mut self) {
        if let Some(mut old) = self.dashboard.take() {
            old.shutdown();
        }
        match Dashboard::start(&self.settings) {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.connect_error = None;
            }
            Err(e) => {
                tracing::error!("Cannot start dashboard: {}", e);
                self.connect_error = Some(e.to_string());
            }
        }
        self.inventory.reconnect(self.dashboard.as_ref().map(Dashboard::client));
    }

    /// Switch the active tab, fetching or dropping the inventory as needed
    pub fn switch_tab(&mut self, tab: Tab) {
        let previous = self.ui.active_tab;
        if previous == tab {
            return;
        }
        self.ui.active_tab = tab;

        if previous == Tab::Inventory {
            self.inventory.deactivate();
        }
        if tab == Tab::Inventory {
            self.inventory.activate(self.dashboard.as_ref().map(Dashboard::client));
        }
    }

    /// Save the edited server URL and reconnect
    pub fn apply_server_url(&mut self) {
        let url = self.ui.server_url_draft.trim().to_string();
        if url == self.settings.server.base_url && self.dashboard.is_some() {
            return;
        }
        self.settings.server.base_url = url;
        if let Err(e) = self.settings.save() {
            tracing::error!("Failed to save settings: {}", e);
        }
        self.connect();
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        if let Some(dashboard) = &mut self.dashboard {
            dashboard.drain();
        }
        self.inventory.poll(ctx);

        egui::SidePanel::left("nav")
            .resizable(false)
            .exact_width(200.0)
            .show(ctx, |ui| ui::render_sidebar(self, ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.ui.active_tab {
            Tab::Dashboard => ui::render_dashboard_tab(self, ui),
            Tab::Inventory => ui::render_inventory_tab(self, ui),
            Tab::Settings => ui::render_settings_tab(self, ui),
        });

        ui::render_update_db_confirm(self, ctx);
        ui::render_notifications(self, ctx);

        ctx.request_repaint_after(REFRESH_INTERVAL);
    }
}
