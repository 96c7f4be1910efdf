//! UI modules, organized by tab.

pub mod components;
mod dashboard_tab;
mod inventory_tab;
mod settings_tab;
pub mod theme;

use eframe::egui::{self, RichText};

use crate::app::DashboardApp;
use crate::state::Tab;

pub use components::render_notifications;
pub use dashboard_tab::{render_dashboard_tab, render_update_db_confirm};
pub use inventory_tab::render_inventory_tab;
pub use settings_tab::render_settings_tab;

/// Left navigation panel
pub fn render_sidebar(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();

    ui.add_space(16.0);
    ui.label(
        RichText::new("Renamer Dash")
            .color(theme.accent)
            .size(18.0)
            .strong(),
    );
    ui.label(
        RichText::new(env!("CARGO_PKG_VERSION"))
            .color(theme.text_muted)
            .size(11.0),
    );
    ui.add_space(20.0);

    for tab in [Tab::Dashboard, Tab::Inventory, Tab::Settings] {
        components::render_nav_button(app, ui, tab);
        ui.add_space(4.0);
    }

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
        ui.add_space(12.0);
        match &app.dashboard {
            Some(dashboard) => {
                components::render_connection_indicator(ui, &theme, dashboard.state().connection());
                ui.label(
                    RichText::new(dashboard.client().base_url().as_str())
                        .color(theme.text_muted)
                        .size(11.0),
                );
            }
            None => {
                ui.label(RichText::new("Offline").color(theme.error).size(12.0));
            }
        }
    });
}
