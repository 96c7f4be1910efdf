//! Inventory tab UI rendering

use eframe::egui::{self, RichText};

use crate::app::DashboardApp;
use crate::covers::{Cover, CoverCache};
use crate::dashboard::Dashboard;
use crate::inventory::{self, SortKey};
use crate::model::InventoryItem;
use crate::ui::theme::Theme;

/// Row height for cover thumbnails
const COVER_HEIGHT: f32 = 40.0;

/// Render the inventory tab
pub fn render_inventory_tab(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();

    // Header row: title, search, export
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Inventory")
                .color(theme.text_primary)
                .size(20.0)
                .strong(),
        );
        ui.add_space(16.0);
        ui.add(
            egui::TextEdit::singleline(&mut app.inventory.view.filter)
                .hint_text("Search EAN, title or author")
                .desired_width(260.0),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Export JSON").clicked() {
                export(app);
            }
        });
    });
    ui.add_space(8.0);

    // Field-wise so the cover cache stays mutable while rows borrow the items
    let projection = inventory::project(app.inventory.load.items(), &app.inventory.view);
    if let Some(client) = app.dashboard.as_ref().map(Dashboard::client) {
        for path in projection.rows.iter().filter_map(|item| item.cover()) {
            app.inventory.covers.request(client, path);
        }
    }
    ui.label(
        RichText::new(format!(
            "{} of {} items",
            projection.filtered_count, projection.total_count
        ))
        .color(theme.text_muted)
        .size(12.0),
    );
    ui.add_space(8.0);

    if let Some(message) = app.inventory.load.empty_message(&app.inventory.view) {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            if app.inventory.load.is_loading() {
                ui.spinner();
            }
            ui.label(RichText::new(message).color(theme.text_secondary));
        });
        return;
    }

    let summary = projection.summary();
    let mut clicked = None;

    egui::ScrollArea::vertical()
        .id_salt("inventory_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("inventory_table")
                .num_columns(SortKey::all().len() + 1)
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for key in SortKey::all() {
                        let mut text = key.label().to_string();
                        if app.inventory.view.sort_key == *key {
                            text = format!("{} {}", text, app.inventory.view.direction.arrow());
                        }
                        let header = egui::Button::new(
                            RichText::new(text).color(theme.accent).strong(),
                        )
                        .frame(false);
                        if ui.add(header).clicked() {
                            clicked = Some(*key);
                        }
                    }
                    ui.label(RichText::new("Cover").color(theme.accent).strong());
                    ui.end_row();

                    for item in &projection.rows {
                        render_row(ui, &theme, &app.inventory.covers, item);
                    }
                });

            if let Some(summary) = &summary {
                ui.add_space(8.0);
                ui.label(RichText::new(summary).color(theme.text_muted).italics());
            }
        });

    if let Some(key) = clicked {
        app.inventory.view.toggle_sort(key);
    }
}

fn render_row(ui: &mut egui::Ui, theme: &Theme, covers: &CoverCache, item: &InventoryItem) {
    let text = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();

    ui.label(RichText::new(&item.ean).color(theme.text_secondary).monospace());
    ui.label(RichText::new(text(&item.author)).color(theme.text_primary));
    ui.label(RichText::new(text(&item.title)).color(theme.text_primary));
    ui.label(RichText::new(text(&item.release_date)).color(theme.text_secondary));

    let presence_color = if item.exists { theme.success } else { theme.error };
    ui.label(RichText::new(item.presence()).color(presence_color));

    match item.cover().map(|path| (path, covers.get(path))) {
        Some((path, Cover::Ready(texture))) => {
            let thumbnail = egui::load::SizedTexture::from_handle(texture);
            ui.add(egui::Image::from_texture(thumbnail).max_height(COVER_HEIGHT))
                .on_hover_text(path);
        }
        Some((_, Cover::Loading)) => {
            ui.spinner();
        }
        Some((path, Cover::Unavailable)) => {
            ui.label(RichText::new("?").color(theme.warning))
                .on_hover_text(format!("Could not load {}", path));
        }
        None => {
            ui.label(RichText::new("-").color(theme.text_muted));
        }
    }
    ui.end_row();
}

/// Hand the export download to the browser
fn export(app: &DashboardApp) {
    let Some(dashboard) = &app.dashboard else {
        return;
    };
    match dashboard.client().export_url() {
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::error!("Failed to open export URL: {}", e);
            }
        }
        Err(e) => tracing::error!("Invalid export URL: {}", e),
    }
}
