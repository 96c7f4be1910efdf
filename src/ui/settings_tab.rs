//! Settings tab UI rendering

use eframe::egui::{self, RichText};

use crate::app::DashboardApp;
use crate::ui::components::render_section_frame;

/// Render the settings tab
pub fn render_settings_tab(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();

    egui::ScrollArea::vertical()
        .id_salt("settings_scroll")
        .show(ui, |ui| {
            ui.label(
                RichText::new("Settings")
                    .color(theme.text_primary)
                    .size(20.0)
                    .strong(),
            );
            ui.add_space(16.0);

            // Backend configuration, edited as a draft and saved explicitly
            render_section_frame(app, ui, "Library", |app, ui| {
                let Some(dashboard) = app.dashboard.as_mut() else {
                    ui.label(RichText::new("Not connected.").color(theme.text_muted));
                    return;
                };

                if !dashboard.state().config.is_loaded() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Loading configuration...").color(theme.text_muted));
                    });
                    ui.add_space(8.0);
                }

                let mut path = dashboard.state().config.draft().library_path.clone();
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Library path:").color(theme.text_muted));
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut path)
                            .hint_text("/path/to/audiobooks")
                            .desired_width(f32::INFINITY),
                    );
                    if edit.changed() {
                        dashboard.edit_library_path(path);
                    }
                });
                ui.add_space(12.0);

                let config = &dashboard.state().config;
                let can_save = config.is_dirty() && !config.is_saving();
                let saving = config.is_saving();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(can_save, egui::Button::new("Save"))
                        .clicked()
                    {
                        dashboard.save_config();
                    }
                    if ui
                        .add_enabled(!saving, egui::Button::new("Reload"))
                        .clicked()
                    {
                        dashboard.reload_config();
                    }
                    if saving {
                        ui.spinner();
                    }
                });
            });

            ui.add_space(12.0);

            // Local client settings
            render_section_frame(app, ui, "Connection", |app, ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Server URL:").color(theme.text_muted));
                    ui.add(
                        egui::TextEdit::singleline(&mut app.ui.server_url_draft)
                            .desired_width(320.0),
                    );
                    if ui.button("Apply").clicked() {
                        app.apply_server_url();
                    }
                });
                ui.add_space(8.0);

                if let Some(err) = &app.connect_error {
                    ui.label(RichText::new(err).color(theme.error));
                }
                ui.label(
                    RichText::new(format!(
                        "Log stream: {} (retry every {} ms)",
                        app.settings.server.log_stream_path, app.settings.sync.reconnect_delay_ms
                    ))
                    .color(theme.text_muted)
                    .size(11.0),
                );
                ui.label(
                    RichText::new(format!(
                        "Status poll: every {} ms",
                        app.settings.sync.poll_interval_ms
                    ))
                    .color(theme.text_muted)
                    .size(11.0),
                );
            });
        });
}
