//! Dashboard tab UI rendering

use eframe::egui::{self, RichText, Vec2};

use crate::app::DashboardApp;
use crate::ui::components::{render_section_frame, render_status_badge};

/// Render the dashboard tab content
pub fn render_dashboard_tab(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();

    if app.dashboard.is_none() {
        render_section_frame(app, ui, "Backend", |app, ui| {
            ui.label(RichText::new("Not connected.").color(theme.error));
            if let Some(err) = &app.connect_error {
                ui.label(RichText::new(err).color(theme.text_muted));
            }
            ui.add_space(8.0);
            ui.label(
                RichText::new("Check the server URL on the Settings tab.")
                    .color(theme.text_secondary),
            );
        });
        return;
    }

    ui.columns(2, |columns| {
        render_status_card(app, &mut columns[0]);
        render_scheduler_card(app, &mut columns[1]);
    });

    ui.add_space(12.0);

    render_section_frame(app, ui, "Live Logs", |app, ui| {
        let Some(dashboard) = &app.dashboard else {
            return;
        };
        let state = dashboard.state();

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("{} lines", state.logs().len()))
                    .color(theme.text_muted)
                    .size(11.0),
            );
            if state.decode_failures() > 0 {
                ui.label(
                    RichText::new(format!("{} unreadable", state.decode_failures()))
                        .color(theme.warning)
                        .size(11.0),
                );
            }
        });
        ui.add_space(6.0);

        egui::Frame::new()
            .fill(theme.bg_darkest)
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                egui::ScrollArea::vertical()
                    .id_salt("log_terminal")
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if state.logs().is_empty() {
                            ui.label(
                                RichText::new("Waiting for log output...")
                                    .color(theme.text_muted)
                                    .monospace(),
                            );
                        }
                        for event in state.logs() {
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(event.local_time())
                                        .color(theme.text_muted)
                                        .monospace(),
                                );
                                ui.label(
                                    RichText::new(format!("[{}]", event.level))
                                        .color(theme.log_color(event.level))
                                        .monospace(),
                                );
                                ui.label(
                                    RichText::new(&event.message)
                                        .color(theme.log_color(event.level))
                                        .monospace(),
                                );
                            });
                        }
                    });
            });
    });
}

fn render_status_card(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();

    render_section_frame(app, ui, "Status", |app, ui| {
        let Some(dashboard) = app.dashboard.as_mut() else {
            return;
        };
        let running = dashboard.state().running();

        render_status_badge(ui, &theme, running, dashboard.state().badge());
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            let size = Vec2::new(110.0, 30.0);
            if running {
                let stop = egui::Button::new(RichText::new("Stop").color(theme.text_primary))
                    .fill(theme.error.gamma_multiply(0.6))
                    .min_size(size);
                if ui.add(stop).clicked() {
                    dashboard.stop_scan();
                }
            } else {
                if ui.add(egui::Button::new("Update DB").min_size(size)).clicked() {
                    app.ui.confirm_update_db = true;
                }
                let scan = egui::Button::new(RichText::new("Run Scan").color(theme.text_primary))
                    .fill(theme.accent_muted)
                    .min_size(size);
                if ui.add(scan).clicked() {
                    dashboard.start_scan();
                }
            }
        });
    });
}

fn render_scheduler_card(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();

    render_section_frame(app, ui, "Scheduler", |app, ui| {
        let Some(dashboard) = app.dashboard.as_mut() else {
            return;
        };

        let (text, color) = match dashboard.state().scheduler() {
            Some(true) => ("Active", theme.success),
            Some(false) => ("Inactive", theme.text_muted),
            None => ("Unknown", theme.text_muted),
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new("Automatic scans:").color(theme.text_muted));
            ui.label(RichText::new(text).color(color).strong());
        });
        ui.add_space(12.0);

        let label = if dashboard.state().scheduler() == Some(true) {
            "Disable"
        } else {
            "Enable"
        };
        if ui
            .add(egui::Button::new(label).min_size(Vec2::new(110.0, 30.0)))
            .clicked()
        {
            dashboard.toggle_scheduler();
        }
    });
}

/// Confirmation dialog for the database update
pub fn render_update_db_confirm(app: &mut DashboardApp, ctx: &egui::Context) {
    if !app.ui.confirm_update_db {
        return;
    }
    let theme = app.ui.theme.clone();
    let mut confirmed = false;
    let mut cancelled = false;

    egui::Window::new("Update database")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Refresh the catalog from the upstream source?")
                    .color(theme.text_primary),
            );
            ui.label(
                RichText::new("This can take several minutes.").color(theme.text_muted),
            );
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Update").clicked() {
                    confirmed = true;
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

    if confirmed {
        if let Some(dashboard) = app.dashboard.as_mut() {
            dashboard.update_db();
        }
    }
    if confirmed || cancelled {
        app.ui.confirm_update_db = false;
    }
}
