//! Shared UI components

use eframe::egui::{self, Color32, CornerRadius, RichText, Vec2};

use crate::app::DashboardApp;
use crate::state::Tab;
use crate::stream::ConnectionState;
use crate::ui::theme::Theme;

/// Render a navigation button in the sidebar
pub fn render_nav_button(app: &mut DashboardApp, ui: &mut egui::Ui, tab: Tab) {
    let theme = &app.ui.theme;
    let is_active = app.ui.active_tab == tab;

    let (bg, text_color) = if is_active {
        (theme.bg_medium, theme.accent)
    } else {
        (Color32::TRANSPARENT, theme.text_secondary)
    };

    let button = egui::Button::new(RichText::new(tab.label()).color(text_color).size(14.0))
        .fill(bg)
        .corner_radius(CornerRadius::same(6))
        .min_size(Vec2::new(ui.available_width(), 34.0));

    if ui.add(button).clicked() {
        app.switch_tab(tab);
    }
}

/// Colored dot plus label for the log stream connection
pub fn render_connection_indicator(ui: &mut egui::Ui, theme: &Theme, state: ConnectionState) {
    let color = match state {
        ConnectionState::Open => theme.success,
        ConnectionState::Connecting => theme.warning,
        ConnectionState::Closed => theme.error,
    };
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 4.0, color);
        ui.label(RichText::new(state.label()).color(theme.text_muted).size(12.0));
    });
}

/// Pill showing whether a scan is running
pub fn render_status_badge(ui: &mut egui::Ui, theme: &Theme, running: bool, text: &str) {
    let (fill, color) = if running {
        (theme.success.gamma_multiply(0.2), theme.success)
    } else {
        (theme.bg_light, theme.text_secondary)
    };
    egui::Frame::new()
        .fill(fill)
        .corner_radius(CornerRadius::same(12))
        .inner_margin(egui::Margin::symmetric(12, 4))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).strong().size(12.0));
        });
}

/// Render a titled card
pub fn render_section_frame<F>(app: &mut DashboardApp, ui: &mut egui::Ui, title: &str, content: F)
where
    F: FnOnce(&mut DashboardApp, &mut egui::Ui),
{
    let theme = app.ui.theme.clone();

    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(egui::Margin::same(16))
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(app, ui);
        });
}

/// Toast stack in the bottom-right corner
pub fn render_notifications(app: &mut DashboardApp, ctx: &egui::Context) {
    let Some(dashboard) = app.dashboard.as_mut() else {
        return;
    };
    let theme = app.ui.theme.clone();

    // Newest last, at most a handful on screen
    let notifications = &dashboard.state().notifications;
    let skip = notifications.len().saturating_sub(4);
    let mut dismissed = None;

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (index, notification) in notifications.iter().enumerate().skip(skip) {
                let color = theme.severity_color(notification.severity);
                egui::Frame::new()
                    .fill(theme.bg_medium)
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(egui::Margin::same(10))
                    .stroke(egui::Stroke::new(1.0, color))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(notification.severity.label())
                                    .color(color)
                                    .strong()
                                    .size(11.0),
                            );
                            ui.label(
                                RichText::new(notification.raised_at.format("%H:%M:%S").to_string())
                                    .color(theme.text_muted)
                                    .size(11.0),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("x").clicked() {
                                    dismissed = Some(index);
                                }
                            });
                        });
                        ui.label(RichText::new(&notification.message).color(theme.text_primary));
                    });
                ui.add_space(6.0);
            }
        });

    if let Some(index) = dismissed {
        dashboard.dismiss_notification(index);
    }
}
