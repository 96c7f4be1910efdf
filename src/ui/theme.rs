//! Dashboard palette and its mapping onto egui visuals.

use eframe::egui::{self, Color32, Stroke, Visuals, style::WidgetVisuals};

use crate::model::LogLevel;
use crate::notify::Severity;

/// Colors the widgets and tabs draw with
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub accent: Color32,
    /// Pressed buttons and the active nav entry
    pub accent_muted: Color32,

    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub border: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    /// Slate and indigo, the dashboard's house colors
    pub fn slate() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(2, 6, 23),
            bg_dark: Color32::from_rgb(15, 23, 42),
            bg_medium: Color32::from_rgb(30, 41, 59),
            bg_light: Color32::from_rgb(51, 65, 85),

            text_primary: Color32::from_rgb(241, 245, 249),
            text_secondary: Color32::from_rgb(203, 213, 225),
            text_muted: Color32::from_rgb(148, 163, 184),

            accent: Color32::from_rgb(129, 140, 248),
            accent_muted: Color32::from_rgb(79, 70, 229),

            success: Color32::from_rgb(52, 211, 153),
            warning: Color32::from_rgb(251, 191, 36),
            error: Color32::from_rgb(251, 113, 133),

            border: Color32::from_rgb(51, 65, 85),
        }
    }

    /// Text color for a log line
    pub fn log_color(&self, level: LogLevel) -> Color32 {
        match level {
            LogLevel::Info => self.text_secondary,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
        }
    }

    /// Accent color for a notification
    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::Info => self.accent,
            Severity::Success => self.success,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    /// Install the palette as egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_dark;
        visuals.window_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;
        visuals.hyperlink_color = self.accent;

        let widgets = &mut visuals.widgets;
        paint(&mut widgets.noninteractive, self.bg_medium, self.border, self.text_secondary);
        paint(&mut widgets.inactive, self.bg_medium, self.border, self.text_primary);
        paint(&mut widgets.hovered, self.bg_light, self.accent, self.text_primary);
        paint(&mut widgets.active, self.accent_muted, self.accent, self.text_primary);
        // Buttons draw with the weak fill
        widgets.inactive.weak_bg_fill = self.bg_light;

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        ctx.set_visuals(visuals);
    }
}

fn paint(widget: &mut WidgetVisuals, fill: Color32, outline: Color32, text: Color32) {
    widget.bg_fill = fill;
    widget.weak_bg_fill = fill;
    widget.bg_stroke = Stroke::new(1.0, outline);
    widget.fg_stroke = Stroke::new(1.0, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_installs_palette() {
        let ctx = egui::Context::default();
        let theme = Theme::slate();
        theme.apply(&ctx);

        let visuals = ctx.style().visuals.clone();
        assert_eq!(visuals.panel_fill, theme.bg_dark);
        assert_eq!(visuals.widgets.hovered.bg_stroke.color, theme.accent);
        assert_eq!(visuals.widgets.active.bg_fill, theme.accent_muted);
        assert_eq!(visuals.widgets.inactive.weak_bg_fill, theme.bg_light);
    }

    #[test]
    fn test_log_levels_are_distinct() {
        let theme = Theme::slate();
        let colors = [LogLevel::Info, LogLevel::Warning, LogLevel::Error].map(|l| theme.log_color(l));
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}
