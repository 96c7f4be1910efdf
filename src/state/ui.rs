//! UI-related application state

use crate::ui::theme::Theme;

/// Navigation sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Status card, scheduler, live logs
    #[default]
    Dashboard,
    /// Catalog table with sort, filter and export
    Inventory,
    /// Library path and connection settings
    Settings,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Inventory => "Inventory",
            Tab::Settings => "Settings",
        }
    }
}

/// UI-related state
pub struct UiState {
    /// Current theme
    pub theme: Theme,
    /// Currently selected tab
    pub active_tab: Tab,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Whether the database update confirmation is open
    pub confirm_update_db: bool,
    /// Server URL being edited on the settings tab
    pub server_url_draft: String,
}

impl UiState {
    pub fn new(theme: Theme, server_url: &str) -> Self {
        Self {
            theme,
            active_tab: Tab::default(),
            theme_dirty: true, // Apply theme on first frame
            confirm_update_db: false,
            server_url_draft: server_url.to_string(),
        }
    }
}
