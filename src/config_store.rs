//! Server configuration draft.
//!
//! The remote configuration is fetched once; edits go into a local draft
//! that is only sent when the operator saves. There is no partial update:
//! a save always carries the whole draft.

use crate::model::ServerConfig;

/// Reasons a draft is refused before any request is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Library path must not be empty")]
    EmptyLibraryPath,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    /// Last configuration confirmed by the backend
    loaded: Option<ServerConfig>,
    /// Local, unsaved edits
    draft: ServerConfig,
    /// A save is in flight
    saving: bool,
}

impl ConfigStore {
    /// Replace both the confirmed copy and the draft with `config`
    pub fn load(&mut self, config: ServerConfig) {
        self.draft = config.clone();
        self.loaded = Some(config);
    }

    pub fn loaded(&self) -> Option<&ServerConfig> {
        self.loaded.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn draft(&self) -> &ServerConfig {
        &self.draft
    }

    pub fn set_library_path(&mut self, path: impl Into<String>) {
        self.draft.library_path = path.into();
    }

    /// Draft differs from what the backend last confirmed
    pub fn is_dirty(&self) -> bool {
        match &self.loaded {
            Some(loaded) => *loaded != self.draft,
            None => !self.draft.library_path.is_empty(),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Validate the draft and mark a save as started
    pub fn begin_save(&mut self) -> Result<ServerConfig, DraftError> {
        validate(&self.draft)?;
        self.saving = true;
        Ok(self.draft.clone())
    }

    /// Record the outcome of a save of `sent`
    pub fn finish_save(&mut self, sent: &ServerConfig, ok: bool) {
        self.saving = false;
        if ok {
            self.loaded = Some(sent.clone());
        }
    }
}

/// The only check performed on a draft
pub fn validate(config: &ServerConfig) -> Result<(), DraftError> {
    if config.library_path.trim().is_empty() {
        return Err(DraftError::EmptyLibraryPath);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(path: &str) -> ServerConfig {
        ServerConfig {
            library_path: path.to_string(),
        }
    }

    #[test]
    fn test_load_replaces_draft() {
        let mut store = ConfigStore::default();
        store.set_library_path("/tmp/edit");
        store.load(config("/app/library"));
        assert_eq!(store.draft().library_path, "/app/library");
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_edit_marks_dirty_until_saved() {
        let mut store = ConfigStore::default();
        store.load(config("/app/library"));
        store.set_library_path("/mnt/audiobooks");
        assert!(store.is_dirty());

        let sent = store.begin_save().unwrap();
        assert!(store.is_saving());
        store.finish_save(&sent, true);
        assert!(!store.is_saving());
        assert!(!store.is_dirty());
        assert_eq!(store.loaded().unwrap().library_path, "/mnt/audiobooks");
    }

    #[test]
    fn test_failed_save_keeps_draft() {
        let mut store = ConfigStore::default();
        store.load(config("/app/library"));
        store.set_library_path("/mnt/new");
        let sent = store.begin_save().unwrap();
        store.finish_save(&sent, false);
        assert!(store.is_dirty());
        assert_eq!(store.draft().library_path, "/mnt/new");
        assert_eq!(store.loaded().unwrap().library_path, "/app/library");
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut store = ConfigStore::default();
        store.set_library_path("   ");
        assert_eq!(store.begin_save(), Err(DraftError::EmptyLibraryPath));
        assert!(!store.is_saving());
    }
}
