use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

const APP_NAME: &str = "clock";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockPreferences {
    /// Zone label as shown in settings, e.g. "GMT+2 (Europe/Kyiv)"
    #[serde(default)]
    pub selected_timezone: Option<String>,
}

/// Preferences file, at an explicit path or confy's per-user default.
pub struct PreferenceStore {
    path: Option<PathBuf>,
}

impl PreferenceStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn location(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(path.clone()),
            None => confy::get_configuration_file_path(APP_NAME, None).ok(),
        }
    }

    pub fn load(&self) -> Result<ClockPreferences, StorageError> {
        match &self.path {
            Some(path) => confy::load_path(path),
            None => confy::load(APP_NAME, None),
        }
        .map_err(StorageError::Load)
    }

    pub fn load_or_default(&self) -> ClockPreferences {
        match self.load() {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("{}: {:?}, using defaults", e, self.location());
                ClockPreferences::default()
            }
        }
    }

    pub fn save(&self, prefs: &ClockPreferences) -> Result<(), StorageError> {
        match &self.path {
            Some(path) => confy::store_path(path, prefs),
            None => confy::store(APP_NAME, None, prefs),
        }
        .map_err(StorageError::Save)
    }

    pub fn save_selected_timezone(&self, label: &str) -> Result<ClockPreferences, StorageError> {
        let mut prefs = self.load_or_default();
        prefs.selected_timezone = Some(label.to_string());
        self.save(&prefs)?;
        log::info!("saved timezone {}", label);
        Ok(prefs)
    }
}
