use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{NarratorError, NarratorResult};
use crate::models::Preferences;

/// JSON document holding the last used voice, style, tone and output settings.
///
/// Persistence is best-effort: `load` never fails and `save` only logs.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults when the file is absent or malformed.
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                debug!("No preferences at {}, using defaults", self.path.display());
                Preferences::default()
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Preferences::default()
            }
        }
    }

    fn try_load(&self) -> NarratorResult<Option<Preferences>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            NarratorError::PreferenceLoad(format!("{}: {}", self.path.display(), e))
        })?;
        let prefs = serde_json::from_str::<Preferences>(&content).map_err(|e| {
            NarratorError::PreferenceLoad(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(prefs))
    }

    /// Overwrite the persisted document. Failures are logged and swallowed.
    pub fn save(&self, prefs: &Preferences) {
        if let Err(e) = self.try_save(prefs) {
            warn!("Failed to save preferences to {}: {}", self.path.display(), e);
        }
    }

    fn try_save(&self, prefs: &Preferences) -> NarratorResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(prefs)
            .map_err(|e| NarratorError::Filesystem(format!("Failed to serialize preferences: {}", e)))?;
        fs::write(&self.path, json)?;
        debug!("Preferences saved to {}", self.path.display());
        Ok(())
    }
}
