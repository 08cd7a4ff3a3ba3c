// Tauri commands, grouped by concern
pub mod narration_commands;
pub mod playback_commands;
pub mod preference_commands;
pub mod utility_commands;

pub use narration_commands::*;
pub use playback_commands::*;
pub use preference_commands::*;
pub use utility_commands::*;

use log::warn;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::preferences::PreferenceStore;
use crate::config::AppConfig;
use crate::errors::NarratorResult;
use crate::models::Preferences;
use crate::services::{NarrationPipeline, OutputManager, PlaybackController, RunSlot};
use crate::utils::error_log::ErrorLog;

/// Everything the commands share, loaded once at startup and managed by Tauri.
pub struct AppState {
    pub config: AppConfig,
    pub store: PreferenceStore,
    prefs: Mutex<Preferences>,
    pub error_log: ErrorLog,
    pub pipeline: NarrationPipeline,
    pub slot: RunSlot,
    pub player: PlaybackController,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: PreferenceStore,
        error_log: ErrorLog,
        pipeline: NarrationPipeline,
        player: PlaybackController,
    ) -> Self {
        let prefs = store.load();
        Self {
            config,
            store,
            prefs: Mutex::new(prefs),
            error_log,
            pipeline,
            slot: RunSlot::new(),
            player,
        }
    }

    /// Preferences are plain data, so a poisoned lock is still usable.
    pub fn prefs(&self) -> MutexGuard<'_, Preferences> {
        self.prefs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn save_prefs(&self) {
        let prefs = self.prefs().clone();
        self.store.save(&prefs);
    }

    /// Output directory chosen by the user, or the configured one.
    pub fn output_manager(&self, prefs: &Preferences) -> OutputManager {
        let dir = prefs
            .last_output_dir
            .clone()
            .unwrap_or_else(|| self.config.output_dir.clone());
        OutputManager::new(dir)
    }

    pub fn current_output(&self) -> OutputManager {
        let prefs = self.prefs();
        self.output_manager(&prefs)
    }

    /// Append failures to the error log on their way back to the window.
    pub fn logged<T>(&self, context: &str, result: NarratorResult<T>) -> NarratorResult<T> {
        if let Err(e) = &result {
            warn!("{} failed: {}", context, e);
            self.error_log.record(context, e);
        }
        result
    }
}
