use log::info;
use serde::Serialize;
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use super::AppState;
use crate::errors::{NarratorError, NarratorResult};
use crate::models::Preferences;

#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyStatus {
    pub xai: bool,
    pub elevenlabs: bool,
}

#[tauri::command]
pub fn get_preferences(state: State<'_, AppState>) -> Preferences {
    state.prefs().clone()
}

/// Replace the in-memory preferences and write them through.
#[tauri::command]
pub fn save_preferences(state: State<'_, AppState>, preferences: Preferences) -> Preferences {
    let mut prefs = state.prefs();
    *prefs = Preferences {
        tone_defaults: preferences.tone_defaults.clamped(),
        ..preferences
    };
    state.store.save(&prefs);
    prefs.clone()
}

/// Which API keys were found in the environment. Keys themselves never leave the backend.
#[tauri::command]
pub fn api_key_status(state: State<'_, AppState>) -> ApiKeyStatus {
    ApiKeyStatus {
        xai: state.config.xai_api_key.is_some(),
        elevenlabs: state.config.elevenlabs_api_key.is_some(),
    }
}

/// Let the user pick where narrations are written. `None` when cancelled.
#[tauri::command]
pub async fn choose_output_dir(
    app: AppHandle,
    state: State<'_, AppState>,
) -> NarratorResult<Option<String>> {
    let start = state.current_output().dir().to_path_buf();
    let Some(picked) = app.dialog().file().set_directory(&start).blocking_pick_folder() else {
        return Ok(None);
    };
    let dir = picked
        .into_path()
        .map_err(|e| NarratorError::Filesystem(format!("Unusable folder: {}", e)))?;

    info!("Output directory set to {}", dir.display());
    let mut prefs = state.prefs();
    prefs.last_output_dir = Some(dir.clone());
    state.store.save(&prefs);
    Ok(Some(dir.to_string_lossy().into_owned()))
}
