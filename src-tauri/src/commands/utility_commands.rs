use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

use super::AppState;
use crate::errors::{NarratorError, NarratorResult};

/// Open the narrations directory in the system file manager, creating it first.
#[tauri::command]
pub async fn open_output_dir(app: AppHandle, state: State<'_, AppState>) -> NarratorResult<()> {
    let output = state.current_output();
    let result = match output.ensure_dir().await {
        Ok(()) => app
            .opener()
            .open_path(output.dir().to_string_lossy(), None::<&str>)
            .map_err(|e| NarratorError::Filesystem(format!("Could not open {}: {}", output.dir().display(), e))),
        Err(e) => Err(e),
    };
    state.logged("open output", result)
}

/// Open a single narration file with the system default program.
#[tauri::command]
pub async fn open_file(app: AppHandle, path: String) -> NarratorResult<()> {
    app.opener()
        .open_path(&path, None::<&str>)
        .map_err(|e| NarratorError::Filesystem(format!("Could not open {}: {}", path, e)))
}
