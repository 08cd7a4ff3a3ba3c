use std::path::PathBuf;
use tauri::State;

use super::AppState;
use crate::errors::{NarratorError, NarratorResult};
use crate::services::PlaybackStatus;
use crate::utils::common::check_file_exists_and_valid;

/// Play a narration from the start, replacing whatever is playing.
#[tauri::command]
pub async fn play_audio(state: State<'_, AppState>, path: String) -> NarratorResult<()> {
    let path = PathBuf::from(path);
    let result = if check_file_exists_and_valid(&path).await {
        state.player.play(&path).await
    } else {
        Err(NarratorError::Playback(format!(
            "no playable audio at {}",
            path.display()
        )))
    };
    state.logged("playback", result)
}

#[tauri::command]
pub async fn pause_audio(state: State<'_, AppState>) -> NarratorResult<()> {
    state.player.pause()
}

#[tauri::command]
pub async fn resume_audio(state: State<'_, AppState>) -> NarratorResult<()> {
    state.player.resume()
}

#[tauri::command]
pub async fn stop_audio(state: State<'_, AppState>) -> NarratorResult<()> {
    state.player.stop()
}

#[tauri::command]
pub async fn playback_status(state: State<'_, AppState>) -> NarratorResult<PlaybackStatus> {
    state.player.status().await
}
