use log::info;
use tauri::{AppHandle, Manager, State};
use uuid::Uuid;

use super::AppState;
use crate::errors::NarratorResult;
use crate::events::{emit_run_state, show_error_dialog};
use crate::models::{GenerationRequest, GothicStyle, NarrationEntry, RunState, StyleInfo, Voice};
use crate::services::NarrationPipeline;

/// Styles in selector order
#[tauri::command]
pub fn list_styles() -> Vec<StyleInfo> {
    GothicStyle::ALL.into_iter().map(StyleInfo::from).collect()
}

#[tauri::command]
pub async fn list_voices(state: State<'_, AppState>) -> NarratorResult<Vec<Voice>> {
    let voices = state.pipeline.synthesizer().list_voices().await;
    state.logged("voices", voices)
}

/// Start a run in the background and return its id.
///
/// Progress arrives as `run-state` events tagged with the returned id. The
/// window may pick the id itself so that events racing this reply still match.
/// A failed run shows its error in a dialog and then settles back to `idle`.
#[tauri::command]
pub async fn generate_narration(
    app: AppHandle,
    state: State<'_, AppState>,
    request: GenerationRequest,
    run_id: Option<String>,
) -> NarratorResult<String> {
    state.logged("generation", NarrationPipeline::validate(&request))?;
    let guard = state.slot.try_acquire()?;

    let (output, output_format) = {
        let mut prefs = state.prefs();
        prefs.last_voice_id = request.voice_id.clone();
        prefs.last_style = request.style;
        prefs.tone_preset = request.tone_preset;
        prefs.tone_defaults = request.tone_settings.clamped();
        state.store.save(&prefs);
        (
            state.output_manager(&prefs),
            prefs.effective_output_format().to_string(),
        )
    };

    let run_id = resolve_run_id(run_id);
    info!(
        "Starting run {} (style {:?}, voice {})",
        run_id, request.style, request.voice_id
    );

    let task_run_id = run_id.clone();
    tauri::async_runtime::spawn(async move {
        // released when the run ends, however it ends
        let _guard = guard;
        let state = app.state::<AppState>();

        let outcome = state
            .pipeline
            .run(&request, &output, &output_format, |s| {
                emit_run_state(&app, &task_run_id, s)
            })
            .await;

        if let Err(failed) = outcome {
            state.error_log.record("generation", &failed.error);
            show_error_dialog(&app, &failed.error);
            emit_run_state(&app, &task_run_id, &RunState::Idle);
        }
    });

    Ok(run_id)
}

/// Keep the caller's id when it sent one, otherwise mint a fresh one.
fn resolve_run_id(requested: Option<String>) -> String {
    requested
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Narrations in the current output directory, newest first.
#[tauri::command]
pub async fn list_narrations(state: State<'_, AppState>) -> NarratorResult<Vec<NarrationEntry>> {
    let output = state.current_output();
    let entries = output.list_narrations().await;
    state.logged("library", entries)
}

#[tauri::command]
pub fn is_generating(state: State<'_, AppState>) -> bool {
    state.slot.is_busy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_from_window_is_kept() {
        let id = "0b6f8a52-3c1d-4e55-9a0e-4f2d7c9b1e10".to_string();
        assert_eq!(resolve_run_id(Some(id.clone())), id);
    }

    #[test]
    fn test_missing_or_blank_run_id_is_generated() {
        let generated = resolve_run_id(None);
        assert!(Uuid::parse_str(&generated).is_ok());

        let from_blank = resolve_run_id(Some("  ".to_string()));
        assert!(Uuid::parse_str(&from_blank).is_ok());
        assert_ne!(generated, from_blank);
    }
}
