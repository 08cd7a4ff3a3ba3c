// Events module
// Everything the backend pushes to the window outside of command replies

use log::{debug, error};
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::errors::NarratorError;
use crate::models::RunState;

pub const RUN_STATE_EVENT: &str = "run-state";

#[derive(Debug, Clone, Serialize)]
pub struct RunStatePayload<'a> {
    pub run_id: &'a str,
    pub state: &'a RunState,
}

/// Emit an event to every window
pub fn emit_event<T: Serialize + Clone>(app: &AppHandle, event_name: &str, payload: T) {
    match app.emit(event_name, payload) {
        Ok(_) => debug!("Emitted event: {}", event_name),
        Err(e) => error!("Failed to emit event {}: {}", event_name, e),
    }
}

pub fn emit_run_state(app: &AppHandle, run_id: &str, state: &RunState) {
    emit_event(app, RUN_STATE_EVENT, RunStatePayload { run_id, state });
}

/// Native error dialog; returns immediately.
pub fn show_error_dialog(app: &AppHandle, error: &NarratorError) {
    app.dialog()
        .message(error.to_string())
        .title(dialog_title(error))
        .kind(MessageDialogKind::Error)
        .show(|_| {});
}

pub fn show_warning_dialog(app: &AppHandle, title: &str, message: &str) {
    app.dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Warning)
        .show(|_| {});
}

fn dialog_title(error: &NarratorError) -> &'static str {
    match error {
        NarratorError::Auth(_) => "API key problem",
        NarratorError::Network(_) => "Network error",
        NarratorError::RateLimit(_) => "Rate limited",
        NarratorError::QuotaExceeded(_) => "Quota exceeded",
        NarratorError::InvalidVoice(_) => "Invalid voice",
        NarratorError::EmptyInput | NarratorError::EmptyNarrative => "Nothing to narrate",
        NarratorError::Filesystem(_) => "Could not save narration",
        NarratorError::Playback(_) => "Playback error",
        _ => "Error",
    }
}
