use anyhow::Context;
use log::{error, info, warn};
use tauri::{Manager, WindowEvent};

pub mod commands;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod services;
pub mod utils;

use commands::AppState;
use config::preferences::PreferenceStore;
use config::AppConfig;
use services::{ElevenLabsClient, NarrationPipeline, PlaybackController, XaiClient};
use utils::error_log::ErrorLog;

fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let pipeline = NarrationPipeline::new(
        Box::new(XaiClient::from_config(&config).context("Failed to create the xAI client")?),
        Box::new(ElevenLabsClient::from_config(&config).context("Failed to create the ElevenLabs client")?),
    );
    let store = PreferenceStore::new(&config.preferences_path);
    let error_log = ErrorLog::new(&config.error_log_path);
    let player = PlaybackController::new().context("Failed to start the audio player")?;
    Ok(AppState::new(config, store, error_log, pipeline, player))
}

fn try_run() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    info!(
        "Narrations in {}, preferences at {}",
        config.output_dir.display(),
        config.preferences_path.display()
    );
    let missing = config.missing_keys();
    let state = build_state(config)?;

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(state)
        .setup(move |app| {
            if !missing.is_empty() {
                let message = format!(
                    "Missing {}. Set the variable and restart; runs will fail until then.",
                    missing.join(" and ")
                );
                warn!("{}", message);
                events::show_warning_dialog(app.handle(), "API keys not found", &message);
            }
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                info!("Window closed, saving preferences");
                window.state::<AppState>().save_prefs();
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_preferences,
            commands::save_preferences,
            commands::api_key_status,
            commands::choose_output_dir,
            commands::list_styles,
            commands::list_voices,
            commands::generate_narration,
            commands::is_generating,
            commands::list_narrations,
            commands::play_audio,
            commands::pause_audio,
            commands::resume_audio,
            commands::stop_audio,
            commands::playback_status,
            commands::open_output_dir,
            commands::open_file,
        ])
        .run(tauri::generate_context!())
        .context("error while running tauri application")
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    utils::logger::init_logger();

    if let Err(e) = try_run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_state_from_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            output_dir: dir.path().join("narrations"),
            preferences_path: dir.path().join("prefs.json"),
            error_log_path: dir.path().join("errors.txt"),
            ..AppConfig::default()
        };
        let state = build_state(config).unwrap();
        assert!(!state.slot.is_busy());
        assert_eq!(state.current_output().dir(), dir.path().join("narrations"));
    }
}
