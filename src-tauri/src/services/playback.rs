//! Local audio playback.
//!
//! The rodio output stream is not `Send`, so it lives on a dedicated thread
//! that owns the device and the sink. `PlaybackController` is the cheap,
//! thread-safe handle the rest of the app talks to; every call is a message
//! to that thread. The output device is opened on the first `play`, so a
//! machine without audio only fails when playback is actually requested.

use log::{debug, error, info};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tokio::sync::oneshot;

use crate::errors::{NarratorError, NarratorResult};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub path: Option<PathBuf>,
}

enum PlayerCommand {
    Play {
        path: PathBuf,
        reply: oneshot::Sender<NarratorResult<()>>,
    },
    Pause,
    Resume,
    Stop,
    Status {
        reply: oneshot::Sender<PlaybackStatus>,
    },
    Shutdown,
}

pub struct PlaybackController {
    commands: mpsc::Sender<PlayerCommand>,
}

impl PlaybackController {
    pub fn new() -> NarratorResult<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("narrator-audio".to_string())
            .spawn(move || AudioThread::default().run(rx))
            .map_err(|e| NarratorError::Playback(format!("Failed to start audio thread: {}", e)))?;
        Ok(Self { commands: tx })
    }

    fn send(&self, command: PlayerCommand) -> NarratorResult<()> {
        self.commands
            .send(command)
            .map_err(|_| NarratorError::Playback("audio thread is not running".to_string()))
    }

    /// Stop whatever is playing and start `path` from the beginning.
    pub async fn play(&self, path: &Path) -> NarratorResult<()> {
        if !path.is_file() {
            return Err(NarratorError::Playback(format!(
                "audio file not found: {}",
                path.display()
            )));
        }

        let (reply, response) = oneshot::channel();
        self.send(PlayerCommand::Play {
            path: path.to_path_buf(),
            reply,
        })?;
        response
            .await
            .map_err(|_| NarratorError::Playback("audio thread dropped the request".to_string()))?
    }

    pub fn pause(&self) -> NarratorResult<()> {
        self.send(PlayerCommand::Pause)
    }

    pub fn resume(&self) -> NarratorResult<()> {
        self.send(PlayerCommand::Resume)
    }

    pub fn stop(&self) -> NarratorResult<()> {
        self.send(PlayerCommand::Stop)
    }

    pub async fn status(&self) -> NarratorResult<PlaybackStatus> {
        let (reply, response) = oneshot::channel();
        self.send(PlayerCommand::Status { reply })?;
        response
            .await
            .map_err(|_| NarratorError::Playback("audio thread dropped the request".to_string()))
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
    }
}

#[derive(Default)]
struct AudioThread {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    path: Option<PathBuf>,
}

impl AudioThread {
    fn run(mut self, commands: mpsc::Receiver<PlayerCommand>) {
        debug!("Audio thread started");
        while let Ok(command) = commands.recv() {
            match command {
                PlayerCommand::Play { path, reply } => {
                    let result = self.play(&path);
                    if let Err(e) = &result {
                        error!("Playback of {} failed: {}", path.display(), e);
                    }
                    let _ = reply.send(result);
                }
                PlayerCommand::Pause => {
                    if let Some(sink) = &self.sink {
                        sink.pause();
                    }
                }
                PlayerCommand::Resume => {
                    if let Some(sink) = &self.sink {
                        sink.play();
                    }
                }
                PlayerCommand::Stop => self.stop(),
                PlayerCommand::Status { reply } => {
                    let _ = reply.send(self.status());
                }
                PlayerCommand::Shutdown => break,
            }
        }
        self.stop();
        debug!("Audio thread stopped");
    }

    fn play(&mut self, path: &Path) -> NarratorResult<()> {
        self.stop();

        let file = File::open(path)
            .map_err(|e| NarratorError::Playback(format!("Could not open {}: {}", path.display(), e)))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| NarratorError::Playback(format!("Could not decode {}: {}", path.display(), e)))?;

        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| NarratorError::Playback(format!("No audio output device: {}", e)))?;
            stream.log_on_drop(false);
            info!("Opened default audio output");
            self.stream = Some(stream);
        }
        let Some(stream) = &self.stream else {
            return Err(NarratorError::Playback("audio output unavailable".to_string()));
        };

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.play();

        info!("Playing {}", path.display());
        self.sink = Some(sink);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.path = None;
    }

    fn status(&self) -> PlaybackStatus {
        let state = match &self.sink {
            None => PlaybackState::Stopped,
            Some(sink) if sink.empty() => PlaybackState::Finished,
            Some(sink) if sink.is_paused() => PlaybackState::Paused,
            Some(_) => PlaybackState::Playing,
        };
        PlaybackStatus {
            state,
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_initial_status_is_stopped() {
        let player = PlaybackController::new().unwrap();
        let status = player.status().await.unwrap();
        assert_eq!(status.state, PlaybackState::Stopped);
        assert!(status.path.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_a_playback_error() {
        let player = PlaybackController::new().unwrap();
        let err = assert_err!(player.play(Path::new("/definitely/not/here.mp3")).await);
        assert_eq!(err.kind(), "playback");
    }

    #[tokio::test]
    async fn test_undecodable_file_is_a_playback_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let player = PlaybackController::new().unwrap();
        let err = assert_err!(player.play(&path).await);
        assert_eq!(err.kind(), "playback");
        assert_eq!(player.status().await.unwrap().state, PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn test_controls_without_audio_are_noops() {
        let player = PlaybackController::new().unwrap();
        assert_ok!(player.pause());
        assert_ok!(player.resume());
        assert_ok!(player.stop());
        assert_eq!(player.status().await.unwrap().state, PlaybackState::Stopped);
    }
}
