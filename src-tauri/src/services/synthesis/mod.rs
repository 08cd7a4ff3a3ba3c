// Narration synthesis
// Sends prose to a text-to-speech service and stores the returned audio

use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::{NarratorError, NarratorResult};
use crate::models::{AudioArtifact, ToneSettings, Voice};

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsClient;

/// Everything needed to voice one narrative
#[derive(Debug, Clone)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    pub voice_id: &'a str,
    pub tone: ToneSettings,
    pub output_format: &'a str,
}

/// Trait that every TTS backend implements
#[async_trait::async_trait]
pub trait NarratorSynthesizer: Send + Sync {
    /// Synthesize the text and return the encoded audio bytes.
    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> NarratorResult<Vec<u8>>;

    /// Voices the account can use.
    async fn list_voices(&self) -> NarratorResult<Vec<Voice>>;

    /// Synthesize and write the audio to `path`.
    ///
    /// The file at `path` only exists once the whole stream has been written.
    async fn synthesize_to_file(&self, request: &SynthesisRequest<'_>, path: &Path) -> NarratorResult<AudioArtifact> {
        let audio = self.synthesize(request).await?;
        write_audio_file(path, &audio).await?;
        Ok(AudioArtifact {
            file_path: path.to_path_buf(),
            voice_id: request.voice_id.to_string(),
            byte_len: audio.len() as u64,
        })
    }
}

/// File extension for an output format such as `mp3_44100_128`.
pub fn audio_extension(output_format: &str) -> &'static str {
    match output_format.split('_').next().unwrap_or_default() {
        "opus" => "opus",
        "pcm" => "pcm",
        "ulaw" => "ulaw",
        _ => "mp3",
    }
}

/// Write to `<path>.part` and rename into place once flushed.
pub async fn write_audio_file(path: &Path, audio: &[u8]) -> NarratorResult<()> {
    if audio.is_empty() {
        return Err(NarratorError::Api {
            status: 200,
            message: "TTS service returned no audio".to_string(),
        });
    }

    let partial = partial_path(path);
    debug!("Writing {} bytes of audio to {}", audio.len(), partial.display());

    let result = async {
        let mut file = fs::File::create(&partial).await?;
        file.write_all(audio).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&partial, path).await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&partial).await;
        return Err(NarratorError::Filesystem(format!(
            "Failed to write audio to {}: {}",
            path.display(),
            e
        )));
    }

    info!("Audio saved to {}", path.display());
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_extension() {
        assert_eq!(audio_extension("mp3_44100_128"), "mp3");
        assert_eq!(audio_extension("opus_48000_64"), "opus");
        assert_eq!(audio_extension("pcm_16000"), "pcm");
        assert_eq!(audio_extension("ulaw_8000"), "ulaw");
        assert_eq!(audio_extension(""), "mp3");
    }

    #[tokio::test]
    async fn test_write_audio_file_leaves_no_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tale.mp3");
        write_audio_file(&path, b"ID3fake").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"ID3fake");
        assert!(!partial_path(&path).exists());
    }

    #[tokio::test]
    async fn test_failed_write_reports_error_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("tale.mp3");
        let err = write_audio_file(&path, b"data").await.unwrap_err();

        assert_eq!(err.kind(), "filesystem");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tale.mp3");
        assert!(write_audio_file(&path, &[]).await.is_err());
        assert!(!path.exists());
    }
}
