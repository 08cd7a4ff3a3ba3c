//! # ElevenLabs TTS Integration
//!
//! Text-to-speech and voice listing against the ElevenLabs v1 API.

use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{NarratorSynthesizer, SynthesisRequest};
use crate::config::AppConfig;
use crate::errors::{NarratorError, NarratorResult};
use crate::models::{ToneSettings, Voice};
use crate::utils::common::{extract_error_message, extract_error_status};

const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl From<ToneSettings> for VoiceSettings {
    fn from(tone: ToneSettings) -> Self {
        let tone = tone.clamped();
        Self {
            stability: tone.stability,
            similarity_boost: tone.similarity_boost,
            style: tone.style,
            use_speaker_boost: tone.use_speaker_boost,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<Voice>,
}

/// Client for the ElevenLabs API
pub struct ElevenLabsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model_id: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: Option<String>, base_url: &str, model_id: &str, timeout: Duration) -> NarratorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarratorError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id: model_id.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> NarratorResult<Self> {
        Self::new(
            config.elevenlabs_api_key.clone(),
            &config.elevenlabs_base_url,
            &config.elevenlabs_model,
            config.request_timeout,
        )
    }

    fn api_key(&self) -> NarratorResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| NarratorError::Auth("ELEVENLABS_API_KEY is not set".to_string()))
    }

    /// ElevenLabs reports quota and voice problems through `detail.status`,
    /// often alongside a plain 401 or 400.
    fn map_status(status: StatusCode, body: &str) -> NarratorError {
        let message = extract_error_message(body);
        match extract_error_status(body).as_deref() {
            Some("quota_exceeded") => return NarratorError::QuotaExceeded(message),
            Some("voice_not_found") | Some("invalid_voice_id") => {
                return NarratorError::InvalidVoice(message);
            }
            _ => {}
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NarratorError::Auth(message),
            StatusCode::NOT_FOUND => NarratorError::InvalidVoice(message),
            StatusCode::TOO_MANY_REQUESTS => NarratorError::RateLimit(message),
            _ => NarratorError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait::async_trait]
impl NarratorSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> NarratorResult<Vec<u8>> {
        if request.text.trim().is_empty() {
            return Err(NarratorError::EmptyInput);
        }
        if request.voice_id.trim().is_empty() {
            return Err(NarratorError::InvalidVoice("no voice selected".to_string()));
        }
        let api_key = self.api_key()?;

        let body = TextToSpeechRequest {
            text: request.text,
            model_id: &self.model_id,
            voice_settings: request.tone.into(),
        };

        info!(
            "Requesting speech for {} characters with voice {}",
            request.text.chars().count(),
            request.voice_id
        );
        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, request.voice_id))
            .query(&[
                ("output_format", request.output_format),
                ("optimize_streaming_latency", "0"),
            ])
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("ElevenLabs response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("ElevenLabs API error: HTTP {}, body: {}", status, body);
            return Err(Self::map_status(status, &body));
        }

        let audio = response.bytes().await?.to_vec();
        info!("Received {} bytes of audio", audio.len());
        Ok(audio)
    }

    async fn list_voices(&self) -> NarratorResult<Vec<Voice>> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/v1/voices", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Failed to list voices: HTTP {}, body: {}", status, body);
            return Err(Self::map_status(status, &body));
        }

        let mut voices = response
            .json::<VoicesResponse>()
            .await
            .map_err(|e| NarratorError::Api {
                status: status.as_u16(),
                message: format!("Malformed voice list: {}", e),
            })?
            .voices;
        voices.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        debug!("Fetched {} voices", voices.len());
        Ok(voices)
    }
}
