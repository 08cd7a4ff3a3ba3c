use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_messages, clean_narrative, ChatMessage, NarrativeGenerator};
use crate::config::AppConfig;
use crate::errors::{NarratorError, NarratorResult};
use crate::models::{GothicStyle, NarrativeResult};
use crate::utils::common::extract_error_message;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the xAI chat completions API
pub struct XaiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl XaiClient {
    pub fn new(api_key: Option<String>, base_url: &str, model: &str, timeout: Duration) -> NarratorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarratorError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> NarratorResult<Self> {
        Self::new(
            config.xai_api_key.clone(),
            &config.xai_base_url,
            &config.xai_model,
            config.request_timeout,
        )
    }

    fn map_status(status: StatusCode, body: &str) -> NarratorError {
        let message = extract_error_message(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NarratorError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => NarratorError::RateLimit(message),
            _ => NarratorError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait::async_trait]
impl NarrativeGenerator for XaiClient {
    async fn generate(&self, source_text: &str, style: GothicStyle) -> NarratorResult<NarrativeResult> {
        if source_text.trim().is_empty() {
            return Err(NarratorError::EmptyInput);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NarratorError::Auth("XAI_API_KEY is not set".to_string()))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: build_messages(source_text, style),
        };

        info!("Requesting {:?} narrative from xAI ({})", style, self.model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("xAI response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("xAI API error: HTTP {}, body: {}", status, body);
            return Err(Self::map_status(status, &body));
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| NarratorError::Api {
            status: status.as_u16(),
            message: format!("Malformed completion: {}", e),
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let generated_text = clean_narrative(&content);

        if generated_text.is_empty() {
            error!("Empty response from xAI");
            return Err(NarratorError::EmptyNarrative);
        }

        info!("Received narrative of {} characters", generated_text.len());
        Ok(NarrativeResult {
            generated_text,
            style_used: style,
        })
    }
}
