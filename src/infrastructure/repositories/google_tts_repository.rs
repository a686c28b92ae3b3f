use super::tts_repository::{SynthesisError, TtsRepository};
use crate::domain::audiobook::{VoiceGender, LANGUAGE_CODE};
use crate::infrastructure::google::{CredentialsError, GoogleAuth};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Google Cloud TTS accepts at most 5000 bytes of input per request
/// See https://cloud.google.com/text-to-speech/quotas
pub const MAX_REQUEST_LEN: usize = 5000;

pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisBody<'a> {
    input: TextInput<'a>,
    voice: VoiceSelectionParams,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams {
    language_code: &'static str,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisResponse {
    audio_content: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

impl From<CredentialsError> for SynthesisError {
    fn from(err: CredentialsError) -> Self {
        SynthesisError::Authentication(err.to_string())
    }
}

/// Google Cloud Text-to-Speech implementation of TTS repository
pub struct GoogleTtsRepository {
    auth: Arc<GoogleAuth>,
    http_client: reqwest::Client,
    endpoint: String,
}

impl GoogleTtsRepository {
    pub fn new(auth: Arc<GoogleAuth>, endpoint: impl Into<String>) -> Self {
        Self {
            auth,
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    fn synthesize_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.endpoint)
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<GoogleErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(&self, text: &str, gender: VoiceGender) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        // Reuses the cached token until it is about to expire
        let token = self.auth.access_token().await?;

        let body = SynthesisBody {
            input: TextInput { text },
            voice: VoiceSelectionParams {
                language_code: LANGUAGE_CODE,
                ssml_gender: gender.as_str(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        tracing::info!(
            provider = "google",
            gender = %gender,
            text_length = text.len(),
            text_preview = preview(text),
            "Calling Google text:synthesize"
        );

        // Call Google TTS
        let response = self
            .http_client
            .post(self.synthesize_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google TTS request could not be sent");
                SynthesisError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = Self::error_message(&error_text);
            tracing::error!(
                status = status.as_u16(),
                error = %message,
                text_length = text.len(),
                "Google TTS synthesis failed"
            );
            return Err(SynthesisError::from_status(status.as_u16(), message));
        }

        // Decode base64 audio content
        let synthesis: SynthesisResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(synthesis.audio_content.as_bytes())
            .map_err(|e| SynthesisError::InvalidResponse(format!("audioContent is not base64: {}", e)))?;

        tracing::info!(
            provider = "google",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio.len(),
            "Segment synthesized"
        );

        Ok(audio)
    }

    fn max_request_len(&self) -> usize {
        MAX_REQUEST_LEN
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

/// First 200 bytes of text, cut at a char boundary
pub(crate) fn preview(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
