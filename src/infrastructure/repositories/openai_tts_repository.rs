use super::google_tts_repository::preview;
use super::tts_repository::{SynthesisError, TtsRepository};
use crate::domain::audiobook::VoiceGender;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
pub const MAX_REQUEST_LEN: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    fn get_voice_for_gender(gender: VoiceGender) -> Voice {
        match gender {
            VoiceGender::Male => Voice::Onyx,
            VoiceGender::Female => Voice::Nova,
            VoiceGender::Neutral => Voice::Alloy,
        }
    }

    /// Parse model string to SpeechModel enum
    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    fn classify_error(err: OpenAIError) -> SynthesisError {
        match err {
            OpenAIError::Reqwest(e) => SynthesisError::Transport(e.to_string()),
            OpenAIError::ApiError(api) => {
                let lowered = api.message.to_lowercase();
                if lowered.contains("api key") || lowered.contains("unauthorized") {
                    SynthesisError::Authentication(api.message)
                } else if lowered.contains("quota") || lowered.contains("rate limit") {
                    SynthesisError::QuotaExceeded(api.message)
                } else {
                    SynthesisError::InvalidRequest(api.message)
                }
            }
            OpenAIError::JSONDeserialize(e) => SynthesisError::InvalidResponse(e.to_string()),
            other => SynthesisError::Service(other.to_string()),
        }
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(&self, text: &str, gender: VoiceGender) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        // Select voice based on gender
        let voice = Self::get_voice_for_gender(gender);

        tracing::info!(
            provider = "openai",
            model = %self.model,
            gender = %gender,
            voice = ?voice,
            text_length = text.len(),
            text_preview = preview(text),
            "Calling OpenAI TTS API"
        );

        // Build the speech request
        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice,
            response_format: Some(SpeechResponseFormat::Mp3),
            speed: None, // Defaults to 1.0
        };

        // Call OpenAI TTS API
        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            Self::classify_error(e)
        })?;

        // Get audio bytes
        let audio_bytes = response.bytes.to_vec();
        tracing::info!(
            provider = "openai",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "Segment synthesized"
        );

        Ok(audio_bytes)
    }

    fn max_request_len(&self) -> usize {
        MAX_REQUEST_LEN
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
