use super::google_tts_repository::preview;
use super::tts_repository::{SynthesisError, TtsRepository};
use crate::domain::audiobook::VoiceGender;
use async_trait::async_trait;
use aws_sdk_polly::{
    error::ProvideErrorMetadata,
    types::{Engine, LanguageCode, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
pub const MAX_REQUEST_LEN: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Neural en-US voice for a gender; Polly has no neutral voice
    fn get_voice_for_gender(gender: VoiceGender) -> &'static str {
        match gender {
            VoiceGender::Male => "Matthew",
            VoiceGender::Female | VoiceGender::Neutral => "Joanna",
        }
    }

    fn classify_error(code: Option<&str>, message: String) -> SynthesisError {
        match code {
            Some(
                "UnrecognizedClientException"
                | "InvalidSignatureException"
                | "AccessDeniedException"
                | "ExpiredTokenException",
            ) => SynthesisError::Authentication(message),
            Some("ThrottlingException" | "ServiceQuotaExceededException") => {
                SynthesisError::QuotaExceeded(message)
            }
            Some(
                "TextLengthExceededException"
                | "InvalidSsmlException"
                | "EngineNotSupportedException"
                | "LanguageNotSupportedException"
                | "ValidationException",
            ) => SynthesisError::InvalidRequest(message),
            Some(_) => SynthesisError::Service(message),
            None => SynthesisError::Transport(message),
        }
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, gender: VoiceGender) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        // Select voice based on gender (always use neural)
        let voice_name = Self::get_voice_for_gender(gender);
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;

        // Log the request details for debugging
        tracing::info!(
            provider = "polly",
            gender = %gender,
            voice = voice_name,
            engine = ?engine,
            text_length = text.len(),
            text_preview = preview(text),
            "Calling AWS Polly synthesize_speech"
        );

        // Call Polly
        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .language_code(LanguageCode::EnUs)
            .output_format(OutputFormat::Mp3)
            .engine(engine)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    voice = voice_name,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                // Error code comes from the service metadata, absent on dispatch failures
                let code = e.code().map(str::to_string);
                let message = e
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string());
                Self::classify_error(code.as_deref(), message)
            })?;

        // Get audio stream
        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SynthesisError::InvalidResponse(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::info!(
            provider = "polly",
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
        "polly"
    }
}
