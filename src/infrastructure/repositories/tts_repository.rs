use crate::domain::audiobook::VoiceGender;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google Cloud, AWS Polly, OpenAI).
///
/// Implementations synthesize exactly one request per call. Splitting long
/// text is the caller's job, using `max_request_len` as the bound.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to MP3 audio with the voice matching `gender`
    ///
    /// # Errors
    /// Returns the provider's failure as-is; nothing is retried
    async fn synthesize(&self, text: &str, gender: VoiceGender) -> Result<Vec<u8>, SynthesisError>;

    /// Largest request the provider accepts, in bytes of text
    fn max_request_len(&self) -> usize;

    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("request rejected: {0}")]
    InvalidRequest(String),

    #[error("speech service error: {0}")]
    Service(String),

    #[error("could not reach speech service: {0}")]
    Transport(String),

    #[error("unexpected response from speech service: {0}")]
    InvalidResponse(String),
}

impl SynthesisError {
    /// Classify a non-success HTTP status returned by a provider
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => SynthesisError::Authentication(message),
            429 => SynthesisError::QuotaExceeded(message),
            400 | 413 | 422 => SynthesisError::InvalidRequest(message),
            _ => SynthesisError::Service(format!("HTTP {}: {}", status, message)),
        }
    }
}
