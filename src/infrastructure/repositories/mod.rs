pub mod google_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod segment_cache;
pub mod tts_repository;

pub use google_tts_repository::GoogleTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use segment_cache::{CachedArtifact, SegmentCache};
pub use tts_repository::{SynthesisError, TtsRepository};
