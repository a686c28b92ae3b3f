pub mod chunker;
pub mod error;
pub mod joiner;
pub mod playlist;
pub mod service;
pub mod voice;

pub use chunker::{split_into_segments, truncate_chars};
pub use error::AudiobookError;
pub use joiner::{join_segments, JoinReport};
pub use playlist::Playlist;
pub use service::{AudiobookService, AudiobookServiceApi};
pub use voice::{VoiceGender, LANGUAGE_CODE};

use std::path::PathBuf;
use std::time::Duration;

/// Silence inserted between consecutive segments
pub const DEFAULT_SILENCE_GAP: Duration = Duration::from_millis(200);

/// A slice of the input text submitted as one synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOutcome {
    Synthesized,
    /// Audio was already cached by an earlier run
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    pub synthesized: usize,
    pub skipped: usize,
}

/// One audiobook to produce
#[derive(Debug, Clone)]
pub struct AudiobookRequest {
    pub text_file: PathBuf,
    pub output: PathBuf,
    pub gender: VoiceGender,
    /// Characters of input to convert, 0 = all
    pub length: usize,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub segment_count: usize,
    pub synthesis: SynthesisReport,
    pub join: JoinReport,
    pub scratch_removed: bool,
}
