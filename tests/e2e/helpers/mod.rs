
pub use fake_tts::RecordingTtsRepository;
pub use google_mock::{MockBehavior, MockGoogleServer, MOCK_ACCESS_TOKEN};
pub use speech_mock::{MockSpeechServer, SpeechReply};

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tts_audiobook::domain::audiobook::{
    AudiobookRequest, AudiobookService, VoiceGender, DEFAULT_SILENCE_GAP,
};
use tts_audiobook::infrastructure::repositories::{SegmentCache, TtsRepository};

/// Isolated working directory holding the input text, scratch dir and output
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn text_file(&self) -> PathBuf {
        self.path().join("book.txt")
    }

    pub fn output(&self) -> PathBuf {
        self.path().join("book.mp3")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.path().join(".tmp")
    }

    pub fn write_text(&self, text: &str) -> Result<()> {
        std::fs::write(self.text_file(), text)?;
        Ok(())
    }

    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn request(&self, gender: VoiceGender, length: usize) -> AudiobookRequest {
        AudiobookRequest {
            text_file: self.text_file(),
            output: self.output(),
            gender,
            length,
        }
    }

    pub fn service(&self, tts_repo: Arc<dyn TtsRepository>) -> AudiobookService {
        AudiobookService::new(tts_repo, self.scratch_dir(), DEFAULT_SILENCE_GAP)
    }

    pub fn cache(&self) -> SegmentCache {
        SegmentCache::new(self.scratch_dir(), &self.output())
    }
}
