use super::{
    join_segments, split_into_segments, truncate_chars, AudiobookError, AudiobookRequest,
    RunSummary, Segment, SegmentOutcome, SynthesisReport, VoiceGender,
};
use crate::infrastructure::repositories::{SegmentCache, TtsRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub struct AudiobookService {
    tts_repo: Arc<dyn TtsRepository>,
    scratch_dir: PathBuf,
    silence_gap: Duration,
}

impl AudiobookService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, scratch_dir: PathBuf, silence_gap: Duration) -> Self {
        Self {
            tts_repo,
            scratch_dir,
            silence_gap,
        }
    }

    pub fn segment_cache(&self, request: &AudiobookRequest) -> SegmentCache {
        SegmentCache::new(self.scratch_dir.clone(), &request.output)
    }
}

#[async_trait]
pub trait AudiobookServiceApi: Send + Sync {
    /// Produce one audiobook
    ///
    /// This operation:
    /// - Reads and optionally truncates the input text
    /// - Splits it into segments the provider accepts
    /// - Synthesizes every segment not already cached
    /// - Joins the cached audio into the output file
    async fn run(&self, request: &AudiobookRequest) -> Result<RunSummary, AudiobookError>;
}

#[async_trait]
impl AudiobookServiceApi for AudiobookService {
    async fn run(&self, request: &AudiobookRequest) -> Result<RunSummary, AudiobookError> {
        let text = tokio::fs::read_to_string(&request.text_file).await?;
        let text = truncate_chars(&text, request.length);

        let segments = split_into_segments(text, self.tts_repo.max_request_len());
        tracing::info!(
            provider = self.tts_repo.provider_name(),
            text_length = text.len(),
            segment_count = segments.len(),
            max_request_len = self.tts_repo.max_request_len(),
            "Text split into segments"
        );

        if segments.is_empty() {
            return Err(AudiobookError::EmptyInput);
        }

        // Joining consumes the cache, so a bad output path must fail here
        check_output_writable(&request.output).await?;

        let cache = self.segment_cache(request);
        cache.ensure()?;

        let synthesis = self.synthesize_all(&segments, request.gender, &cache).await?;
        tracing::info!(
            synthesized = synthesis.synthesized,
            skipped = synthesis.skipped,
            "All segments synthesized"
        );

        let join = join_segments(&cache, &request.output, self.silence_gap)?;

        let scratch_removed = cache.remove_if_empty()?;
        if !scratch_removed {
            tracing::warn!(
                scratch_dir = %cache.dir().display(),
                "Scratch directory not empty, leaving it in place"
            );
        }

        Ok(RunSummary {
            segment_count: segments.len(),
            synthesis,
            join,
            scratch_removed,
        })
    }
}

/// Open the output for writing without truncating it, removing it again when
/// it did not exist before
async fn check_output_writable(output: &Path) -> Result<(), AudiobookError> {
    let existed = tokio::fs::try_exists(output).await.unwrap_or(false);

    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)
        .await
        .map_err(|e| {
            tracing::error!(
                output = %output.display(),
                error = %e,
                "Output file is not writable"
            );
            e
        })?;

    if !existed {
        tokio::fs::remove_file(output).await?;
    }

    Ok(())
}

impl AudiobookService {
    /// Synthesize segments in index order, stopping at the first failure
    pub async fn synthesize_all(
        &self,
        segments: &[Segment],
        gender: VoiceGender,
        cache: &SegmentCache,
    ) -> Result<SynthesisReport, AudiobookError> {
        let mut report = SynthesisReport::default();

        for segment in segments {
            match self.synthesize_segment(segment, gender, cache).await? {
                SegmentOutcome::Synthesized => report.synthesized += 1,
                SegmentOutcome::Skipped => report.skipped += 1,
            }
        }

        Ok(report)
    }

    /// Synthesize one segment into the cache unless it is already there
    pub async fn synthesize_segment(
        &self,
        segment: &Segment,
        gender: VoiceGender,
        cache: &SegmentCache,
    ) -> Result<SegmentOutcome, AudiobookError> {
        if cache.contains(segment.index) {
            tracing::info!(segment_index = segment.index, "Existing segment, skipped");
            return Ok(SegmentOutcome::Skipped);
        }

        tracing::info!(
            segment_index = segment.index,
            segment_size = segment.text.len(),
            "Synthesizing segment"
        );

        let audio = self
            .tts_repo
            .synthesize(&segment.text, gender)
            .await
            .map_err(|source| AudiobookError::Synthesis {
                index: segment.index,
                source,
            })?;

        let path = cache.store(segment.index, &audio)?;
        tracing::info!(
            segment_index = segment.index,
            path = %path.display(),
            audio_size = audio.len(),
            "Audio content written to file"
        );

        Ok(SegmentOutcome::Synthesized)
    }
}
