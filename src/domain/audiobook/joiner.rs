use super::{AudiobookError, Playlist};
use crate::infrastructure::audio::decode_mp3_file;
use crate::infrastructure::repositories::SegmentCache;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct JoinReport {
    pub clip_count: usize,
    pub duration: Duration,
    pub output_size: usize,
}

/// Merge every cached artifact, in index order, into one MP3 at `output`.
///
/// Each artifact is deleted as soon as it has been added to the playlist.
/// With no artifacts in the cache nothing is written and
/// `AudiobookError::NothingToJoin` is returned.
pub fn join_segments(
    cache: &SegmentCache,
    output: &Path,
    silence_gap: Duration,
) -> Result<JoinReport, AudiobookError> {
    let artifacts = cache.entries()?;
    if artifacts.is_empty() {
        return Err(AudiobookError::NothingToJoin(cache.dir().display().to_string()));
    }

    let mut playlist = Playlist::new(silence_gap);
    for artifact in &artifacts {
        tracing::info!(
            segment_index = artifact.index,
            path = %artifact.path.display(),
            "Joining audio file"
        );

        let clip = decode_mp3_file(&artifact.path)?;
        playlist.append(clip)?;
        cache.remove(artifact)?;

        tracing::info!(
            clips = playlist.clip_count(),
            duration_secs = playlist.duration().as_secs(),
            "Current audio length"
        );
    }

    tracing::info!(output = %output.display(), "Saving the output file");
    let output_size = playlist.export(output)?;

    Ok(JoinReport {
        clip_count: playlist.clip_count(),
        duration: playlist.duration(),
        output_size,
    })
}
