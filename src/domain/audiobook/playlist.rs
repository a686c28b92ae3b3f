use crate::infrastructure::audio::{encode_mp3, AudioClip, AudioError};
use std::path::Path;
use std::time::Duration;

/// Audio timeline built clip by clip, with silence between consecutive clips
#[derive(Debug)]
pub struct Playlist {
    timeline: Option<AudioClip>,
    clip_count: usize,
    silence_gap: Duration,
}

impl Playlist {
    pub fn new(silence_gap: Duration) -> Self {
        Self {
            timeline: None,
            clip_count: 0,
            silence_gap,
        }
    }

    /// Append a clip, preceded by the silence gap unless it is the first one.
    ///
    /// The first clip fixes the sample rate and channel count; later clips
    /// must match it.
    pub fn append(&mut self, clip: AudioClip) -> Result<(), AudioError> {
        match &mut self.timeline {
            None => {
                self.timeline = Some(clip);
            }
            Some(timeline) => {
                if timeline.sample_rate != clip.sample_rate || timeline.channels != clip.channels {
                    return Err(AudioError::FormatMismatch {
                        expected_rate: timeline.sample_rate,
                        expected_channels: timeline.channels,
                        rate: clip.sample_rate,
                        channels: clip.channels,
                    });
                }

                let gap_frames =
                    (self.silence_gap.as_secs_f64() * f64::from(timeline.sample_rate)).round() as usize;
                let gap_samples = gap_frames * usize::from(timeline.channels);
                timeline.samples.reserve(gap_samples + clip.samples.len());
                timeline.samples.resize(timeline.samples.len() + gap_samples, 0.0);
                timeline.samples.extend_from_slice(&clip.samples);
            }
        }

        self.clip_count += 1;
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.timeline
            .as_ref()
            .map(AudioClip::duration)
            .unwrap_or(Duration::ZERO)
    }

    pub fn clip_count(&self) -> usize {
        self.clip_count
    }

    pub fn is_empty(&self) -> bool {
        self.clip_count == 0
    }

    pub fn timeline(&self) -> Option<&AudioClip> {
        self.timeline.as_ref()
    }

    /// Encode the timeline to MP3 and write it to `path`; returns bytes written
    pub fn export(&self, path: &Path) -> Result<usize, AudioError> {
        let timeline = self
            .timeline
            .as_ref()
            .ok_or_else(|| AudioError::Encode("playlist is empty".to_string()))?;

        let mp3 = encode_mp3(timeline)?;
        std::fs::write(path, &mp3)?;
        Ok(mp3.len())
    }
}
